pub mod calendar;
pub mod chat;
pub mod notes;
pub mod preferences;
pub mod tasks;
pub mod time_serde;
pub mod weather;

mod error;

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use serde_json::Value;
use tokio::sync::RwLock;

pub use calendar::{CalendarEvent, EventKind};
pub use chat::{ChatRequest, ChatResponse, ChatSideEffect, ChatTurn};
pub use error::{Error, Result};
use hearth_config::{City, Config, LlmProviderConfig, MemoryProviderConfig, WeatherProviderConfig};
use hearth_providers::{
	llm,
	memory::{self, MemoryRecord},
};
pub use hearth_providers::weather::{CityWeather, ForecastHour};
use hearth_storage::db::Db;
pub use notes::{CreateNoteRequest, NoteItem, UpdateNoteRequest};
pub use preferences::{PreferencesView, UpdatePreferencesRequest};
pub use tasks::{CreateTaskRequest, TaskItem, UpdateTaskRequest};
use weather::CachedReport;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait LlmProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, hearth_providers::Result<Option<String>>>;
}

pub trait MemoryProvider
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		cfg: &'a MemoryProviderConfig,
		query: &'a str,
		user_id: &'a str,
	) -> BoxFuture<'a, Vec<MemoryRecord>>;

	fn add<'a>(
		&'a self,
		cfg: &'a MemoryProviderConfig,
		messages: &'a [Value],
		user_id: &'a str,
	) -> BoxFuture<'a, Option<Value>>;
}

pub trait WeatherProvider
where
	Self: Send + Sync,
{
	fn fetch_city<'a>(
		&'a self,
		cfg: &'a WeatherProviderConfig,
		api_key: &'a str,
		city: &'a City,
	) -> BoxFuture<'a, hearth_providers::Result<CityWeather>>;
}

#[derive(Clone)]
pub struct Providers {
	pub llm: Arc<dyn LlmProvider>,
	pub memory: Arc<dyn MemoryProvider>,
	pub weather: Arc<dyn WeatherProvider>,
}

pub struct HearthService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
	weather_cache: RwLock<HashMap<String, CachedReport>>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DeleteResponse {
	pub success: bool,
}

struct DefaultProviders;

impl LlmProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, hearth_providers::Result<Option<String>>> {
		Box::pin(llm::complete(cfg, messages))
	}
}

impl MemoryProvider for DefaultProviders {
	fn search<'a>(
		&'a self,
		cfg: &'a MemoryProviderConfig,
		query: &'a str,
		user_id: &'a str,
	) -> BoxFuture<'a, Vec<MemoryRecord>> {
		Box::pin(memory::search(cfg, query, user_id))
	}

	fn add<'a>(
		&'a self,
		cfg: &'a MemoryProviderConfig,
		messages: &'a [Value],
		user_id: &'a str,
	) -> BoxFuture<'a, Option<Value>> {
		Box::pin(memory::add(cfg, messages, user_id))
	}
}

impl WeatherProvider for DefaultProviders {
	fn fetch_city<'a>(
		&'a self,
		cfg: &'a WeatherProviderConfig,
		api_key: &'a str,
		city: &'a City,
	) -> BoxFuture<'a, hearth_providers::Result<CityWeather>> {
		Box::pin(hearth_providers::weather::fetch_city(cfg, api_key, city))
	}
}

impl Providers {
	pub fn new(
		llm: Arc<dyn LlmProvider>,
		memory: Arc<dyn MemoryProvider>,
		weather: Arc<dyn WeatherProvider>,
	) -> Self {
		Self { llm, memory, weather }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);
		Self { llm: provider.clone(), memory: provider.clone(), weather: provider }
	}
}

impl HearthService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self::with_providers(cfg, db, Providers::default())
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		Self { cfg, db, providers, weather_cache: RwLock::new(HashMap::new()) }
	}
}
