use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub identity: Identity,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub weather: Weather,
	#[serde(default)]
	pub chat: Chat,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

/// The fixed demo identity every request runs as. There is no login.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Identity {
	pub user_id: String,
	pub user_name: String,
	pub email: String,
	/// Seeds the assistant name of a freshly created preferences row.
	pub agent_name: String,
}
impl Default for Identity {
	fn default() -> Self {
		Self {
			user_id: "demo-user".to_string(),
			user_name: "Demo User".to_string(),
			email: "demo@example.com".to_string(),
			agent_name: "Alex".to_string(),
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub llm: LlmProviderConfig,
	pub memory: MemoryProviderConfig,
	pub weather: WeatherProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: Option<String>,
	pub path: String,
	pub model: String,
	pub max_tokens: u32,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct MemoryProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: Option<String>,
	pub search_path: String,
	pub add_path: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct WeatherProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: Option<String>,
	pub realtime_path: String,
	pub forecast_path: String,
	#[serde(default = "default_units")]
	pub units: String,
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Weather {
	pub cities: Vec<City>,
	pub cache_ttl_secs: u64,
}
impl Default for Weather {
	fn default() -> Self {
		Self {
			cities: vec![
				City { name: "San Francisco".to_string(), lat: 37.7749, lon: -122.4194 },
				City { name: "New York".to_string(), lat: 40.7128, lon: -74.006 },
				City { name: "London".to_string(), lat: 51.5074, lon: -0.1278 },
			],
			cache_ttl_secs: 120,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct City {
	pub name: String,
	pub lat: f64,
	pub lon: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Chat {
	/// Persisted chat turns expire this many days after creation.
	pub message_ttl_days: i64,
}
impl Default for Chat {
	fn default() -> Self {
		Self { message_ttl_days: 3 }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_units() -> String {
	"metric".to_string()
}
