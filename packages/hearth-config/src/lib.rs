mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Chat, City, Config, Identity, LlmProviderConfig, MemoryProviderConfig, Postgres, Providers,
	Service, Storage, Weather, WeatherProviderConfig,
};

use std::{env, fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	apply_overrides(&mut cfg, |name| env::var(name).ok());

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

/// Secrets set in the environment win over the file. Empty values are ignored.
pub fn apply_overrides<F>(cfg: &mut Config, lookup: F)
where
	F: Fn(&str) -> Option<String>,
{
	if let Some(dsn) = lookup("DATABASE_URL")
		&& !dsn.trim().is_empty()
	{
		cfg.storage.postgres.dsn = dsn;
	}
	if let Some(key) = lookup("OPENAI_API_KEY")
		&& !key.trim().is_empty()
	{
		cfg.providers.llm.api_key = Some(key);
	}
	if let Some(key) = lookup("MEM0_API_KEY")
		&& !key.trim().is_empty()
	{
		cfg.providers.memory.api_key = Some(key);
	}
	if let Some(key) = lookup("TOMORROW_IO_API_KEY")
		&& !key.trim().is_empty()
	{
		cfg.providers.weather.api_key = Some(key);
	}
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("identity.user_id", &cfg.identity.user_id),
		("identity.user_name", &cfg.identity.user_name),
		("storage.postgres.dsn", &cfg.storage.postgres.dsn),
		("providers.llm.api_base", &cfg.providers.llm.api_base),
		("providers.llm.path", &cfg.providers.llm.path),
		("providers.llm.model", &cfg.providers.llm.model),
		("providers.memory.api_base", &cfg.providers.memory.api_base),
		("providers.memory.search_path", &cfg.providers.memory.search_path),
		("providers.memory.add_path", &cfg.providers.memory.add_path),
		("providers.weather.api_base", &cfg.providers.weather.api_base),
		("providers.weather.realtime_path", &cfg.providers.weather.realtime_path),
		("providers.weather.forecast_path", &cfg.providers.weather.forecast_path),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	for (label, timeout_ms) in [
		("providers.llm.timeout_ms", cfg.providers.llm.timeout_ms),
		("providers.memory.timeout_ms", cfg.providers.memory.timeout_ms),
		("providers.weather.timeout_ms", cfg.providers.weather.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if cfg.providers.llm.max_tokens == 0 {
		return Err(Error::Validation {
			message: "providers.llm.max_tokens must be greater than zero.".to_string(),
		});
	}
	if !cfg.providers.llm.temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be a finite number.".to_string(),
		});
	}
	if !(0.0..=2.0).contains(&cfg.providers.llm.temperature) {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}

	if !matches!(cfg.providers.weather.units.as_str(), "metric" | "imperial") {
		return Err(Error::Validation {
			message: "providers.weather.units must be one of metric or imperial.".to_string(),
		});
	}
	if cfg.weather.cache_ttl_secs == 0 {
		return Err(Error::Validation {
			message: "weather.cache_ttl_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.weather.cities.is_empty() {
		return Err(Error::Validation {
			message: "weather.cities must be non-empty.".to_string(),
		});
	}

	for city in &cfg.weather.cities {
		if city.name.trim().is_empty() {
			return Err(Error::Validation {
				message: "weather.cities entries must have a non-empty name.".to_string(),
			});
		}
		if !(-90.0..=90.0).contains(&city.lat) {
			return Err(Error::Validation {
				message: format!("weather.cities {} lat must be in the range -90.0-90.0.", city.name),
			});
		}
		if !(-180.0..=180.0).contains(&city.lon) {
			return Err(Error::Validation {
				message: format!(
					"weather.cities {} lon must be in the range -180.0-180.0.",
					city.name
				),
			});
		}
	}

	if cfg.chat.message_ttl_days <= 0 {
		return Err(Error::Validation {
			message: "chat.message_ttl_days must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for key in [
		&mut cfg.providers.llm.api_key,
		&mut cfg.providers.memory.api_key,
		&mut cfg.providers.weather.api_key,
	] {
		if key.as_deref().map(|value| value.trim().is_empty()).unwrap_or(false) {
			*key = None;
		}
	}
}
