use std::collections::HashMap;

use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;

use hearth_config::{City, WeatherProviderConfig};
use hearth_providers::weather::CityWeather;

use crate::{Error, HearthService, Result, WeatherProvider};

#[derive(Debug)]
pub(crate) struct CachedReport {
	fetched_at: OffsetDateTime,
	report: CityWeather,
}

impl HearthService {
	/// Aggregate current weather for every configured city.
	///
	/// A city whose upstream fetch fails is dropped from the response; the
	/// remaining cities keep their configured order. With every city failing
	/// the result is an empty list, not an error.
	pub async fn weather_cities(&self) -> Result<Vec<CityWeather>> {
		let Some(api_key) = self.cfg.providers.weather.api_key.as_deref() else {
			return Err(Error::MissingCredential { name: "TOMORROW_IO_API_KEY" });
		};
		let cache_ttl = Duration::seconds(self.cfg.weather.cache_ttl_secs as i64);

		Ok(collect_city_reports(
			&self.cfg.providers.weather,
			&self.cfg.weather.cities,
			cache_ttl,
			api_key,
			self.providers.weather.as_ref(),
			&self.weather_cache,
			OffsetDateTime::now_utc(),
		)
		.await)
	}
}

pub(crate) async fn collect_city_reports(
	cfg: &WeatherProviderConfig,
	cities: &[City],
	cache_ttl: Duration,
	api_key: &str,
	provider: &dyn WeatherProvider,
	cache: &RwLock<HashMap<String, CachedReport>>,
	now: OffsetDateTime,
) -> Vec<CityWeather> {
	let mut fresh: HashMap<String, CityWeather> = HashMap::new();
	{
		let cache = cache.read().await;

		for city in cities {
			if let Some(entry) = cache.get(&city.name)
				&& now - entry.fetched_at < cache_ttl
			{
				fresh.insert(city.name.clone(), entry.report.clone());
			}
		}
	}

	let pending: Vec<&City> =
		cities.iter().filter(|city| !fresh.contains_key(&city.name)).collect();
	let fetches = pending.iter().map(|city| provider.fetch_city(cfg, api_key, city));
	let outcomes = futures::future::join_all(fetches).await;
	let mut fetched: HashMap<String, CityWeather> = HashMap::new();

	for (city, outcome) in pending.iter().zip(outcomes) {
		match outcome {
			Ok(report) => {
				fetched.insert(city.name.clone(), report);
			},
			Err(error) => {
				tracing::warn!(
					%error,
					city = city.name.as_str(),
					"Dropping city after weather fetch failure."
				);
			},
		}
	}

	if !fetched.is_empty() {
		let mut cache = cache.write().await;

		for (name, report) in &fetched {
			cache.insert(
				name.clone(),
				CachedReport { fetched_at: now, report: report.clone() },
			);
		}
	}

	cities
		.iter()
		.filter_map(|city| fresh.get(&city.name).or_else(|| fetched.get(&city.name)).cloned())
		.collect()
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use crate::BoxFuture;

	use super::*;

	struct ScriptedWeather {
		failing: Vec<String>,
		calls: AtomicUsize,
	}

	impl ScriptedWeather {
		fn new(failing: &[&str]) -> Self {
			Self {
				failing: failing.iter().map(|name| name.to_string()).collect(),
				calls: AtomicUsize::new(0),
			}
		}

		fn call_count(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}

	impl WeatherProvider for ScriptedWeather {
		fn fetch_city<'a>(
			&'a self,
			_cfg: &'a WeatherProviderConfig,
			_api_key: &'a str,
			city: &'a City,
		) -> BoxFuture<'a, hearth_providers::Result<CityWeather>> {
			self.calls.fetch_add(1, Ordering::SeqCst);

			let outcome = if self.failing.contains(&city.name) {
				Err(hearth_providers::Error::InvalidResponse {
					message: format!("{} is down.", city.name),
				})
			} else {
				Ok(report_for(&city.name))
			};

			Box::pin(async move { outcome })
		}
	}

	fn report_for(city: &str) -> CityWeather {
		CityWeather {
			city: city.to_string(),
			temperature: 20,
			description: "Clear, Sunny".to_string(),
			rain_chance: 0,
			high: 25,
			low: 15,
			forecast: Vec::new(),
		}
	}

	fn provider_cfg() -> WeatherProviderConfig {
		WeatherProviderConfig {
			provider_id: "tomorrow".to_string(),
			api_base: "http://127.0.0.1:9".to_string(),
			api_key: Some("key".to_string()),
			realtime_path: "/v4/weather/realtime".to_string(),
			forecast_path: "/v4/weather/forecast".to_string(),
			units: "metric".to_string(),
			timeout_ms: 1_000,
		}
	}

	fn cities(names: &[&str]) -> Vec<City> {
		names
			.iter()
			.enumerate()
			.map(|(index, name)| City { name: name.to_string(), lat: index as f64, lon: 0.0 })
			.collect()
	}

	#[tokio::test]
	async fn failed_cities_are_dropped_and_order_is_kept() {
		let provider = ScriptedWeather::new(&["New York"]);
		let cache = RwLock::new(HashMap::new());
		let cities = cities(&["San Francisco", "New York", "London"]);
		let reports = collect_city_reports(
			&provider_cfg(),
			&cities,
			Duration::seconds(120),
			"key",
			&provider,
			&cache,
			OffsetDateTime::now_utc(),
		)
		.await;

		assert_eq!(reports.len(), 2);
		assert_eq!(reports[0].city, "San Francisco");
		assert_eq!(reports[1].city, "London");
	}

	#[tokio::test]
	async fn all_cities_failing_yields_empty() {
		let provider = ScriptedWeather::new(&["A", "B"]);
		let cache = RwLock::new(HashMap::new());
		let cities = cities(&["A", "B"]);
		let reports = collect_city_reports(
			&provider_cfg(),
			&cities,
			Duration::seconds(120),
			"key",
			&provider,
			&cache,
			OffsetDateTime::now_utc(),
		)
		.await;

		assert!(reports.is_empty());
	}

	#[tokio::test]
	async fn fresh_cache_entries_skip_the_upstream() {
		let provider = ScriptedWeather::new(&[]);
		let cache = RwLock::new(HashMap::new());
		let cities = cities(&["San Francisco", "London"]);
		let now = OffsetDateTime::now_utc();
		let ttl = Duration::seconds(120);

		let first =
			collect_city_reports(&provider_cfg(), &cities, ttl, "key", &provider, &cache, now)
				.await;

		assert_eq!(first.len(), 2);
		assert_eq!(provider.call_count(), 2);

		let second = collect_city_reports(
			&provider_cfg(),
			&cities,
			ttl,
			"key",
			&provider,
			&cache,
			now + Duration::seconds(30),
		)
		.await;

		assert_eq!(second.len(), 2);
		assert_eq!(provider.call_count(), 2);
	}

	#[tokio::test]
	async fn stale_cache_entries_are_refetched() {
		let provider = ScriptedWeather::new(&[]);
		let cache = RwLock::new(HashMap::new());
		let cities = cities(&["London"]);
		let now = OffsetDateTime::now_utc();
		let ttl = Duration::seconds(120);

		collect_city_reports(&provider_cfg(), &cities, ttl, "key", &provider, &cache, now).await;
		collect_city_reports(
			&provider_cfg(),
			&cities,
			ttl,
			"key",
			&provider,
			&cache,
			now + Duration::seconds(120),
		)
		.await;

		assert_eq!(provider.call_count(), 2);
	}

	#[tokio::test]
	async fn failures_do_not_poison_the_cache() {
		let provider = ScriptedWeather::new(&["London"]);
		let cache = RwLock::new(HashMap::new());
		let cities = cities(&["London"]);
		let now = OffsetDateTime::now_utc();
		let ttl = Duration::seconds(120);

		let first =
			collect_city_reports(&provider_cfg(), &cities, ttl, "key", &provider, &cache, now)
				.await;

		assert!(first.is_empty());

		// The failure left no cache entry, so the next call tries again.
		collect_city_reports(&provider_cfg(), &cities, ttl, "key", &provider, &cache, now).await;

		assert_eq!(provider.call_count(), 2);
	}
}
