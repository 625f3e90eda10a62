use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{Error, Result};

/// Current conditions plus a short hourly outlook for one city.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityWeather {
	pub city: String,
	pub temperature: i64,
	pub description: String,
	pub rain_chance: i64,
	pub high: i64,
	pub low: i64,
	pub forecast: Vec<ForecastHour>,
}

#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastHour {
	pub time: u8,
	pub temperature: i64,
	pub rain_chance: i64,
	pub weather_code: i64,
}

/// Fetch and summarize the weather for one city.
///
/// Realtime conditions and the hourly forecast are separate upstream calls,
/// issued concurrently. The caller decides what a failure means for the
/// overall response.
pub async fn fetch_city(
	cfg: &hearth_config::WeatherProviderConfig,
	api_key: &str,
	city: &hearth_config::City,
) -> Result<CityWeather> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let location = format!("{},{}", city.lat, city.lon);
	let realtime_query =
		[("location", location.as_str()), ("apikey", api_key), ("units", cfg.units.as_str())];
	let realtime = fetch_json(
		&client,
		format!("{}{}", cfg.api_base, cfg.realtime_path),
		&realtime_query,
	);
	let forecast_query = [
		("location", location.as_str()),
		("apikey", api_key),
		("units", cfg.units.as_str()),
		("timesteps", "1h"),
	];
	let forecast = fetch_json(
		&client,
		format!("{}{}", cfg.api_base, cfg.forecast_path),
		&forecast_query,
	);
	let (realtime, forecast) = tokio::try_join!(realtime, forecast)?;

	summarize(&city.name, &realtime, &forecast)
}

async fn fetch_json(client: &Client, url: String, query: &[(&str, &str)]) -> Result<Value> {
	let res = client.get(url).query(query).send().await?;
	let json = res.error_for_status()?.json().await?;

	Ok(json)
}

fn summarize(city: &str, realtime: &Value, forecast: &Value) -> Result<CityWeather> {
	let values = realtime.pointer("/data/values").ok_or_else(|| Error::InvalidResponse {
		message: format!("Realtime payload for {city} is missing data.values."),
	})?;
	let temperature =
		values.get("temperature").and_then(Value::as_f64).ok_or_else(|| Error::InvalidResponse {
			message: format!("Realtime payload for {city} is missing temperature."),
		})?;
	let code = values.get("weatherCode").and_then(Value::as_i64).unwrap_or(0);
	let rain_chance =
		values.get("precipitationProbability").and_then(Value::as_f64).unwrap_or(0.0);
	let high =
		values.get("temperatureMax").and_then(Value::as_f64).unwrap_or(temperature + 5.0);
	let low = values.get("temperatureMin").and_then(Value::as_f64).unwrap_or(temperature - 5.0);
	let outlook = forecast
		.pointer("/data/timelines/0/intervals")
		.and_then(Value::as_array)
		.map(|intervals| hourly_outlook(intervals))
		.unwrap_or_default();

	Ok(CityWeather {
		city: city.to_string(),
		temperature: temperature.round() as i64,
		description: hearth_domain::condition_label(code).to_string(),
		rain_chance: rain_chance.round() as i64,
		high: high.round() as i64,
		low: low.round() as i64,
		forecast: outlook,
	})
}

// The first interval duplicates current conditions; the outlook starts one
// hour out and covers twelve hours.
fn hourly_outlook(intervals: &[Value]) -> Vec<ForecastHour> {
	intervals
		.iter()
		.skip(1)
		.take(12)
		.filter_map(|interval| {
			let values = interval.get("values")?;
			let temperature = values.get("temperature").and_then(Value::as_f64)?;
			let time = interval
				.get("startTime")
				.and_then(Value::as_str)
				.and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
				.map(|start| start.hour())?;

			Some(ForecastHour {
				time,
				temperature: temperature.round() as i64,
				rain_chance: values
					.get("precipitationProbability")
					.and_then(Value::as_f64)
					.unwrap_or(0.0)
					.round() as i64,
				weather_code: values.get("weatherCode").and_then(Value::as_i64).unwrap_or(0),
			})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn realtime_payload() -> Value {
		serde_json::json!({
			"data": {
				"values": {
					"temperature": 18.4,
					"weatherCode": 1101,
					"precipitationProbability": 23.6,
					"temperatureMax": 21.2,
					"temperatureMin": 12.8
				}
			}
		})
	}

	fn forecast_payload() -> Value {
		let intervals: Vec<Value> = (0..20)
			.map(|hour| {
				serde_json::json!({
					"startTime": format!("2025-03-01T{hour:02}:00:00Z"),
					"values": {
						"temperature": 10.0 + hour as f64,
						"precipitationProbability": 5.0,
						"weatherCode": 1000
					}
				})
			})
			.collect();

		serde_json::json!({ "data": { "timelines": [ { "intervals": intervals } ] } })
	}

	#[test]
	fn summarizes_realtime_and_outlook() {
		let summary = summarize("San Francisco", &realtime_payload(), &forecast_payload())
			.expect("Failed to summarize.");

		assert_eq!(summary.city, "San Francisco");
		assert_eq!(summary.temperature, 18);
		assert_eq!(summary.description, "Partly Cloudy");
		assert_eq!(summary.rain_chance, 24);
		assert_eq!(summary.high, 21);
		assert_eq!(summary.low, 13);
		assert_eq!(summary.forecast.len(), 12);
		assert_eq!(summary.forecast[0].time, 1);
		assert_eq!(summary.forecast[0].temperature, 11);
		assert_eq!(summary.forecast[11].time, 12);
	}

	#[test]
	fn missing_extremes_fall_back_to_current_temperature() {
		let realtime = serde_json::json!({
			"data": { "values": { "temperature": 10.0, "weatherCode": 1000 } }
		});
		let summary = summarize("London", &realtime, &serde_json::json!({}))
			.expect("Failed to summarize.");

		assert_eq!(summary.high, 15);
		assert_eq!(summary.low, 5);
		assert_eq!(summary.rain_chance, 0);
		assert!(summary.forecast.is_empty());
	}

	#[test]
	fn unknown_condition_codes_get_a_label() {
		let realtime = serde_json::json!({
			"data": { "values": { "temperature": 1.2, "weatherCode": 31337 } }
		});
		let summary =
			summarize("Oslo", &realtime, &serde_json::json!({})).expect("Failed to summarize.");

		assert_eq!(summary.description, "Unknown");
	}

	#[test]
	fn missing_realtime_values_are_an_error() {
		let result = summarize("Paris", &serde_json::json!({ "data": {} }), &serde_json::json!({}));

		assert!(result.is_err());
	}

	#[test]
	fn malformed_intervals_are_dropped() {
		let forecast = serde_json::json!({
			"data": { "timelines": [ { "intervals": [
				{ "startTime": "2025-03-01T00:00:00Z", "values": { "temperature": 9.0 } },
				{ "startTime": "2025-03-01T01:00:00Z", "values": { "temperature": 8.0 } },
				{ "startTime": "not-a-timestamp", "values": { "temperature": 8.0 } },
				{ "startTime": "2025-03-01T03:00:00Z", "values": {} }
			] } ] }
		});
		let summary = summarize("Berlin", &realtime_payload(), &forecast)
			.expect("Failed to summarize.");

		assert_eq!(summary.forecast.len(), 1);
		assert_eq!(summary.forecast[0].time, 1);
		assert_eq!(summary.forecast[0].rain_chance, 0);
		assert_eq!(summary.forecast[0].weather_code, 0);
	}
}
