use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::Result;

/// One remembered fact about the user, as the memory service stores it.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryRecord {
	pub id: Option<String>,
	pub memory: String,
}

/// Look up memories relevant to `query`.
///
/// The memory service is an optional enrichment. Without a credential, or when
/// the upstream misbehaves, this returns no records rather than an error.
pub async fn search(
	cfg: &hearth_config::MemoryProviderConfig,
	query: &str,
	user_id: &str,
) -> Vec<MemoryRecord> {
	let Some(api_key) = cfg.api_key.as_deref() else {
		return Vec::new();
	};

	match try_search(cfg, api_key, query, user_id).await {
		Ok(records) => records,
		Err(error) => {
			tracing::warn!(%error, "Memory search failed; continuing without memories.");

			Vec::new()
		},
	}
}

/// Persist a finished conversation turn. Best effort, same as [`search`].
pub async fn add(
	cfg: &hearth_config::MemoryProviderConfig,
	messages: &[Value],
	user_id: &str,
) -> Option<Value> {
	let Some(api_key) = cfg.api_key.as_deref() else {
		return None;
	};

	match try_add(cfg, api_key, messages, user_id).await {
		Ok(ack) => Some(ack),
		Err(error) => {
			tracing::warn!(%error, "Memory add failed; the turn was not recorded upstream.");

			None
		},
	}
}

async fn try_search(
	cfg: &hearth_config::MemoryProviderConfig,
	api_key: &str,
	query: &str,
	user_id: &str,
) -> Result<Vec<MemoryRecord>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.search_path);
	let body = serde_json::json!({ "query": query, "user_id": user_id });
	let res = client
		.post(url)
		.headers(crate::auth_headers(api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	Ok(parse_search_results(&json))
}

async fn try_add(
	cfg: &hearth_config::MemoryProviderConfig,
	api_key: &str,
	messages: &[Value],
	user_id: &str,
) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.add_path);
	let body = serde_json::json!({ "messages": messages, "user_id": user_id });
	let res = client
		.post(url)
		.headers(crate::auth_headers(api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	Ok(json)
}

fn parse_search_results(json: &Value) -> Vec<MemoryRecord> {
	let Some(items) =
		json.get("results").and_then(|v| v.as_array()).or_else(|| json.as_array())
	else {
		return Vec::new();
	};

	items
		.iter()
		.filter_map(|item| {
			let memory = item.get("memory").and_then(|v| v.as_str())?;
			let id = item.get("id").and_then(|v| v.as_str()).map(|v| v.to_string());

			Some(MemoryRecord { id, memory: memory.to_string() })
		})
		.collect()
}
