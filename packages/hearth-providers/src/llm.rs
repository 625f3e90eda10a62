use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Ask the configured chat-completion endpoint for a reply.
///
/// Returns `None` when the upstream answers without usable message content so
/// the caller can substitute its own fallback text.
pub async fn complete(
	cfg: &hearth_config::LlmProviderConfig,
	messages: &[Value],
) -> Result<Option<String>> {
	let Some(api_key) = cfg.api_key.as_deref() else {
		return Err(Error::MissingCredential { name: "OPENAI_API_KEY" });
	};
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"messages": messages,
		"max_tokens": cfg.max_tokens,
		"temperature": cfg.temperature,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	Ok(parse_completion(&json))
}

fn parse_completion(json: &Value) -> Option<String> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|content| content.as_str())
		.map(|content| content.to_string())
}
