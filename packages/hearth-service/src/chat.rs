use time::OffsetDateTime;
use uuid::Uuid;

use hearth_domain::{ChatRole, FALLBACK_REPLY, conversation_id, message_expiry, system_instruction};
use hearth_storage::{models, queries};

use crate::{Error, HearthService, Result, preferences};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
	pub message: String,
	#[serde(default)]
	pub conversation_history: Vec<ChatTurn>,
}

/// One prior turn supplied by the client. Roles other than user/assistant are
/// rejected at deserialization.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChatTurn {
	pub role: ChatRole,
	pub content: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
	pub response: String,
	pub conversation_id: String,
	/// Reserved for assistant-triggered actions. The pipeline never sets it
	/// today; absent slots are left off the wire.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub side_effect: Option<ChatSideEffect>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ChatSideEffect {
	NoteCreated { id: Uuid },
	TaskCreated { id: Uuid },
}

impl HearthService {
	pub async fn chat(&self, user_id: &str, req: ChatRequest) -> Result<ChatResponse> {
		if req.message.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "Message is required.".to_string() });
		}

		let received_at = OffsetDateTime::now_utc();
		let prefs = preferences::get_or_create(&self.db, &self.cfg, user_id).await?;
		let memories = self
			.providers
			.memory
			.search(&self.cfg.providers.memory, &req.message, user_id)
			.await;
		let memory_texts: Vec<String> =
			memories.into_iter().map(|record| record.memory).collect();
		let system = system_instruction(&prefs.agent_name, &memory_texts);

		let mut messages = Vec::with_capacity(req.conversation_history.len() + 2);

		messages.push(serde_json::json!({ "role": "system", "content": system }));

		for turn in &req.conversation_history {
			messages
				.push(serde_json::json!({ "role": turn.role.as_str(), "content": turn.content }));
		}

		messages.push(serde_json::json!({ "role": "user", "content": req.message }));

		let content = self.providers.llm.complete(&self.cfg.providers.llm, &messages).await?;
		let response = content.unwrap_or_else(|| FALLBACK_REPLY.to_string());

		let answered_at = OffsetDateTime::now_utc();
		let conversation_id = conversation_id(answered_at);

		self.record_exchange(
			user_id,
			&req.message,
			&response,
			&conversation_id,
			received_at,
			answered_at,
		)
		.await;

		Ok(ChatResponse { response, conversation_id, side_effect: None })
	}

	/// Remember the exchange, in the memory service and in chat_messages.
	/// Both writes are best effort; the reply already exists and is returned
	/// no matter what happens here.
	async fn record_exchange(
		&self,
		user_id: &str,
		message: &str,
		response: &str,
		conversation_id: &str,
		received_at: OffsetDateTime,
		answered_at: OffsetDateTime,
	) {
		let turns = [
			serde_json::json!({ "role": "user", "content": message }),
			serde_json::json!({ "role": "assistant", "content": response }),
		];

		self.providers.memory.add(&self.cfg.providers.memory, &turns, user_id).await;

		let ttl_days = self.cfg.chat.message_ttl_days;
		let rows = [
			(ChatRole::User, message, received_at),
			(ChatRole::Assistant, response, answered_at),
		];

		for (role, text, created_at) in rows {
			let row = models::ChatMessage {
				id: Uuid::new_v4(),
				user_id: user_id.to_string(),
				message: text.to_string(),
				role: role.as_str().to_string(),
				session_id: Some(conversation_id.to_string()),
				created_at,
				expires_at: message_expiry(created_at, ttl_days),
			};

			if let Err(error) = queries::insert_chat_message(&self.db, &row).await {
				tracing::warn!(%error, role = role.as_str(), "Failed to persist chat message.");
			}
		}
	}
}
