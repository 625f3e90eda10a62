use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Returned when the model answers with an empty choice list or empty content.
pub const FALLBACK_REPLY: &str = "I'm sorry, I couldn't generate a response.";

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
	User,
	Assistant,
}
impl ChatRole {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::User => "user",
			Self::Assistant => "assistant",
		}
	}
}

/// The system instruction for the assistant, with retrieved memory texts
/// appended when there are any.
pub fn system_instruction(agent_name: &str, memories: &[String]) -> String {
	let mut instruction = format!(
		"You are {agent_name}, a helpful AI assistant in a productivity dashboard. You help \
		 users manage their tasks, notes, and daily activities. Be friendly, concise, and \
		 helpful."
	);

	if !memories.is_empty() {
		instruction.push_str("\n\nRelevant memories: ");
		instruction.push_str(&memories.join(", "));
	}

	instruction
}

/// Conversation ids group one exchange. They are not stable across requests.
pub fn conversation_id(now: OffsetDateTime) -> String {
	let millis = now.unix_timestamp_nanos() / 1_000_000;

	format!("chat-{millis}")
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	#[test]
	fn instruction_names_the_assistant() {
		let instruction = system_instruction("Alex", &[]);

		assert!(instruction.starts_with("You are Alex, "));
		assert!(!instruction.contains("Relevant memories"));
	}

	#[test]
	fn instruction_appends_memories() {
		let memories = vec!["Likes tea".to_string(), "Works remotely".to_string()];
		let instruction = system_instruction("Aria", &memories);

		assert!(instruction.ends_with("Relevant memories: Likes tea, Works remotely"));
	}

	#[test]
	fn conversation_id_uses_epoch_millis() {
		let id = conversation_id(datetime!(2024-06-10 00:00:00 UTC));

		assert_eq!(id, "chat-1717977600000");
	}

	#[test]
	fn chat_roles_round_trip() {
		assert_eq!(ChatRole::User.as_str(), "user");
		assert_eq!(
			serde_json::from_str::<ChatRole>("\"assistant\"").expect("Failed to deserialize."),
			ChatRole::Assistant
		);
		assert!(serde_json::from_str::<ChatRole>("\"system\"").is_err());
	}
}
