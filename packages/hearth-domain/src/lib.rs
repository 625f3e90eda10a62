pub mod chat;
pub mod frequency;
pub mod priority;
pub mod retention;
pub mod weather;

pub use chat::{ChatRole, FALLBACK_REPLY, conversation_id, system_instruction};
pub use frequency::PayFrequency;
pub use priority::TaskPriority;
pub use retention::message_expiry;
pub use weather::condition_label;
