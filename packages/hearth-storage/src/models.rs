use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct Note {
	pub id: Uuid,
	pub user_id: String,
	pub title: String,
	pub content: String,
	pub tags: Vec<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct Task {
	pub id: Uuid,
	pub user_id: String,
	pub title: String,
	pub description: Option<String>,
	pub priority: String,
	pub completed: bool,
	pub due_date: Option<OffsetDateTime>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct Preferences {
	pub id: Uuid,
	pub user_id: String,
	pub agent_name: String,
	pub user_name: String,
	pub initialized: bool,
	pub payday_date: Option<OffsetDateTime>,
	pub payday_frequency: String,
	pub salary: i64,
	pub expenses: i64,
	pub location: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ChatMessage {
	pub id: Uuid,
	pub user_id: String,
	pub message: String,
	pub role: String,
	pub session_id: Option<String>,
	pub created_at: OffsetDateTime,
	pub expires_at: OffsetDateTime,
}
