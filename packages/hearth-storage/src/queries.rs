use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
	Result,
	db::Db,
	models::{ChatMessage, Note, Preferences, Task},
};

pub async fn list_notes(db: &Db, user_id: &str) -> Result<Vec<Note>> {
	let notes = sqlx::query_as::<_, Note>(
		"\
SELECT id, user_id, title, content, tags, created_at
FROM notes
WHERE user_id = $1
ORDER BY created_at DESC",
	)
	.bind(user_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(notes)
}

pub async fn insert_note(db: &Db, note: &Note) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO notes (id, user_id, title, content, tags, created_at)
VALUES ($1, $2, $3, $4, $5, $6)",
	)
	.bind(note.id)
	.bind(note.user_id.as_str())
	.bind(note.title.as_str())
	.bind(note.content.as_str())
	.bind(&note.tags)
	.bind(note.created_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn fetch_note_for_update(
	tx: &mut Transaction<'_, Postgres>,
	user_id: &str,
	id: Uuid,
) -> Result<Option<Note>> {
	let note = sqlx::query_as::<_, Note>(
		"\
SELECT id, user_id, title, content, tags, created_at
FROM notes
WHERE id = $1
	AND user_id = $2
FOR UPDATE",
	)
	.bind(id)
	.bind(user_id)
	.fetch_optional(&mut **tx)
	.await?;

	Ok(note)
}

pub async fn update_note(tx: &mut Transaction<'_, Postgres>, note: &Note) -> Result<()> {
	sqlx::query(
		"\
UPDATE notes
SET title = $1,
	content = $2,
	tags = $3
WHERE id = $4
	AND user_id = $5",
	)
	.bind(note.title.as_str())
	.bind(note.content.as_str())
	.bind(&note.tags)
	.bind(note.id)
	.bind(note.user_id.as_str())
	.execute(&mut **tx)
	.await?;

	Ok(())
}

pub async fn delete_note(db: &Db, user_id: &str, id: Uuid) -> Result<bool> {
	let result = sqlx::query(
		"\
DELETE FROM notes
WHERE id = $1
	AND user_id = $2",
	)
	.bind(id)
	.bind(user_id)
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn list_tasks(db: &Db, user_id: &str) -> Result<Vec<Task>> {
	let tasks = sqlx::query_as::<_, Task>(
		"\
SELECT id, user_id, title, description, priority, completed, due_date, created_at
FROM tasks
WHERE user_id = $1
ORDER BY created_at DESC",
	)
	.bind(user_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(tasks)
}

pub async fn insert_task(db: &Db, task: &Task) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO tasks (id, user_id, title, description, priority, completed, due_date, created_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
	)
	.bind(task.id)
	.bind(task.user_id.as_str())
	.bind(task.title.as_str())
	.bind(task.description.as_deref())
	.bind(task.priority.as_str())
	.bind(task.completed)
	.bind(task.due_date)
	.bind(task.created_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn fetch_task_for_update(
	tx: &mut Transaction<'_, Postgres>,
	user_id: &str,
	id: Uuid,
) -> Result<Option<Task>> {
	let task = sqlx::query_as::<_, Task>(
		"\
SELECT id, user_id, title, description, priority, completed, due_date, created_at
FROM tasks
WHERE id = $1
	AND user_id = $2
FOR UPDATE",
	)
	.bind(id)
	.bind(user_id)
	.fetch_optional(&mut **tx)
	.await?;

	Ok(task)
}

pub async fn update_task(tx: &mut Transaction<'_, Postgres>, task: &Task) -> Result<()> {
	sqlx::query(
		"\
UPDATE tasks
SET title = $1,
	description = $2,
	priority = $3,
	completed = $4,
	due_date = $5
WHERE id = $6
	AND user_id = $7",
	)
	.bind(task.title.as_str())
	.bind(task.description.as_deref())
	.bind(task.priority.as_str())
	.bind(task.completed)
	.bind(task.due_date)
	.bind(task.id)
	.bind(task.user_id.as_str())
	.execute(&mut **tx)
	.await?;

	Ok(())
}

pub async fn delete_task(db: &Db, user_id: &str, id: Uuid) -> Result<bool> {
	let result = sqlx::query(
		"\
DELETE FROM tasks
WHERE id = $1
	AND user_id = $2",
	)
	.bind(id)
	.bind(user_id)
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn fetch_preferences(db: &Db, user_id: &str) -> Result<Option<Preferences>> {
	let preferences = sqlx::query_as::<_, Preferences>(
		"\
SELECT id, user_id, agent_name, user_name, initialized, payday_date, payday_frequency, salary,
	expenses, location
FROM user_preferences
WHERE user_id = $1",
	)
	.bind(user_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(preferences)
}

/// Races with concurrent lazy creation are settled by the unique user_id.
pub async fn insert_default_preferences(db: &Db, preferences: &Preferences) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO user_preferences (id, user_id, agent_name, user_name, initialized, payday_date,
	payday_frequency, salary, expenses, location)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
ON CONFLICT (user_id) DO NOTHING",
	)
	.bind(preferences.id)
	.bind(preferences.user_id.as_str())
	.bind(preferences.agent_name.as_str())
	.bind(preferences.user_name.as_str())
	.bind(preferences.initialized)
	.bind(preferences.payday_date)
	.bind(preferences.payday_frequency.as_str())
	.bind(preferences.salary)
	.bind(preferences.expenses)
	.bind(preferences.location.as_str())
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn fetch_preferences_for_update(
	tx: &mut Transaction<'_, Postgres>,
	user_id: &str,
) -> Result<Option<Preferences>> {
	let preferences = sqlx::query_as::<_, Preferences>(
		"\
SELECT id, user_id, agent_name, user_name, initialized, payday_date, payday_frequency, salary,
	expenses, location
FROM user_preferences
WHERE user_id = $1
FOR UPDATE",
	)
	.bind(user_id)
	.fetch_optional(&mut **tx)
	.await?;

	Ok(preferences)
}

pub async fn update_preferences(
	tx: &mut Transaction<'_, Postgres>,
	preferences: &Preferences,
) -> Result<()> {
	sqlx::query(
		"\
UPDATE user_preferences
SET agent_name = $1,
	user_name = $2,
	initialized = $3,
	payday_date = $4,
	payday_frequency = $5,
	salary = $6,
	expenses = $7,
	location = $8
WHERE user_id = $9",
	)
	.bind(preferences.agent_name.as_str())
	.bind(preferences.user_name.as_str())
	.bind(preferences.initialized)
	.bind(preferences.payday_date)
	.bind(preferences.payday_frequency.as_str())
	.bind(preferences.salary)
	.bind(preferences.expenses)
	.bind(preferences.location.as_str())
	.bind(preferences.user_id.as_str())
	.execute(&mut **tx)
	.await?;

	Ok(())
}

pub async fn insert_chat_message(db: &Db, message: &ChatMessage) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO chat_messages (id, user_id, message, role, session_id, created_at, expires_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(message.id)
	.bind(message.user_id.as_str())
	.bind(message.message.as_str())
	.bind(message.role.as_str())
	.bind(message.session_id.as_deref())
	.bind(message.created_at)
	.bind(message.expires_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn list_chat_messages(
	db: &Db,
	user_id: &str,
	session_id: &str,
) -> Result<Vec<ChatMessage>> {
	let messages = sqlx::query_as::<_, ChatMessage>(
		"\
SELECT id, user_id, message, role, session_id, created_at, expires_at
FROM chat_messages
WHERE user_id = $1
	AND session_id = $2
ORDER BY created_at",
	)
	.bind(user_id)
	.bind(session_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(messages)
}
