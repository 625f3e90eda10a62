use time::OffsetDateTime;
use uuid::Uuid;

use hearth_config::Postgres;
use hearth_storage::{
	db::Db,
	models::{ChatMessage, Note, Preferences, Task},
	queries,
};
use hearth_testkit::TestDatabase;

const USER_ID: &str = "demo-user";

async fn test_env() -> Option<TestDatabase> {
	let base_dsn = match hearth_testkit::env_dsn() {
		Some(value) => value,
		None => {
			eprintln!("Skipping storage tests; set HEARTH_PG_DSN to run this test.");

			return None;
		},
	};

	Some(TestDatabase::new(&base_dsn).await.expect("Failed to create test database."))
}

async fn connect(test_db: &TestDatabase) -> Db {
	let db = Db::connect(&Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 })
		.await
		.expect("Failed to connect to test database.");

	db.ensure_schema().await.expect("Failed to apply schema.");

	db
}

fn sample_note() -> Note {
	Note {
		id: Uuid::new_v4(),
		user_id: USER_ID.to_string(),
		title: "Grocery list".to_string(),
		content: "Oat milk, bread, coffee".to_string(),
		tags: vec!["errands".to_string()],
		created_at: OffsetDateTime::now_utc(),
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HEARTH_PG_DSN to run."]
async fn schema_bootstrap_is_idempotent() {
	let Some(test_db) = test_env().await else {
		return;
	};
	let db = connect(&test_db).await;

	db.ensure_schema().await.expect("Second ensure_schema must succeed.");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HEARTH_PG_DSN to run."]
async fn notes_round_trip() {
	let Some(test_db) = test_env().await else {
		return;
	};
	let db = connect(&test_db).await;
	let note = sample_note();

	queries::insert_note(&db, &note).await.expect("Failed to insert note.");

	let listed = queries::list_notes(&db, USER_ID).await.expect("Failed to list notes.");

	assert_eq!(listed.len(), 1);
	assert_eq!(listed[0].id, note.id);
	assert_eq!(listed[0].tags, vec!["errands".to_string()]);

	let mut tx = db.pool.begin().await.expect("Failed to begin transaction.");
	let mut loaded = queries::fetch_note_for_update(&mut tx, USER_ID, note.id)
		.await
		.expect("Failed to fetch note.")
		.expect("Note must exist.");

	loaded.title = "Grocery run".to_string();
	queries::update_note(&mut tx, &loaded).await.expect("Failed to update note.");
	tx.commit().await.expect("Failed to commit.");

	let listed = queries::list_notes(&db, USER_ID).await.expect("Failed to list notes.");

	assert_eq!(listed[0].title, "Grocery run");
	assert!(queries::delete_note(&db, USER_ID, note.id).await.expect("Failed to delete note."));
	assert!(!queries::delete_note(&db, USER_ID, note.id).await.expect("Failed to delete note."));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HEARTH_PG_DSN to run."]
async fn notes_are_scoped_by_user() {
	let Some(test_db) = test_env().await else {
		return;
	};
	let db = connect(&test_db).await;
	let note = sample_note();

	queries::insert_note(&db, &note).await.expect("Failed to insert note.");

	let other = queries::list_notes(&db, "someone-else").await.expect("Failed to list notes.");

	assert!(other.is_empty());
	assert!(
		!queries::delete_note(&db, "someone-else", note.id)
			.await
			.expect("Failed to delete note.")
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HEARTH_PG_DSN to run."]
async fn tasks_round_trip() {
	let Some(test_db) = test_env().await else {
		return;
	};
	let db = connect(&test_db).await;
	let task = Task {
		id: Uuid::new_v4(),
		user_id: USER_ID.to_string(),
		title: "File expenses".to_string(),
		description: None,
		priority: "high".to_string(),
		completed: false,
		due_date: Some(OffsetDateTime::now_utc()),
		created_at: OffsetDateTime::now_utc(),
	};

	queries::insert_task(&db, &task).await.expect("Failed to insert task.");

	let mut tx = db.pool.begin().await.expect("Failed to begin transaction.");
	let mut loaded = queries::fetch_task_for_update(&mut tx, USER_ID, task.id)
		.await
		.expect("Failed to fetch task.")
		.expect("Task must exist.");

	loaded.completed = true;
	loaded.description = Some("Q2 receipts".to_string());
	queries::update_task(&mut tx, &loaded).await.expect("Failed to update task.");
	tx.commit().await.expect("Failed to commit.");

	let listed = queries::list_tasks(&db, USER_ID).await.expect("Failed to list tasks.");

	assert_eq!(listed.len(), 1);
	assert!(listed[0].completed);
	assert_eq!(listed[0].description.as_deref(), Some("Q2 receipts"));
	assert_eq!(listed[0].priority, "high");
	assert!(queries::delete_task(&db, USER_ID, task.id).await.expect("Failed to delete task."));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HEARTH_PG_DSN to run."]
async fn default_preferences_insert_once() {
	let Some(test_db) = test_env().await else {
		return;
	};
	let db = connect(&test_db).await;

	assert!(
		queries::fetch_preferences(&db, USER_ID)
			.await
			.expect("Failed to fetch preferences.")
			.is_none()
	);

	let defaults = Preferences {
		id: Uuid::new_v4(),
		user_id: USER_ID.to_string(),
		agent_name: "Alex".to_string(),
		user_name: "User".to_string(),
		initialized: false,
		payday_date: None,
		payday_frequency: "bi-weekly".to_string(),
		salary: 0,
		expenses: 2_000,
		location: "San Francisco, CA".to_string(),
	};

	queries::insert_default_preferences(&db, &defaults)
		.await
		.expect("Failed to insert preferences.");

	// A second lazy creation must not replace the row.
	let duplicate = Preferences { id: Uuid::new_v4(), agent_name: "Robot".to_string(), ..defaults };

	queries::insert_default_preferences(&db, &duplicate)
		.await
		.expect("Duplicate insert must be a no-op.");

	let stored = queries::fetch_preferences(&db, USER_ID)
		.await
		.expect("Failed to fetch preferences.")
		.expect("Preferences must exist.");

	assert_eq!(stored.agent_name, "Alex");

	let mut tx = db.pool.begin().await.expect("Failed to begin transaction.");
	let mut loaded = queries::fetch_preferences_for_update(&mut tx, USER_ID)
		.await
		.expect("Failed to fetch preferences.")
		.expect("Preferences must exist.");

	loaded.agent_name = "Aria".to_string();
	loaded.initialized = true;
	queries::update_preferences(&mut tx, &loaded).await.expect("Failed to update preferences.");
	tx.commit().await.expect("Failed to commit.");

	let stored = queries::fetch_preferences(&db, USER_ID)
		.await
		.expect("Failed to fetch preferences.")
		.expect("Preferences must exist.");

	assert_eq!(stored.agent_name, "Aria");
	assert!(stored.initialized);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set HEARTH_PG_DSN to run."]
async fn chat_messages_group_by_session() {
	let Some(test_db) = test_env().await else {
		return;
	};
	let db = connect(&test_db).await;
	let now = OffsetDateTime::now_utc();
	let session_id = "chat-1718000000000";

	for (offset, (role, text)) in
		[("user", "hello"), ("assistant", "hi there")].into_iter().enumerate()
	{
		let created_at = now + time::Duration::milliseconds(offset as i64);
		let message = ChatMessage {
			id: Uuid::new_v4(),
			user_id: USER_ID.to_string(),
			message: text.to_string(),
			role: role.to_string(),
			session_id: Some(session_id.to_string()),
			created_at,
			expires_at: created_at + time::Duration::days(3),
		};

		queries::insert_chat_message(&db, &message).await.expect("Failed to insert message.");
	}

	let messages = queries::list_chat_messages(&db, USER_ID, session_id)
		.await
		.expect("Failed to list messages.");

	assert_eq!(messages.len(), 2);
	assert_eq!(messages[0].role, "user");
	assert_eq!(messages[1].role, "assistant");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
