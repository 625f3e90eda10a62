use time::OffsetDateTime;
use uuid::Uuid;

use hearth_domain::TaskPriority;
use hearth_storage::{models, queries};

use crate::{DeleteResponse, Error, HearthService, Result};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
	pub id: Uuid,
	pub user_id: String,
	pub title: String,
	pub description: Option<String>,
	pub priority: TaskPriority,
	pub completed: bool,
	#[serde(default, with = "crate::time_serde::option")]
	pub due_date: Option<OffsetDateTime>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}

impl From<models::Task> for TaskItem {
	fn from(task: models::Task) -> Self {
		Self {
			id: task.id,
			user_id: task.user_id,
			title: task.title,
			description: task.description,
			priority: TaskPriority::parse(&task.priority).unwrap_or_default(),
			completed: task.completed,
			due_date: task.due_date,
			created_at: task.created_at,
		}
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
	pub title: String,
	pub description: Option<String>,
	pub priority: Option<TaskPriority>,
	#[serde(default, with = "crate::time_serde::option")]
	pub due_date: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
	pub title: Option<String>,
	pub description: Option<String>,
	pub priority: Option<TaskPriority>,
	pub completed: Option<bool>,
	#[serde(default, with = "crate::time_serde::option")]
	pub due_date: Option<OffsetDateTime>,
}

impl HearthService {
	pub async fn list_tasks(&self, user_id: &str) -> Result<Vec<TaskItem>> {
		let tasks = queries::list_tasks(&self.db, user_id).await?;

		Ok(tasks.into_iter().map(TaskItem::from).collect())
	}

	pub async fn create_task(&self, user_id: &str, req: CreateTaskRequest) -> Result<TaskItem> {
		if req.title.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "title is required.".to_string() });
		}

		let task = models::Task {
			id: Uuid::new_v4(),
			user_id: user_id.to_string(),
			title: req.title,
			description: req.description,
			priority: req.priority.unwrap_or_default().as_str().to_string(),
			completed: false,
			due_date: req.due_date,
			created_at: OffsetDateTime::now_utc(),
		};

		queries::insert_task(&self.db, &task).await?;

		Ok(task.into())
	}

	pub async fn update_task(
		&self,
		user_id: &str,
		id: Uuid,
		req: UpdateTaskRequest,
	) -> Result<TaskItem> {
		if let Some(title) = req.title.as_ref()
			&& title.trim().is_empty()
		{
			return Err(Error::InvalidRequest { message: "title must not be empty.".to_string() });
		}

		let mut tx = self.db.pool.begin().await?;
		let Some(mut task) = queries::fetch_task_for_update(&mut tx, user_id, id).await? else {
			return Err(Error::NotFound { message: "Task not found.".to_string() });
		};

		if let Some(title) = req.title {
			task.title = title;
		}
		if let Some(description) = req.description {
			task.description = Some(description);
		}
		if let Some(priority) = req.priority {
			task.priority = priority.as_str().to_string();
		}
		if let Some(completed) = req.completed {
			task.completed = completed;
		}
		if let Some(due_date) = req.due_date {
			task.due_date = Some(due_date);
		}

		queries::update_task(&mut tx, &task).await?;
		tx.commit().await?;

		Ok(task.into())
	}

	pub async fn delete_task(&self, user_id: &str, id: Uuid) -> Result<DeleteResponse> {
		if !queries::delete_task(&self.db, user_id, id).await? {
			return Err(Error::NotFound { message: "Task not found.".to_string() });
		}

		Ok(DeleteResponse { success: true })
	}
}
