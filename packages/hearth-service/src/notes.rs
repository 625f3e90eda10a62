use time::OffsetDateTime;
use uuid::Uuid;

use hearth_storage::{models, queries};

use crate::{DeleteResponse, Error, HearthService, Result};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteItem {
	pub id: Uuid,
	pub user_id: String,
	pub title: String,
	pub content: String,
	pub tags: Vec<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}

impl From<models::Note> for NoteItem {
	fn from(note: models::Note) -> Self {
		Self {
			id: note.id,
			user_id: note.user_id,
			title: note.title,
			content: note.content,
			tags: note.tags,
			created_at: note.created_at,
		}
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
	pub title: String,
	pub content: String,
	#[serde(default)]
	pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
	pub title: Option<String>,
	pub content: Option<String>,
	pub tags: Option<Vec<String>>,
}

impl HearthService {
	pub async fn list_notes(&self, user_id: &str) -> Result<Vec<NoteItem>> {
		let notes = queries::list_notes(&self.db, user_id).await?;

		Ok(notes.into_iter().map(NoteItem::from).collect())
	}

	pub async fn create_note(&self, user_id: &str, req: CreateNoteRequest) -> Result<NoteItem> {
		if req.title.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "title is required.".to_string() });
		}

		let note = models::Note {
			id: Uuid::new_v4(),
			user_id: user_id.to_string(),
			title: req.title,
			content: req.content,
			tags: req.tags,
			created_at: OffsetDateTime::now_utc(),
		};

		queries::insert_note(&self.db, &note).await?;

		Ok(note.into())
	}

	pub async fn update_note(
		&self,
		user_id: &str,
		id: Uuid,
		req: UpdateNoteRequest,
	) -> Result<NoteItem> {
		if let Some(title) = req.title.as_ref()
			&& title.trim().is_empty()
		{
			return Err(Error::InvalidRequest { message: "title must not be empty.".to_string() });
		}

		let mut tx = self.db.pool.begin().await?;
		let Some(mut note) = queries::fetch_note_for_update(&mut tx, user_id, id).await? else {
			return Err(Error::NotFound { message: "Note not found.".to_string() });
		};

		if let Some(title) = req.title {
			note.title = title;
		}
		if let Some(content) = req.content {
			note.content = content;
		}
		if let Some(tags) = req.tags {
			note.tags = tags;
		}

		queries::update_note(&mut tx, &note).await?;
		tx.commit().await?;

		Ok(note.into())
	}

	pub async fn delete_note(&self, user_id: &str, id: Uuid) -> Result<DeleteResponse> {
		if !queries::delete_note(&self.db, user_id, id).await? {
			return Err(Error::NotFound { message: "Note not found.".to_string() });
		}

		Ok(DeleteResponse { success: true })
	}
}
