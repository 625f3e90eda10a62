use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, patch, post},
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use hearth_service::{
	CalendarEvent, ChatRequest, ChatResponse, CityWeather, CreateNoteRequest, CreateTaskRequest,
	DeleteResponse, Error as ServiceError, NoteItem, PreferencesView, TaskItem, UpdateNoteRequest,
	UpdatePreferencesRequest, UpdateTaskRequest,
};

use crate::state::AppState;

/// User-safe line chat clients can render when the model call fails.
const UPSTREAM_APOLOGY: &str = "I'm experiencing some technical difficulties. Please try again.";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/notes", get(list_notes).post(create_note))
		.route("/api/notes/{id}", patch(update_note).put(update_note).delete(delete_note))
		.route("/api/tasks", get(list_tasks).post(create_task))
		.route("/api/tasks/{id}", patch(update_task).put(update_task).delete(delete_task))
		.route(
			"/api/preferences",
			get(get_preferences).patch(update_preferences).put(update_preferences),
		)
		.route("/api/calendar", get(calendar))
		.route("/api/weather/cities", get(weather_cities))
		.route("/api/chat", post(chat))
		.route("/api/auth/user", get(auth_user))
		.layer(CorsLayer::permissive())
		.with_state(state)
}

async fn health() -> Json<serde_json::Value> {
	Json(serde_json::json!({ "status": "ok" }))
}

async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<NoteItem>>, ApiError> {
	let notes = state.service.list_notes(state.user_id()).await?;

	Ok(Json(notes))
}

async fn create_note(
	State(state): State<AppState>,
	Json(payload): Json<CreateNoteRequest>,
) -> Result<Json<NoteItem>, ApiError> {
	let note = state.service.create_note(state.user_id(), payload).await?;

	Ok(Json(note))
}

async fn update_note(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(payload): Json<UpdateNoteRequest>,
) -> Result<Json<NoteItem>, ApiError> {
	let note = state.service.update_note(state.user_id(), id, payload).await?;

	Ok(Json(note))
}

async fn delete_note(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
	let outcome = state.service.delete_note(state.user_id(), id).await?;

	Ok(Json(outcome))
}

async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<TaskItem>>, ApiError> {
	let tasks = state.service.list_tasks(state.user_id()).await?;

	Ok(Json(tasks))
}

async fn create_task(
	State(state): State<AppState>,
	Json(payload): Json<CreateTaskRequest>,
) -> Result<Json<TaskItem>, ApiError> {
	let task = state.service.create_task(state.user_id(), payload).await?;

	Ok(Json(task))
}

async fn update_task(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<TaskItem>, ApiError> {
	let task = state.service.update_task(state.user_id(), id, payload).await?;

	Ok(Json(task))
}

async fn delete_task(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
	let outcome = state.service.delete_task(state.user_id(), id).await?;

	Ok(Json(outcome))
}

async fn get_preferences(State(state): State<AppState>) -> Result<Json<PreferencesView>, ApiError> {
	let preferences = state.service.get_preferences(state.user_id()).await?;

	Ok(Json(preferences))
}

async fn update_preferences(
	State(state): State<AppState>,
	Json(payload): Json<UpdatePreferencesRequest>,
) -> Result<Json<PreferencesView>, ApiError> {
	let preferences = state.service.update_preferences(state.user_id(), payload).await?;

	Ok(Json(preferences))
}

async fn calendar(State(state): State<AppState>) -> Json<Vec<CalendarEvent>> {
	Json(state.service.calendar_events())
}

async fn weather_cities(State(state): State<AppState>) -> Result<Json<Vec<CityWeather>>, ApiError> {
	let reports = state.service.weather_cities().await?;

	Ok(Json(reports))
}

async fn chat(
	State(state): State<AppState>,
	Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
	let response = state.service.chat(state.user_id(), payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct UserRecord {
	id: String,
	name: String,
	email: String,
	picture: Option<String>,
}

async fn auth_user(State(state): State<AppState>) -> Json<UserRecord> {
	let identity = &state.service.cfg.identity;

	Json(UserRecord {
		id: identity.user_id.clone(),
		name: identity.user_name.clone(),
		email: identity.email.clone(),
		picture: None,
	})
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: ErrorDetail,
	#[serde(skip_serializing_if = "Option::is_none")]
	response: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
	code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	code: String,
	message: String,
	response: Option<String>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		code: impl Into<String>,
		message: impl Into<String>,
		response: Option<String>,
	) -> Self {
		Self { status, code: code.into(), message: message.into(), response }
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	response: Option<String>,
) -> ApiError {
	ApiError::new(status, code, message, response)
}

impl From<ServiceError> for ApiError {
	fn from(error: ServiceError) -> Self {
		match error {
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message, None),
			error @ ServiceError::MissingCredential { .. } => json_error(
				StatusCode::INTERNAL_SERVER_ERROR,
				"configuration_error",
				error.to_string(),
				None,
			),
			ServiceError::Upstream { message } => {
				tracing::error!(%message, "Upstream provider request failed.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"upstream_error",
					"The upstream provider request failed.",
					Some(UPSTREAM_APOLOGY.to_string()),
				)
			},
			ServiceError::Storage { message } => {
				tracing::error!(%message, "Storage operation failed.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"internal_error",
					"Internal server error.",
					None,
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			error: ErrorDetail { code: self.code, message: self.message },
			response: self.response,
		};

		(self.status, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn service_errors_map_to_stable_codes() {
		let cases = [
			(
				ServiceError::InvalidRequest { message: "Message is required.".to_string() },
				StatusCode::BAD_REQUEST,
				"invalid_request",
			),
			(
				ServiceError::NotFound { message: "Note not found.".to_string() },
				StatusCode::NOT_FOUND,
				"not_found",
			),
			(
				ServiceError::MissingCredential { name: "OPENAI_API_KEY" },
				StatusCode::INTERNAL_SERVER_ERROR,
				"configuration_error",
			),
			(
				ServiceError::Upstream { message: "timeout".to_string() },
				StatusCode::INTERNAL_SERVER_ERROR,
				"upstream_error",
			),
			(
				ServiceError::Storage { message: "pool exhausted".to_string() },
				StatusCode::INTERNAL_SERVER_ERROR,
				"internal_error",
			),
		];

		for (error, status, code) in cases {
			let api_error = ApiError::from(error);

			assert_eq!(api_error.status, status);
			assert_eq!(api_error.code, code);
		}
	}

	#[test]
	fn configuration_errors_name_the_credential() {
		let api_error = ApiError::from(ServiceError::MissingCredential { name: "OPENAI_API_KEY" });

		assert!(api_error.message.contains("OPENAI_API_KEY"));
	}

	#[test]
	fn storage_details_stay_out_of_the_body() {
		let api_error =
			ApiError::from(ServiceError::Storage { message: "dsn: postgres://secret".to_string() });

		assert_eq!(api_error.message, "Internal server error.");
		assert!(api_error.response.is_none());
	}

	#[tokio::test]
	async fn upstream_errors_render_the_apology_next_to_the_error() {
		let response =
			ApiError::from(ServiceError::Upstream { message: "timeout".to_string() })
				.into_response();

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.expect("Failed to read response body.");
		let json: serde_json::Value =
			serde_json::from_slice(&bytes).expect("Failed to parse response.");

		assert_eq!(json["error"]["code"], "upstream_error");
		assert_eq!(json["response"], UPSTREAM_APOLOGY);
	}

	#[tokio::test]
	async fn plain_errors_omit_the_response_field() {
		let error = ServiceError::InvalidRequest { message: "Message is required.".to_string() };
		let response = ApiError::from(error).into_response();

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);

		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.expect("Failed to read response body.");
		let json: serde_json::Value =
			serde_json::from_slice(&bytes).expect("Failed to parse response.");

		assert_eq!(json["error"]["code"], "invalid_request");
		assert_eq!(json["error"]["message"], "Message is required.");
		assert!(json.get("response").is_none());
	}
}
