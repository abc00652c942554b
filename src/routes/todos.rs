use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiResult, AppError},
    repository::{Todo, TodoId, TodoPatch},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Absent and `null` fields are left unchanged.
pub type UpdateTodoRequest = TodoPatch;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .with_state(state)
}

async fn list_todos(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Todo>>> {
    let todos = state.todo_service().list_todos().await?;
    Ok(Json(todos))
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTodoRequest>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let title = require_title(body.title.as_deref())?;
    let description = body.description.unwrap_or_default();
    let todo = state
        .todo_service()
        .create_todo(title, &description)
        .await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Todo>> {
    let id = parse_id(&id)?;
    let todo = state.todo_service().require_todo(id).await?;
    Ok(Json(todo))
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTodoRequest>,
) -> ApiResult<Json<Todo>> {
    let id = parse_id(&id)?;
    if let Some(title) = body.title.as_deref() {
        require_title(Some(title))?;
    }
    let todo = state.todo_service().update_todo(id, body).await?;
    Ok(Json(todo))
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state.todo_service().delete_todo(id).await?;
    Ok(Json(MessageResponse {
        message: "Todo deleted successfully",
    }))
}

pub fn parse_id(raw: &str) -> Result<TodoId, AppError> {
    raw.parse::<TodoId>()
        .map_err(|_| AppError::bad_request("Invalid ID"))
}

/// Whitespace-only titles are rejected; accepted titles are stored as sent.
fn require_title(title: Option<&str>) -> Result<&str, AppError> {
    match title {
        Some(title) if !title.trim().is_empty() => Ok(title),
        _ => Err(AppError::bad_request("title is required")),
    }
}
