use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use shared::api::{CreateTodoRequest, MessageResponse, UpdateTodoRequest};
use shared::models::Todo;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// An id that does not parse cannot belong to the caller either.
fn parse_todo_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Todo"))
}

pub async fn list_todos(user: AuthUser, State(state): State<AppState>) -> ApiResult<Json<Vec<Todo>>> {
    tracing::debug!(user_id = %user.user_id, "Fetching todos");
    let todos = state.todos.find(user.user_id).await?;
    Ok(Json(todos))
}

pub async fn create_todo(
    user: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let Json(payload) = payload?;
    payload
        .validate()
        .map_err(|_| ApiError::bad_request("Title must be between 1 and 500 characters"))?;

    let todo = state.todos.create(user.user_id, &payload.title).await?;
    tracing::info!(user_id = %user.user_id, todo_id = %todo.id, "Created todo");

    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    patch: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> ApiResult<Json<Todo>> {
    let id = parse_todo_id(&id)?;
    let Json(patch) = patch?;
    patch
        .validate()
        .map_err(|_| ApiError::bad_request("Title must be between 1 and 500 characters"))?;

    match state.todos.find_one_and_update(id, user.user_id, &patch).await? {
        Some(todo) => {
            tracing::info!(user_id = %user.user_id, todo_id = %id, "Updated todo");
            Ok(Json(todo))
        }
        None => {
            tracing::info!(user_id = %user.user_id, todo_id = %id, "Todo not found");
            Err(ApiError::not_found("Todo"))
        }
    }
}

pub async fn delete_todo(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_todo_id(&id)?;

    match state.todos.find_one_and_delete(id, user.user_id).await? {
        Some(_) => {
            tracing::info!(user_id = %user.user_id, todo_id = %id, "Deleted todo");
            Ok(Json(MessageResponse::new("Todo deleted successfully")))
        }
        None => {
            tracing::info!(user_id = %user.user_id, todo_id = %id, "Todo not found for deletion");
            Err(ApiError::not_found("Todo"))
        }
    }
}
