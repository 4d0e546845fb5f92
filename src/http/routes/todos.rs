use axum::extract::{rejection::JsonRejection, Path, State};
use axum::http::StatusCode;
use axum::{routing::{get, put}, Json, Router};

use crate::application::todo_service::TodoService;
use crate::domain::{error::TodoError, todo::{CreateTodo, Todo, TodoId, UpdateTodo}};
use crate::http::{extract::Owner, types::ApiError};

#[derive(Clone)]
pub struct AppState<S: TodoService> { pub service: S }

pub fn router<S: TodoService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/todos", get(list_todos::<S>).post(create_todo::<S>))
        .route("/todos/:id", put(update_todo::<S>).delete(delete_todo::<S>))
        .with_state(state)
}

async fn list_todos<S: TodoService>(Owner(owner): Owner, State(state): State<AppState<S>>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.service.list(&owner).await?))
}

async fn create_todo<S: TodoService>(
    Owner(owner): Owner,
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(payload) = payload?;
    let todo = state.service.create(&owner, payload).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo<S: TodoService>(
    Owner(owner): Owner,
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Json(payload) = payload?;
    let id = parse_id(&id)?;
    Ok(Json(state.service.update(&owner, &id, payload).await?))
}

async fn delete_todo<S: TodoService>(Owner(owner): Owner, State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete(&owner, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<TodoId, TodoError> { TodoId::parse(raw).ok_or(TodoError::NotFound) }
