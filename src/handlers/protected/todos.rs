use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{Page, SearchFilters, TodoDraft, TodoId, TodoItem};
use crate::handlers::params::{is_blank, PageParams};
use crate::middleware::{ApiResponse, ApiResult};
use crate::security::Identity;
use crate::services::ServiceError;

/// Request body for create and update.
///
/// `id` and `owner_name` may be present in the JSON; they are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct TodoPayload {
    pub name: Option<String>,
    pub priority: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl TodoPayload {
    pub fn validate(self) -> Result<TodoDraft, ServiceError> {
        if is_blank(&self.name) {
            return Err(ServiceError::invalid_field("name", "This field is required"));
        }
        Ok(TodoDraft {
            name: self.name.unwrap_or_default(),
            priority: self.priority,
            description: self.description,
            completed: self.completed,
        })
    }
}

/// GET /api/todos - List the caller's todos (every todo for admins)
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(paging): Query<PageParams>,
) -> ApiResult<Page<TodoItem>> {
    let window = paging.to_window(&state.pagination);
    let page = state.todos.list_all(&identity, &window).await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/search/todos?name=&priority= - Search with optional exact-match filters
pub async fn search(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(filters): Query<SearchFilters>,
    Query(paging): Query<PageParams>,
) -> ApiResult<Page<TodoItem>> {
    let window = paging.to_window(&state.pagination);
    let page = state.todos.queries().search(&identity, &filters, &window).await?;
    Ok(ApiResponse::success(page))
}

/// POST /api/todos - Create a todo owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<TodoPayload>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(payload) = payload?;
    let id = state.todos.create(&identity, payload.validate()?).await?;
    Ok(ApiResponse::created(json!({ "id": id })))
}

/// GET /api/todos/:id - Get a single todo
pub async fn get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<TodoId>,
) -> ApiResult<TodoItem> {
    let item = state.todos.get(&identity, id).await?;
    Ok(ApiResponse::success(item))
}

/// PUT /api/todos/:id - Replace a todo, creating a new one when `id` is unknown
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<TodoId>,
    payload: Result<Json<TodoPayload>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(payload) = payload?;
    let stored_id = state.todos.update(&identity, id, payload.validate()?).await?;
    Ok(ApiResponse::success(json!({ "id": stored_id })))
}

/// DELETE /api/todos/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<TodoId>,
) -> ApiResult<()> {
    state.todos.delete(&identity, id).await?;
    Ok(ApiResponse::no_content())
}
