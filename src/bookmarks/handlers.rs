use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateBookmarkRequest, EditBookmarkRequest},
    repo_types::Bookmark,
    services::{validate_create, validate_edit},
};
use crate::{auth::AuthUser, errors::AppError, extract::{ApiJson, ApiPath}, state::AppState};

pub fn bookmark_routes() -> Router<AppState> {
    Router::new()
        .route("/bookmarks", get(list_bookmarks).post(create_bookmark))
        .route(
            "/bookmarks/:id",
            get(get_bookmark).patch(edit_bookmark).delete(delete_bookmark),
        )
}

fn not_found(user_id: Uuid, id: Uuid) -> AppError {
    warn!(%user_id, %id, "bookmark not found");
    AppError::NotFound("Bookmark not found".into())
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_bookmarks(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Bookmark>>, AppError> {
    Ok(Json(state.bookmarks.list_by_user(user.id).await?))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<CreateBookmarkRequest>,
) -> Result<(StatusCode, Json<Bookmark>), AppError> {
    let new = validate_create(payload)?;
    let bookmark = state.bookmarks.create(user.id, &new).await?;
    info!(bookmark_id = %bookmark.id, "bookmark created");
    Ok((StatusCode::CREATED, Json(bookmark)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Bookmark>, AppError> {
    state
        .bookmarks
        .find(user.id, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(user.id, id))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn edit_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<EditBookmarkRequest>,
) -> Result<Json<Bookmark>, AppError> {
    let changes = validate_edit(payload)?;
    state
        .bookmarks
        .update(user.id, id, &changes)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(user.id, id))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.bookmarks.delete(user.id, id).await? {
        return Err(not_found(user.id, id));
    }
    info!(bookmark_id = %id, "bookmark deleted");
    Ok(StatusCode::NO_CONTENT)
}
