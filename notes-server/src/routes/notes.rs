use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

use crate::middleware::auth::SessionUser;
use crate::models::note::{
    listing_title, truncate_title, NoteListItem, NoteListResponse, NoteRef, NoteResponse,
    SaveNoteRequest,
};
use crate::routes::{err, ApiError};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/note",
            put(create_note)
                .post(get_note)
                .patch(save_note)
                .delete(delete_note),
        )
        .route("/note-list", get(list_notes))
}

#[utoipa::path(
    put,
    path = "/api/note",
    responses(
        (status = 200, description = "New empty note owned by the caller", body = NoteResponse),
        (status = 403, description = "Not signed in"),
    ),
    security(("session_cookie" = [])),
    tag = "Notes"
)]
pub async fn create_note(
    State(state): State<AppState>,
    auth: SessionUser,
) -> Result<Json<NoteResponse>, (StatusCode, Json<ApiError>)> {
    let (uid, content): (Uuid, String) =
        sqlx::query_as("INSERT INTO notes (user_id) VALUES ($1) RETURNING uid, content")
            .bind(auth.user_id)
            .fetch_one(&state.db)
            .await
            .map_err(|_| err(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create note"))?;

    Ok(Json(NoteResponse { uid, content }))
}

#[utoipa::path(
    post,
    path = "/api/note",
    request_body = NoteRef,
    responses(
        (status = 200, description = "Note content", body = NoteResponse),
        (status = 404, description = "No such note for this user", body = ApiError),
        (status = 403, description = "Not signed in"),
    ),
    security(("session_cookie" = [])),
    tag = "Notes"
)]
pub async fn get_note(
    State(state): State<AppState>,
    auth: SessionUser,
    Json(req): Json<NoteRef>,
) -> Result<Json<NoteResponse>, (StatusCode, Json<ApiError>)> {
    // Owner-scoped lookup: a foreign note is indistinguishable from a
    // missing one.
    let row = sqlx::query_as::<_, (Uuid, String)>(
        "SELECT uid, content FROM notes WHERE uid = $1 AND user_id = $2",
    )
    .bind(req.uid)
    .bind(auth.user_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|_| err(StatusCode::INTERNAL_SERVER_ERROR, "Database error"))?
    .ok_or_else(|| err(StatusCode::NOT_FOUND, "Note not found"))?;

    let (uid, content) = row;
    Ok(Json(NoteResponse { uid, content }))
}

#[utoipa::path(
    patch,
    path = "/api/note",
    request_body = SaveNoteRequest,
    responses(
        (status = 200, description = "Saved; also returned when no note matched"),
        (status = 403, description = "Not signed in"),
    ),
    security(("session_cookie" = [])),
    tag = "Notes"
)]
pub async fn save_note(
    State(state): State<AppState>,
    auth: SessionUser,
    Json(req): Json<SaveNoteRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ApiError>)> {
    // Client-sent titles go through the same stripping as derived ones;
    // markup never reaches the title column.
    let title = listing_title(req.title.as_deref(), &req.content);

    // Matching zero rows (missing or foreign uid) still reports success;
    // clients have historically relied on this.
    sqlx::query(
        "UPDATE notes SET content = $3, title = $4, updated_at = NOW()
         WHERE uid = $1 AND user_id = $2",
    )
    .bind(req.uid)
    .bind(auth.user_id)
    .bind(&req.content)
    .bind(&title)
    .execute(&state.db)
    .await
    .map_err(|_| err(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save note"))?;

    Ok(Json(serde_json::json!({})))
}

#[utoipa::path(
    delete,
    path = "/api/note",
    request_body = NoteRef,
    responses(
        (status = 200, description = "Deleted; idempotent on missing notes"),
        (status = 403, description = "Not signed in"),
    ),
    security(("session_cookie" = [])),
    tag = "Notes"
)]
pub async fn delete_note(
    State(state): State<AppState>,
    auth: SessionUser,
    Json(req): Json<NoteRef>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ApiError>)> {
    sqlx::query("DELETE FROM notes WHERE uid = $1 AND user_id = $2")
        .bind(req.uid)
        .bind(auth.user_id)
        .execute(&state.db)
        .await
        .map_err(|_| err(StatusCode::INTERNAL_SERVER_ERROR, "Database error"))?;

    Ok(Json(serde_json::json!({})))
}

#[utoipa::path(
    get,
    path = "/api/note-list",
    responses(
        (status = 200, description = "Caller's notes, newest first, titles only", body = NoteListResponse),
        (status = 403, description = "Not signed in"),
    ),
    security(("session_cookie" = [])),
    tag = "Notes"
)]
pub async fn list_notes(
    State(state): State<AppState>,
    auth: SessionUser,
) -> Result<Json<NoteListResponse>, (StatusCode, Json<ApiError>)> {
    let rows = sqlx::query_as::<_, (Uuid, String)>(
        "SELECT uid, title FROM notes WHERE user_id = $1 ORDER BY updated_at DESC",
    )
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await
    .map_err(|_| err(StatusCode::INTERNAL_SERVER_ERROR, "Database error"))?;

    let notes = rows
        .into_iter()
        .map(|(uid, title)| NoteListItem {
            uid,
            title: truncate_title(&title),
        })
        .collect();

    Ok(Json(NoteListResponse { notes }))
}
