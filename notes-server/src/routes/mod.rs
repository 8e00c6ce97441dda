pub mod auth;
pub mod notes;

use axum::{http::StatusCode, Json, Router};

use crate::AppState;

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ApiError {
    pub err: String,
}

pub(crate) fn err(status: StatusCode, msg: &str) -> (StatusCode, Json<ApiError>) {
    (
        status,
        Json(ApiError {
            err: msg.to_string(),
        }),
    )
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", auth::router().merge(notes::router()))
        .with_state(state)
}
