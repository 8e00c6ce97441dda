pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod routes;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    /// Secret for the inner token embedded in the session cookie.
    pub jwt_secret: String,
    /// Key for the encrypted session cookie.
    pub cookie_key: Key,
    pub cookie_name: String,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.cookie_key.clone()
    }
}
