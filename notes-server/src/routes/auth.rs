use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::middleware::auth::{
    clear_session, create_token, establish_session, read_session, validate_token,
};
use crate::models::user::{LoginRequest, RegisterRequest, SessionData, UserResponse};
use crate::routes::{err, ApiError};
use crate::AppState;

use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
}

#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created, session established"),
        (status = 400, description = "Invalid input or email already registered", body = ApiError),
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(PrivateCookieJar, Json<serde_json::Value>), (StatusCode, Json<ApiError>)> {
    let name = req.name.trim().to_string();
    let email = req.email.trim().to_lowercase();
    if name.is_empty() {
        return Err(err(StatusCode::BAD_REQUEST, "Name cannot be empty"));
    }
    if !email.contains('@') || email.len() < 5 {
        return Err(err(StatusCode::BAD_REQUEST, "Invalid email"));
    }
    if req.password.len() < 8 {
        return Err(err(
            StatusCode::BAD_REQUEST,
            "Password must be at least 8 characters",
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|_| err(StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password"))?
        .to_string();

    // The unique constraint on email is the final guard against a
    // duplicate racing in between check and insert, so there is no check.
    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&name)
    .bind(&email)
    .bind(&hash)
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        if e.as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation())
        {
            err(StatusCode::BAD_REQUEST, "User already exists")
        } else {
            err(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user")
        }
    })?;

    let token = create_token(user_id, &state.jwt_secret)
        .map_err(|_| err(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create token"))?;
    let jar = establish_session(jar, &state.cookie_name, user_id, token)
        .map_err(|_| err(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save session"))?;

    Ok((jar, Json(serde_json::json!({}))))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login or session check result", body = UserResponse),
        (status = 400, description = "Missing fields", body = ApiError),
        (status = 401, description = "Invalid credentials", body = ApiError),
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(PrivateCookieJar, Json<UserResponse>), (StatusCode, Json<ApiError>)> {
    let session = read_session(&jar, &state.cookie_name);

    if req.check.unwrap_or(false) || session.is_some() {
        let user = match session {
            Some(session) => check_session(&state, &session).await?,
            None => None,
        };
        let resp = match user {
            Some((id, name)) => UserResponse::known(id, name),
            None => UserResponse::anonymous(),
        };
        return Ok((jar, Json(resp)));
    }

    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(err(
            StatusCode::BAD_REQUEST,
            "E-mail or password cannot be empty",
        ));
    };
    let email = email.trim().to_lowercase();
    if email.is_empty() || password.is_empty() {
        return Err(err(
            StatusCode::BAD_REQUEST,
            "E-mail or password cannot be empty",
        ));
    }

    // Unknown email and wrong password get the same answer.
    let row = sqlx::query_as::<_, (i64, String, String)>(
        "SELECT id, name, password_hash FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.db)
    .await
    .map_err(|_| err(StatusCode::INTERNAL_SERVER_ERROR, "Database error"))?
    .ok_or_else(|| err(StatusCode::UNAUTHORIZED, "Wrong e-mail or password"))?;

    let (user_id, name, password_hash) = row;

    let parsed_hash = PasswordHash::new(&password_hash)
        .map_err(|_| err(StatusCode::INTERNAL_SERVER_ERROR, "Invalid stored hash"))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| err(StatusCode::UNAUTHORIZED, "Wrong e-mail or password"))?;

    let token = create_token(user_id, &state.jwt_secret)
        .map_err(|_| err(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create token"))?;
    let jar = establish_session(jar, &state.cookie_name, user_id, token)
        .map_err(|_| err(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save session"))?;

    Ok((jar, Json(UserResponse::known(user_id, name))))
}

/// Re-verify a session against current user state: the inner token must
/// still validate and the user it names must still exist. Any mismatch is
/// "logged out", never an error.
async fn check_session(
    state: &AppState,
    session: &SessionData,
) -> Result<Option<(i64, String)>, (StatusCode, Json<ApiError>)> {
    let Ok(claims) = validate_token(&session.token, &state.jwt_secret) else {
        return Ok(None);
    };

    let row = sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM users WHERE id = $1")
        .bind(session.user_id)
        .fetch_optional(&state.db)
        .await
        .map_err(|_| err(StatusCode::INTERNAL_SERVER_ERROR, "Database error"))?;

    Ok(row.filter(|(id, _)| *id == claims.sub))
}

#[utoipa::path(
    get,
    path = "/api/logout",
    responses(
        (status = 200, description = "Session destroyed; succeeds with no session too"),
    ),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, StatusCode) {
    (clear_session(jar, &state.cookie_name), StatusCode::OK)
}
