use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::models::user::{Claims, SessionData};
use crate::AppState;

/// Extractor for authenticated requests. Decrypts the session cookie and
/// re-verifies the inner token it carries; the embedded user id must match
/// the cookie's. Requests without a valid session are rejected with 403.
pub struct SessionUser {
    pub user_id: i64,
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| (StatusCode::FORBIDDEN, "Not signed in"))?;

        let session = read_session(&jar, &state.cookie_name)
            .ok_or((StatusCode::FORBIDDEN, "Not signed in"))?;

        let claims = validate_token(&session.token, &state.jwt_secret)
            .map_err(|_| (StatusCode::FORBIDDEN, "Invalid session"))?;

        if claims.sub != session.user_id {
            return Err((StatusCode::FORBIDDEN, "Invalid session"));
        }

        Ok(SessionUser {
            user_id: session.user_id,
        })
    }
}

pub fn create_token(user_id: i64, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id,
        exp: now + 7 * 24 * 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate an inner token and return its claims. Used by the session check
/// to re-verify the token against a live user lookup.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, ()> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ())
}

/// Add the session cookie carrying `{user_id, token}` to the jar.
pub fn establish_session(
    jar: PrivateCookieJar,
    cookie_name: &str,
    user_id: i64,
    token: String,
) -> Result<PrivateCookieJar, serde_json::Error> {
    let payload = serde_json::to_string(&SessionData { user_id, token })?;
    let cookie = Cookie::build((cookie_name.to_string(), payload))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    Ok(jar.add(cookie))
}

pub fn read_session(jar: &PrivateCookieJar, cookie_name: &str) -> Option<SessionData> {
    let cookie = jar.get(cookie_name)?;
    serde_json::from_str(cookie.value()).ok()
}

pub fn clear_session(jar: PrivateCookieJar, cookie_name: &str) -> PrivateCookieJar {
    jar.remove(Cookie::build(cookie_name.to_string()).path("/").build())
}
