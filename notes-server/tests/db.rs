//! End-to-end tests against a live Postgres, driving the real router with
//! session cookies round-tripped between requests. They need DATABASE_URL
//! pointing at a scratch database and are ignored by default:
//!
//!     DATABASE_URL=postgres://... cargo test -- --ignored

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use axum_extra::extract::cookie::Key;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use notes_server::{db, routes, AppState};

async fn app() -> Router {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for these tests");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");
    db::migrate(&pool).await.expect("Failed to run migrations");

    routes::api_router(AppState {
        db: pool,
        jwt_secret: "test-jwt-secret".to_string(),
        cookie_key: Key::from(&[7u8; 64]),
        cookie_name: "notes_session".to_string(),
    })
}

fn unique_email(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}+{}@x.com", tag, nanos)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<&str>,
) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie.to_string());
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

fn session_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response should carry a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a fresh user and return their session cookie.
async fn register(app: &Router, name: &str, email: &str) -> String {
    let body = format!(
        r#"{{"name":"{}","email":"{}","password":"password1"}}"#,
        name, email
    );
    let response = send(app, Method::POST, "/api/register", None, Some(&body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response)
}

async fn create_note(app: &Router, cookie: &str) -> String {
    let response = send(app, Method::PUT, "/api/note", Some(cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["content"], "");
    body["uid"].as_str().unwrap().to_string()
}

async fn save_note(app: &Router, cookie: &str, body: &str) {
    let response = send(app, Method::PATCH, "/api/note", Some(cookie), Some(body)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn get_note(app: &Router, cookie: &str, uid: &str) -> axum::response::Response {
    let body = format!(r#"{{"uid":"{}"}}"#, uid);
    send(app, Method::POST, "/api/note", Some(cookie), Some(&body)).await
}

async fn list_notes(app: &Router, cookie: &str) -> Vec<(String, String)> {
    let response = send(app, Method::GET, "/api/note-list", Some(cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    body["notes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|note| {
            (
                note["uid"].as_str().unwrap().to_string(),
                note["title"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[tokio::test]
#[ignore]
async fn test_register_then_login_agree_on_identity() {
    let app = app().await;
    let email = unique_email("ident");
    let cookie = register(&app, "A", &email).await;

    let response = send(
        &app,
        Method::POST,
        "/api/login",
        Some(&cookie),
        Some(r#"{"check":true}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let checked = json_body(response).await;
    let checked_id = checked["id"].as_i64().unwrap();
    assert_eq!(checked["name"], "A");

    let body = format!(r#"{{"email":"{}","password":"password1"}}"#, email);
    let response = send(&app, Method::POST, "/api/login", None, Some(&body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let logged_in = json_body(response).await;
    assert_eq!(logged_in["id"].as_i64().unwrap(), checked_id);
    assert_eq!(logged_in["name"], "A");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_registration_is_rejected() {
    let app = app().await;
    let email = unique_email("dup");
    register(&app, "A", &email).await;

    let body = format!(
        r#"{{"name":"Other","email":"{}","password":"different1"}}"#,
        email
    );
    let response = send(&app, Method::POST, "/api/register", None, Some(&body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["err"], "User already exists");
}

#[tokio::test]
#[ignore]
async fn test_foreign_notes_read_as_missing() {
    let app = app().await;
    let a = register(&app, "A", &unique_email("owner-a")).await;
    let b = register(&app, "B", &unique_email("owner-b")).await;

    let uid = create_note(&app, &a).await;
    save_note(
        &app,
        &a,
        &format!(r#"{{"uid":"{}","content":"<p>mine</p>"}}"#, uid),
    )
    .await;

    // B cannot read it, and cannot tell it exists.
    let response = get_note(&app, &b, &uid).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // B's save reports success but matches nothing.
    save_note(
        &app,
        &b,
        &format!(r#"{{"uid":"{}","content":"<p>taken over</p>"}}"#, uid),
    )
    .await;
    let response = get_note(&app, &a, &uid).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["content"], "<p>mine</p>");

    // B's delete matches nothing either.
    let body = format!(r#"{{"uid":"{}"}}"#, uid);
    let response = send(&app, Method::DELETE, "/api/note", Some(&b), Some(&body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get_note(&app, &a, &uid).await;
    assert_eq!(response.status(), StatusCode::OK);

    // And B's list never shows A's notes.
    assert!(list_notes(&app, &b).await.iter().all(|(u, _)| u != &uid));
}

#[tokio::test]
#[ignore]
async fn test_delete_is_idempotent() {
    let app = app().await;
    let cookie = register(&app, "A", &unique_email("delete")).await;
    let uid = create_note(&app, &cookie).await;

    let body = format!(r#"{{"uid":"{}"}}"#, uid);
    for _ in 0..2 {
        let response = send(&app, Method::DELETE, "/api/note", Some(&cookie), Some(&body)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = get_note(&app, &cookie, &uid).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_list_orders_by_last_update_descending() {
    let app = app().await;
    let cookie = register(&app, "A", &unique_email("order")).await;

    let first = create_note(&app, &cookie).await;
    tokio::time::sleep(Duration::from_millis(25)).await;
    let second = create_note(&app, &cookie).await;

    tokio::time::sleep(Duration::from_millis(25)).await;
    save_note(
        &app,
        &cookie,
        &format!(r#"{{"uid":"{}","content":"<p>First</p>"}}"#, first),
    )
    .await;
    let uids: Vec<String> = list_notes(&app, &cookie).await.into_iter().map(|(u, _)| u).collect();
    assert_eq!(uids, vec![first.clone(), second.clone()]);

    tokio::time::sleep(Duration::from_millis(25)).await;
    save_note(
        &app,
        &cookie,
        &format!(r#"{{"uid":"{}","content":"<p>Second</p>"}}"#, second),
    )
    .await;
    let uids: Vec<String> = list_notes(&app, &cookie).await.into_iter().map(|(u, _)| u).collect();
    assert_eq!(uids, vec![second, first]);
}

#[tokio::test]
#[ignore]
async fn test_create_update_get_roundtrip_with_derived_title() {
    let app = app().await;
    let cookie = register(&app, "A", &unique_email("roundtrip")).await;
    let uid = create_note(&app, &cookie).await;

    save_note(
        &app,
        &cookie,
        &format!(r#"{{"uid":"{}","content":"<p>Hello world</p>"}}"#, uid),
    )
    .await;

    let response = get_note(&app, &cookie, &uid).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["uid"], uid.as_str());
    assert_eq!(body["content"], "<p>Hello world</p>");

    let notes = list_notes(&app, &cookie).await;
    let title = &notes.iter().find(|(u, _)| u == &uid).unwrap().1;
    assert_eq!(title, "Hello world");
}

#[tokio::test]
#[ignore]
async fn test_explicit_title_is_stored_markup_free() {
    let app = app().await;
    let cookie = register(&app, "A", &unique_email("title")).await;
    let uid = create_note(&app, &cookie).await;

    save_note(
        &app,
        &cookie,
        &format!(
            r#"{{"uid":"{}","title":"<b>Styled</b> title","content":"<p>body</p>"}}"#,
            uid
        ),
    )
    .await;

    let notes = list_notes(&app, &cookie).await;
    let title = &notes.iter().find(|(u, _)| u == &uid).unwrap().1;
    assert_eq!(title, "Styled title");
}
