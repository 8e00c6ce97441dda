use axum::http::{HeaderValue, Method};
use axum_extra::extract::cookie::Key;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use notes_server::{config, db, models, routes, AppState};

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::auth::register,
        routes::auth::login,
        routes::auth::logout,
        routes::notes::create_note,
        routes::notes::get_note,
        routes::notes::save_note,
        routes::notes::delete_note,
        routes::notes::list_notes,
    ),
    components(schemas(
        models::user::RegisterRequest,
        models::user::LoginRequest,
        models::user::UserResponse,
        models::note::NoteRef,
        models::note::SaveNoteRequest,
        models::note::NoteResponse,
        models::note::NoteListItem,
        models::note::NoteListResponse,
        routes::ApiError,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login & session check"),
        (name = "Notes", description = "Owner-scoped note CRUD")
    ),
    security(("session_cookie" = []))
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_cookie",
            utoipa::openapi::security::SecurityScheme::ApiKey(
                utoipa::openapi::security::ApiKey::Cookie(
                    utoipa::openapi::security::ApiKeyValue::new("notes_session"),
                ),
            ),
        );
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("notes_server=debug,tower_http=debug")
        .init();

    let config = config::Config::from_env();

    let pool = db::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    db::migrate(&pool).await.expect("Failed to run migrations");

    let cors = if config.cors_origins == "*" {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(tower_http::cors::Any)
            .allow_credentials(true)
    };

    let state = AppState {
        db: pool,
        jwt_secret: config.jwt_secret,
        cookie_key: Key::from(config.cookie_secret.as_bytes()),
        cookie_name: config.cookie_name,
    };

    let app = routes::api_router(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .unwrap();
    tracing::info!("Listening on {}", config.listen_addr);
    tracing::info!("Swagger UI at http://{}/docs/", config.listen_addr);
    axum::serve(listener, app).await.unwrap();
}
