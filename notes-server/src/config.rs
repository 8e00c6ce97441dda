pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Secret for the private session cookie. Must be at least 64 bytes
    /// (32 for signing, 32 for encryption).
    pub cookie_secret: String,
    pub cookie_name: String,
    pub listen_addr: String,
    /// Comma-separated allowed CORS origins. If empty or "*", allows all origins (dev mode).
    pub cors_origins: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let cookie_secret =
            std::env::var("COOKIE_SECRET").expect("COOKIE_SECRET must be set");
        if cookie_secret.len() < 64 {
            panic!("COOKIE_SECRET must be at least 64 bytes");
        }
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            cookie_secret,
            cookie_name: std::env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| "notes_session".to_string()),
            listen_addr: std::env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            cors_origins: std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        }
    }
}
