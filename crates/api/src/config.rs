/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL connection string. Unset means the in-memory store.
    pub database_url: Option<String>,
    /// Endpoint that verifies login assertions.
    pub identity_verifier_url: String,
    /// Audience this site presents to the identity verifier.
    pub identity_audience: String,
    /// Whether the session cookie is marked `Secure`.
    pub cookie_secure: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                                     |
    /// |-------------------------|---------------------------------------------|
    /// | `HOST`                  | `0.0.0.0`                                   |
    /// | `PORT`                  | `3000`                                      |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`                     |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                                        |
    /// | `DATABASE_URL`          | unset (in-memory store)                     |
    /// | `IDENTITY_VERIFIER_URL` | `https://verifier.login.persona.org/verify` |
    /// | `IDENTITY_AUDIENCE`     | `http://localhost:3000`                     |
    /// | `COOKIE_SECURE`         | `false`                                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let identity_verifier_url = std::env::var("IDENTITY_VERIFIER_URL")
            .unwrap_or_else(|_| "https://verifier.login.persona.org/verify".into());

        let identity_audience = std::env::var("IDENTITY_AUDIENCE")
            .unwrap_or_else(|_| "http://localhost:3000".into());

        let cookie_secure: bool = std::env::var("COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("COOKIE_SECURE must be `true` or `false`");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            identity_verifier_url,
            identity_audience,
            cookie_secure,
        }
    }
}
