//! Server configuration

use crate::BoxError;

/// Server configuration, loaded from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite URL (`sqlite:seatplan.db`, `sqlite::memory:`)
    pub database_url: String,
    /// HTTP listen port
    pub http_port: u16,
    /// HS256 signing secret for identity tokens
    pub jwt_secret: String,
    /// Token lifetime
    pub jwt_expiry_hours: i64,
    /// Single allowed CORS origin
    pub allowed_origin: Option<String>,
    /// Environment: development | staging | production
    pub environment: String,
    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,
    /// Directory for rolling log files
    pub log_dir: Option<String>,
    /// Connection pool size
    pub db_max_connections: u32,
    /// Account registered with this email gets admin rights
    pub admin_email: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:seatplan.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiry_hours: std::env::var("JWT_EXPIRY_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(8),
            allowed_origin: std::env::var("ALLOWED_ORIGIN")
                .ok()
                .filter(|s| !s.is_empty()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(5),
            admin_email: std::env::var("ADMIN_EMAIL")
                .ok()
                .map(|e| e.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
            environment,
        })
    }

    /// Development configuration over the given database URL
    pub fn development(database_url: &str) -> Self {
        Self {
            database_url: database_url.to_string(),
            http_port: 3000,
            jwt_secret: "dev-JWT_SECRET-not-for-production".into(),
            jwt_expiry_hours: 8,
            allowed_origin: None,
            environment: "development".into(),
            log_level: "info".into(),
            log_dir: None,
            db_max_connections: 1,
            admin_email: None,
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// `email` must already be normalized
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_email.as_deref() == Some(email)
    }
}
