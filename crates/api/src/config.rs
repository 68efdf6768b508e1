//! Server configuration loaded from environment variables.

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Site title used in notification subjects.
    pub site_title: String,
    /// Public base URL used to build links in notifications.
    pub public_base_url: String,
    /// Recipient of moderation notifications (new submissions, merge
    /// requests).
    pub moderator_email: Option<String>,
    /// Verification code time-to-live in seconds (default: `86400`).
    pub code_ttl_secs: i64,
    /// Minimum interval between code issuances per email (default: `120`).
    pub code_resend_window_secs: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                    |
    /// | `SITE_TITLE`              | `Quill`                 |
    /// | `PUBLIC_BASE_URL`         | `http://localhost:3000` |
    /// | `MODERATOR_EMAIL`         | — (unset disables mail) |
    /// | `CODE_TTL_SECS`           | `86400`                 |
    /// | `CODE_RESEND_WINDOW_SECS` | `120`                   |
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

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let code_ttl_secs: i64 = std::env::var("CODE_TTL_SECS")
            .unwrap_or_else(|_| "86400".into())
            .parse()
            .expect("CODE_TTL_SECS must be a valid i64");

        let code_resend_window_secs: i64 = std::env::var("CODE_RESEND_WINDOW_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("CODE_RESEND_WINDOW_SECS must be a valid i64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            site_title: std::env::var("SITE_TITLE").unwrap_or_else(|_| "Quill".into()),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            moderator_email: std::env::var("MODERATOR_EMAIL").ok(),
            code_ttl_secs,
            code_resend_window_secs,
        }
    }
}
