/// Configuration management for Emoji Feed Service
///
/// This module handles loading configuration from environment variables
/// (optionally seeded from a `.env` file by the binary).
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// External identity directory
    pub identity: IdentityConfig,
    /// Bearer token verification
    pub auth: AuthConfig,
    /// Feed and ranking windows
    pub feed: FeedConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Emit JSON log lines instead of human readable ones
    pub json_logs: bool,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

/// Identity provider backend API
#[derive(Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Base URL of the provider's backend API
    pub api_url: String,
    /// Secret key sent as bearer credential
    pub secret_key: String,
    pub timeout_ms: u64,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("api_url", &self.api_url)
            .field("secret_key", &"[REDACTED]")
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Session token verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// RS256 public key (PEM) of the identity provider. Without it every
    /// authenticated request is rejected.
    pub jwt_public_key_pem: Option<String>,
}

/// Recency window and ranking size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Most recent posts considered by feeds and rankings
    pub recency_window: i64,
    /// Entries returned by rankings
    pub top_n: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            recency_window: 100,
            top_n: crate::services::ranking::TOP_N,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("FEED_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("FEED_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8082),
                json_logs: std::env::var("LOG_FORMAT")
                    .map(|v| v.eq_ignore_ascii_case("json"))
                    .unwrap_or(false),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/emoji_feed".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
                run_migrations: parse_bool_or_default("DATABASE_RUN_MIGRATIONS", true)?,
            },
            identity: {
                let secret_key = std::env::var("IDENTITY_API_SECRET_KEY").unwrap_or_default();
                if production && secret_key.trim().is_empty() {
                    return Err("IDENTITY_API_SECRET_KEY must be set in production".to_string());
                }

                IdentityConfig {
                    api_url: std::env::var("IDENTITY_API_URL")
                        .unwrap_or_else(|_| "https://api.clerk.com".to_string()),
                    secret_key,
                    timeout_ms: std::env::var("IDENTITY_TIMEOUT_MS")
                        .ok()
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(3_000),
                }
            },
            auth: AuthConfig {
                jwt_public_key_pem: std::env::var("JWT_PUBLIC_KEY_PEM")
                    .ok()
                    .filter(|pem| !pem.trim().is_empty())
                    .map(|pem| pem.replace("\\n", "\n")),
            },
            feed: {
                let defaults = FeedConfig::default();
                let recency_window = std::env::var("FEED_RECENCY_WINDOW")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.recency_window);
                if recency_window <= 0 {
                    return Err("FEED_RECENCY_WINDOW must be positive".to_string());
                }

                FeedConfig {
                    recency_window,
                    top_n: std::env::var("FEED_TOP_N")
                        .ok()
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(defaults.top_n),
                }
            },
        })
    }
}

fn parse_bool_or_default(key: &str, default: bool) -> Result<bool, String> {
    match std::env::var(key) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(format!("Failed to parse {}='{}': expected a boolean", key, val)),
        },
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "APP_ENV",
            "CORS_ALLOWED_ORIGINS",
            "IDENTITY_API_SECRET_KEY",
            "DATABASE_RUN_MIGRATIONS",
            "FEED_RECENCY_WINDOW",
            "FEED_TOP_N",
            "JWT_PUBLIC_KEY_PEM",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn development_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.app.env, "development");
        assert_eq!(config.cors.allowed_origins, "http://localhost:3000");
        assert_eq!(config.feed.recency_window, 100);
        assert_eq!(config.feed.top_n, 10);
        assert!(config.database.run_migrations);
        assert!(config.auth.jwt_public_key_pem.is_none());
    }

    #[test]
    #[serial]
    fn production_requires_cors_and_secret() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "*");
        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://feed.example");
        assert!(Config::from_env().is_err());

        std::env::set_var("IDENTITY_API_SECRET_KEY", "sk_live_123");
        assert!(Config::from_env().is_ok());
        clear_env();
    }

    #[test]
    #[serial]
    fn rejects_bad_values() {
        clear_env();
        std::env::set_var("DATABASE_RUN_MIGRATIONS", "maybe");
        assert!(Config::from_env().is_err());
        std::env::remove_var("DATABASE_RUN_MIGRATIONS");

        std::env::set_var("FEED_RECENCY_WINDOW", "0");
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn pem_newlines_are_unescaped() {
        clear_env();
        std::env::set_var("JWT_PUBLIC_KEY_PEM", "-----BEGIN PUBLIC KEY-----\\nabc\\n-----END PUBLIC KEY-----");
        let config = Config::from_env().unwrap();
        assert_eq!(
            config.auth.jwt_public_key_pem.as_deref(),
            Some("-----BEGIN PUBLIC KEY-----\nabc\n-----END PUBLIC KEY-----")
        );
        clear_env();
    }
}
