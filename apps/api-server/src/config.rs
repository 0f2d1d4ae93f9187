//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use minilinkedin_core::domain::{DEFAULT_LIMIT, MAX_LIMIT, PaginationPolicy};
use minilinkedin_core::services::PROFILE_POSTS_LIMIT;
use minilinkedin_infra::{DatabaseConfig, JwtConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `APP_ENV=development` exposes internal error detail in responses.
    pub development: bool,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub pagination: PaginationPolicy,
    pub profile_posts_limit: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            development: false,
            database: None,
            jwt: JwtConfig::default(),
            pagination: PaginationPolicy::default(),
            profile_posts_limit: PROFILE_POSTS_LIMIT,
        }
    }
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed_or("DB_MAX_CONNECTIONS", 100),
            min_connections: parsed_or("DB_MIN_CONNECTIONS", 10),
        });

        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").unwrap_or(defaults.jwt.secret),
            expiration_hours: parsed_or("JWT_EXPIRATION_HOURS", defaults.jwt.expiration_hours),
            issuer: env::var("JWT_ISSUER").unwrap_or(defaults.jwt.issuer),
        };

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parsed_or("PORT", defaults.port),
            development: env::var("APP_ENV")
                .map(|v| v.eq_ignore_ascii_case("development") || v.eq_ignore_ascii_case("dev"))
                .unwrap_or(false),
            database,
            jwt,
            pagination: PaginationPolicy {
                default_limit: parsed_or("DEFAULT_PAGE_LIMIT", DEFAULT_LIMIT).max(1),
                max_limit: parsed_or("MAX_PAGE_LIMIT", MAX_LIMIT).max(1),
            },
            profile_posts_limit: parsed_or("PROFILE_POSTS_LIMIT", PROFILE_POSTS_LIMIT).max(1),
        }
    }

    /// Log configuration problems that should not stop the server.
    pub fn warn_on_insecure_defaults(&self) {
        if !self.jwt.uses_default_secret() {
            return;
        }
        if self.development {
            tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
        } else {
            tracing::error!(
                "SECURITY: Using default JWT secret outside development! Set JWT_SECRET environment variable."
            );
        }
    }
}
