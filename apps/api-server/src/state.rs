//! Application state - shared across all handlers.

use std::sync::Arc;

use minilinkedin_core::domain::PaginationPolicy;
use minilinkedin_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use minilinkedin_core::services::{AccountService, PostService, ProfileService};
use minilinkedin_infra::{
    Argon2PasswordService, DatabaseConfig, DatabaseConnections, InMemoryPostRepository,
    InMemoryStore, InMemoryUserRepository, JwtTokenService,
};

#[cfg(feature = "postgres")]
use minilinkedin_infra::{PostgresPostRepository, PostgresUserRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub profiles: ProfileService,
    pub accounts: AccountService,
    pub tokens: Arc<dyn TokenService>,
    pub pagination: PaginationPolicy,
    pub db: Option<Arc<DatabaseConnections>>,
}

type Repositories = (Arc<dyn UserRepository>, Arc<dyn PostRepository>);

fn in_memory_repositories() -> Repositories {
    let store = InMemoryStore::new();
    (
        Arc::new(InMemoryUserRepository::new(store.clone())),
        Arc::new(InMemoryPostRepository::new(store)),
    )
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (db, (users, posts)) = Self::storage(config.database.as_ref()).await;

        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        tracing::info!("Application state initialized");

        Self::from_parts(config, users, posts, tokens, passwords, db)
    }

    /// Wire services over already-built adapters.
    pub fn from_parts(
        config: &AppConfig,
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        db: Option<Arc<DatabaseConnections>>,
    ) -> Self {
        Self {
            posts: PostService::new(posts.clone(), users.clone()),
            profiles: ProfileService::new(users.clone(), posts)
                .with_embedded_posts_limit(config.profile_posts_limit),
            accounts: AccountService::new(users, tokens.clone(), passwords),
            tokens,
            pagination: config.pagination,
            db,
        }
    }

    /// State over a fresh in-memory store.
    #[cfg(test)]
    pub fn in_memory(config: &AppConfig) -> Self {
        let (users, posts) = in_memory_repositories();
        Self::from_parts(
            config,
            users,
            posts,
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            Arc::new(Argon2PasswordService::new()),
            None,
        )
    }

    #[cfg(feature = "postgres")]
    async fn storage(
        db_config: Option<&DatabaseConfig>,
    ) -> (Option<Arc<DatabaseConnections>>, Repositories) {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (None, in_memory_repositories());
        };

        match DatabaseConnections::init(config).await {
            Ok(connections) => {
                let conn = Arc::new(connections);
                let users: Arc<dyn UserRepository> =
                    Arc::new(PostgresUserRepository::new(conn.main.clone()));
                let posts: Arc<dyn PostRepository> =
                    Arc::new(PostgresPostRepository::new(conn.main.clone()));
                (Some(conn), (users, posts))
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                (None, in_memory_repositories())
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn storage(
        _db_config: Option<&DatabaseConfig>,
    ) -> (Option<Arc<DatabaseConnections>>, Repositories) {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        (None, in_memory_repositories())
    }
}
