use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Post, PostWithAuthor, ProfileChanges, User, UserWithPostCount};
use crate::error::RepoError;

/// Generic repository trait shared by every aggregate.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity and return it as stored.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their (normalized) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Whether a user with this id exists.
    async fn exists(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Users ordered newest first, each with their post count.
    async fn list_with_post_counts(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<UserWithPostCount>, RepoError>;

    /// Total number of users.
    async fn count(&self) -> Result<u64, RepoError>;

    /// Apply a partial profile update. Returns `None` when the user is gone.
    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, RepoError>;
}

/// Post repository.
///
/// Listing methods take an optional author filter; `None` means the global
/// feed. Listings are ordered by `created_at` descending with `id`
/// descending as tie-breaker.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// A single post joined with its author.
    async fn find_with_author(&self, id: Uuid) -> Result<Option<PostWithAuthor>, RepoError>;

    /// One window of the feed, joined with authors.
    async fn list_with_authors(
        &self,
        author_id: Option<Uuid>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<PostWithAuthor>, RepoError>;

    /// Number of posts under the same filter as [`Self::list_with_authors`].
    async fn count(&self, author_id: Option<Uuid>) -> Result<u64, RepoError>;

    /// The most recent posts of an author, without the author join.
    async fn find_by_author(&self, author_id: Uuid, limit: u64) -> Result<Vec<Post>, RepoError>;

    /// Replace the content iff the post exists and belongs to `author_id`.
    /// Returns `false` when no row matched.
    async fn update_content_if_owner(
        &self,
        id: Uuid,
        author_id: Uuid,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, RepoError>;

    /// Delete iff the post exists and belongs to `author_id`.
    /// Returns `false` when no row matched.
    async fn delete_if_owner(&self, id: Uuid, author_id: Uuid) -> Result<bool, RepoError>;
}
