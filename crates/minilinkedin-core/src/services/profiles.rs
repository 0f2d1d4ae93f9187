//! Profile reads and updates plus the user directory.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Page, PageRequest, User, UserProfile, UserWithPostCount, validation};
use crate::error::DomainError;
use crate::ports::{PostRepository, UserRepository};

/// Default cap on posts embedded in a profile looked up by id.
pub const PROFILE_POSTS_LIMIT: u64 = 50;

/// Identity & profile service.
#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    embedded_posts_limit: u64,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self {
            users,
            posts,
            embedded_posts_limit: PROFILE_POSTS_LIMIT,
        }
    }

    pub fn with_embedded_posts_limit(mut self, limit: u64) -> Self {
        self.embedded_posts_limit = limit.max(1);
        self
    }

    /// The caller's own profile with their post count.
    pub async fn own_profile(&self, user_id: Uuid) -> Result<UserProfile, DomainError> {
        let user = self.find_user(user_id).await?;
        let posts_count = self.posts.count(Some(user_id)).await?;

        Ok(UserProfile {
            user,
            posts_count,
            posts: None,
        })
    }

    /// A public profile including the most recent posts.
    pub async fn profile_by_id(&self, user_id: Uuid) -> Result<UserProfile, DomainError> {
        let user = self.find_user(user_id).await?;
        let posts = self
            .posts
            .find_by_author(user_id, self.embedded_posts_limit)
            .await?;
        let posts_count = self.posts.count(Some(user_id)).await?;

        Ok(UserProfile {
            user,
            posts_count,
            posts: Some(posts),
        })
    }

    /// Partially update the caller's own profile.
    pub async fn update_own_profile(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        bio: Option<&str>,
    ) -> Result<User, DomainError> {
        let changes = validation::profile_changes(name, bio)?;

        let user = self
            .users
            .update_profile(user_id, &changes, Utc::now())
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        if !changes.is_empty() {
            tracing::info!(%user_id, "Profile updated");
        }
        Ok(user)
    }

    /// The user directory, newest members first.
    pub async fn list_users(
        &self,
        request: PageRequest,
    ) -> Result<Page<UserWithPostCount>, DomainError> {
        let items = self
            .users
            .list_with_post_counts(request.skip(), request.limit())
            .await?;
        let total = self.users.count().await?;

        Ok(Page::new(items, request, total))
    }

    async fn find_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }
}
