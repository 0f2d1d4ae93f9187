//! Post lifecycle and feed listings.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Page, PageRequest, Post, PostWithAuthor, validation};
use crate::error::DomainError;
use crate::ports::{PostRepository, UserRepository};

use super::access::ensure_owner;

/// Feed service - owns posts and the paginated listings over them.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    /// Publish a post as `author_id`.
    pub async fn create(&self, author_id: Uuid, content: &str) -> Result<PostWithAuthor, DomainError> {
        let content = validation::post_content(content)?;

        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", author_id))?;

        let post = self.posts.insert(Post::new(author_id, content)).await?;
        tracing::info!(post_id = %post.id, %author_id, "Post created");

        Ok(PostWithAuthor {
            post,
            author: author.into(),
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<PostWithAuthor, DomainError> {
        self.posts
            .find_with_author(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    /// Replace the content of a post owned by `requester`.
    ///
    /// A non-owner is refused before the new content is even looked at.
    pub async fn update(
        &self,
        id: Uuid,
        requester: Uuid,
        content: &str,
    ) -> Result<PostWithAuthor, DomainError> {
        let existing = self.find_post(id).await?;
        ensure_owner(requester, existing.author_id, "You can only edit your own posts")?;

        let content = validation::post_content(content)?;

        let updated = self
            .posts
            .update_content_if_owner(id, requester, &content, Utc::now())
            .await?;
        if !updated {
            // deleted between the ownership check and the write
            return Err(DomainError::not_found("Post", id));
        }
        tracing::info!(post_id = %id, author_id = %requester, "Post updated");

        self.get(id).await
    }

    /// Delete a post owned by `requester`.
    pub async fn delete(&self, id: Uuid, requester: Uuid) -> Result<(), DomainError> {
        let existing = self.find_post(id).await?;
        ensure_owner(requester, existing.author_id, "You can only delete your own posts")?;

        if !self.posts.delete_if_owner(id, requester).await? {
            return Err(DomainError::not_found("Post", id));
        }
        tracing::info!(post_id = %id, author_id = %requester, "Post deleted");

        Ok(())
    }

    /// The global feed, newest first.
    pub async fn list_feed(&self, request: PageRequest) -> Result<Page<PostWithAuthor>, DomainError> {
        self.list(None, request).await
    }

    /// Posts of a single author, newest first. Fails if the author is unknown.
    pub async fn list_by_author(
        &self,
        author_id: Uuid,
        request: PageRequest,
    ) -> Result<Page<PostWithAuthor>, DomainError> {
        if !self.users.exists(author_id).await? {
            return Err(DomainError::not_found("User", author_id));
        }
        self.list(Some(author_id), request).await
    }

    async fn list(
        &self,
        author_id: Option<Uuid>,
        request: PageRequest,
    ) -> Result<Page<PostWithAuthor>, DomainError> {
        let items = self
            .posts
            .list_with_authors(author_id, request.skip(), request.limit())
            .await?;
        let total = self.posts.count(author_id).await?;

        Ok(Page::new(items, request, total))
    }

    async fn find_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }
}
