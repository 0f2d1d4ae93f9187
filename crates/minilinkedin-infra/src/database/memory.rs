//! In-memory repositories - used when no database is configured and in tests.
//!
//! Both repositories share one [`InMemoryStore`] so that post listings can
//! join authors and user listings can count posts.
//! Note: Data is lost on process restart.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use minilinkedin_core::domain::{
    Author, Post, PostWithAuthor, ProfileChanges, User, UserWithPostCount,
};
use minilinkedin_core::error::RepoError;
use minilinkedin_core::ports::{BaseRepository, PostRepository, UserRepository};

/// Shared tables behind the in-memory repositories.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

fn window<T>(items: Vec<T>, skip: u64, limit: u64) -> Vec<T> {
    let skip = usize::try_from(skip).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    items.into_iter().skip(skip).take(limit).collect()
}

/// In-memory user repository.
#[derive(Clone)]
pub struct InMemoryUserRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryUserRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.store.users.write().await;

        if users.contains_key(&user.id) || users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.store.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.store.users.read().await.contains_key(&id))
    }

    async fn list_with_post_counts(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<UserWithPostCount>, RepoError> {
        let mut users: Vec<User> = self.store.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| Reverse((u.created_at, u.id)));
        let users = window(users, skip, limit);

        let posts = self.store.posts.read().await;
        Ok(users
            .into_iter()
            .map(|user| {
                let posts_count = posts.values().filter(|p| p.author_id == user.id).count() as u64;
                UserWithPostCount { user, posts_count }
            })
            .collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.store.users.read().await.len() as u64)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, RepoError> {
        let mut users = self.store.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            changes.apply_to(user, updated_at);
            user.clone()
        }))
    }
}

/// In-memory post repository.
#[derive(Clone)]
pub struct InMemoryPostRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryPostRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    /// Posts under the filter, newest first.
    async fn sorted(&self, author_id: Option<Uuid>) -> Vec<Post> {
        let posts = self.store.posts.read().await;
        let mut selected: Vec<Post> = posts
            .values()
            .filter(|p| author_id.is_none_or(|a| p.author_id == a))
            .cloned()
            .collect();
        selected.sort_by_key(|p| Reverse((p.created_at, p.id)));
        selected
    }

    async fn with_author(&self, post: Post) -> Result<PostWithAuthor, RepoError> {
        let users = self.store.users.read().await;
        let author = users
            .get(&post.author_id)
            .map(Author::from)
            .ok_or_else(|| RepoError::Query(format!("post {} has no author", post.id)))?;
        Ok(PostWithAuthor { post, author })
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.posts.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        if !self.store.users.read().await.contains_key(&post.author_id) {
            return Err(RepoError::Constraint(format!(
                "author {} does not exist",
                post.author_id
            )));
        }

        let mut posts = self.store.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_with_author(&self, id: Uuid) -> Result<Option<PostWithAuthor>, RepoError> {
        match self.find_by_id(id).await? {
            Some(post) => self.with_author(post).await.map(Some),
            None => Ok(None),
        }
    }

    async fn list_with_authors(
        &self,
        author_id: Option<Uuid>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<PostWithAuthor>, RepoError> {
        let page = window(self.sorted(author_id).await, skip, limit);

        let mut joined = Vec::with_capacity(page.len());
        for post in page {
            joined.push(self.with_author(post).await?);
        }
        Ok(joined)
    }

    async fn count(&self, author_id: Option<Uuid>) -> Result<u64, RepoError> {
        let posts = self.store.posts.read().await;
        Ok(posts
            .values()
            .filter(|p| author_id.is_none_or(|a| p.author_id == a))
            .count() as u64)
    }

    async fn find_by_author(&self, author_id: Uuid, limit: u64) -> Result<Vec<Post>, RepoError> {
        Ok(window(self.sorted(Some(author_id)).await, 0, limit))
    }

    async fn update_content_if_owner(
        &self,
        id: Uuid,
        author_id: Uuid,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, RepoError> {
        let mut posts = self.store.posts.write().await;
        match posts.get_mut(&id) {
            Some(post) if post.author_id == author_id => {
                post.content = content.to_string();
                post.updated_at = updated_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_if_owner(&self, id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let mut posts = self.store.posts.write().await;
        match posts.get(&id) {
            Some(post) if post.author_id == author_id => {
                posts.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
