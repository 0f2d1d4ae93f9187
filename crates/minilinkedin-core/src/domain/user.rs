use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Post;

/// User entity - a registered member of the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            bio: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Public projection of a user attached to every post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
}

impl From<&User> for Author {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
        }
    }
}

impl From<User> for Author {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            bio: user.bio,
        }
    }
}

/// A user together with the number of posts they authored.
#[derive(Debug, Clone)]
pub struct UserWithPostCount {
    pub user: User,
    pub posts_count: u64,
}

/// A user profile as shown on the profile page.
///
/// `posts` is only populated when the profile is looked up by id and holds
/// at most the configured number of most recent posts; `posts_count` is
/// always the full total.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub posts_count: u64,
    pub posts: Option<Vec<Post>>,
}

/// Validated changes to a profile. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    /// `Some(None)` clears the bio.
    pub bio: Option<Option<String>>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none()
    }

    /// Apply the changes to an in-memory user, bumping `updated_at` when
    /// anything changed.
    pub fn apply_to(&self, user: &mut User, now: DateTime<Utc>) {
        if self.is_empty() {
            return;
        }
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(bio) = &self.bio {
            user.bio = bio.clone();
        }
        user.updated_at = now;
    }
}
