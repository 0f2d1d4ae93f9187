//! Domain -> wire conversions shared by the handlers.

use uuid::Uuid;

use minilinkedin_core::domain::{Author, Page, Post, PostWithAuthor, User, UserProfile, UserWithPostCount};
use minilinkedin_shared::dto::{
    AuthorResponse, PaginationMeta, PostResponse, ProfilePostResponse, UserProfileResponse,
    UserResponse,
};

use crate::middleware::error::AppError;

/// Parse a path id. Anything that is not a UUID cannot address a record.
pub fn parse_id(raw: &str, entity: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("{} not found", entity)))
}

pub fn author(author: Author) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        name: author.name,
        email: author.email,
        bio: author.bio,
    }
}

pub fn post(item: PostWithAuthor) -> PostResponse {
    let PostWithAuthor { post, author: by } = item;
    PostResponse {
        id: post.id,
        content: post.content,
        author_id: post.author_id,
        created_at: post.created_at,
        updated_at: post.updated_at,
        author: author(by),
    }
}

fn profile_post(post: Post) -> ProfilePostResponse {
    ProfilePostResponse {
        id: post.id,
        content: post.content,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

/// Public user fields. `updated_at` is only echoed after a profile edit.
pub fn user(user: User, with_updated_at: bool) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        bio: user.bio,
        created_at: user.created_at,
        updated_at: with_updated_at.then_some(user.updated_at),
    }
}

pub fn profile(profile: UserProfile) -> UserProfileResponse {
    UserProfileResponse {
        user: user(profile.user, false),
        posts_count: profile.posts_count,
        posts: profile
            .posts
            .map(|posts| posts.into_iter().map(profile_post).collect()),
    }
}

pub fn directory_entry(entry: UserWithPostCount) -> UserProfileResponse {
    UserProfileResponse {
        user: user(entry.user, false),
        posts_count: entry.posts_count,
        posts: None,
    }
}

/// Which total a listing reports.
#[derive(Debug, Clone, Copy)]
pub enum Listing {
    Posts,
    Users,
}

pub fn pagination<T>(page: &Page<T>, listing: Listing) -> PaginationMeta {
    let (total_posts, total_users) = match listing {
        Listing::Posts => (Some(page.total), None),
        Listing::Users => (None, Some(page.total)),
    };

    PaginationMeta {
        current_page: page.current_page,
        total_pages: page.total_pages,
        total_posts,
        total_users,
        has_next_page: page.has_next_page,
        has_prev_page: page.has_prev_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minilinkedin_core::domain::PageRequest;

    #[test]
    fn test_parse_id_rejects_garbage_as_not_found() {
        let err = parse_id("not-a-uuid", "Post").unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Post not found"));

        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Post").unwrap(), id);
    }

    #[test]
    fn test_pagination_reports_the_right_total() {
        let page = Page::new(vec![1, 2, 3], PageRequest::new(1, 3), 7);

        let meta = pagination(&page, Listing::Users);
        assert_eq!(meta.total_users, Some(7));
        assert_eq!(meta.total_posts, None);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next_page);
        assert!(!meta.has_prev_page);
    }

    #[test]
    fn test_user_hides_updated_at_unless_asked() {
        let u = User::new("Ada".into(), "ada@example.com".into(), "hash".into());
        assert!(user(u.clone(), false).updated_at.is_none());
        assert_eq!(user(u.clone(), true).updated_at, Some(u.updated_at));
    }
}
