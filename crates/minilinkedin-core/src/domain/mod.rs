//! Domain entities - the core business objects.

mod pagination;
mod post;
mod user;

pub mod validation;

pub use pagination::{DEFAULT_LIMIT, MAX_LIMIT, Page, PageRequest, PaginationPolicy};
pub use post::{Post, PostWithAuthor};
pub use user::{Author, ProfileChanges, User, UserProfile, UserWithPostCount};
