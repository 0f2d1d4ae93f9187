//! Application services - the use cases exposed over HTTP.
//! Each service receives its repositories at construction time.

mod access;
mod accounts;
mod posts;
mod profiles;

pub use access::ensure_owner;
pub use accounts::{AccountService, Session};
pub use posts::PostService;
pub use profiles::{PROFILE_POSTS_LIMIT, ProfileService};
