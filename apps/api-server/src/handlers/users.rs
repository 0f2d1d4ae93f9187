//! Profile and user directory handlers.

use actix_web::{HttpResponse, web};

use minilinkedin_shared::dto::{PaginationQuery, UpdateProfileRequest, UserEnvelope, UserListEnvelope};

use super::views::{self, Listing};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/users/profile
pub async fn own_profile(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let profile = state.profiles.own_profile(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(UserEnvelope {
        message: "Profile retrieved successfully".to_string(),
        user: views::profile(profile),
    }))
}

/// PUT /api/users/profile
pub async fn update_profile(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let user = state
        .profiles
        .update_own_profile(identity.user_id, body.name.as_deref(), body.bio.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(UserEnvelope {
        message: "Profile updated successfully".to_string(),
        user: views::user(user, true),
    }))
}

/// GET /api/users/{id}
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = views::parse_id(&path, "User")?;
    let profile = state.profiles.profile_by_id(id).await?;
    Ok(HttpResponse::Ok().json(UserEnvelope {
        message: "User profile retrieved successfully".to_string(),
        user: views::profile(profile),
    }))
}

/// GET /api/users
pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<PaginationQuery>,
) -> AppResult<HttpResponse> {
    let request = state
        .pagination
        .parse(query.page.as_deref(), query.limit.as_deref())?;
    let page = state.profiles.list_users(request).await?;

    let pagination = views::pagination(&page, Listing::Users);
    Ok(HttpResponse::Ok().json(UserListEnvelope {
        message: "Users retrieved successfully".to_string(),
        users: page.items.into_iter().map(views::directory_entry).collect(),
        pagination,
    }))
}
