//! Post handlers: the feed and per-post CRUD.

use actix_web::{HttpResponse, web};

use minilinkedin_shared::MessageResponse;
use minilinkedin_shared::dto::{PaginationQuery, PostContentRequest, PostEnvelope, PostListEnvelope};

use super::views::{self, Listing};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn post_envelope(message: &str, post: minilinkedin_core::domain::PostWithAuthor) -> PostEnvelope {
    PostEnvelope {
        message: message.to_string(),
        post: views::post(post),
    }
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostContentRequest>,
) -> AppResult<HttpResponse> {
    let created = state.posts.create(identity.user_id, &body.content).await?;
    Ok(HttpResponse::Created().json(post_envelope("Post created successfully", created)))
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PaginationQuery>,
) -> AppResult<HttpResponse> {
    let request = state
        .pagination
        .parse(query.page.as_deref(), query.limit.as_deref())?;
    let page = state.posts.list_feed(request).await?;

    let pagination = views::pagination(&page, Listing::Posts);
    Ok(HttpResponse::Ok().json(PostListEnvelope {
        message: "Posts retrieved successfully".to_string(),
        posts: page.items.into_iter().map(views::post).collect(),
        pagination,
    }))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = views::parse_id(&path, "Post")?;
    let post = state.posts.get(id).await?;
    Ok(HttpResponse::Ok().json(post_envelope("Post retrieved successfully", post)))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<PostContentRequest>,
) -> AppResult<HttpResponse> {
    let id = views::parse_id(&path, "Post")?;
    let post = state
        .posts
        .update(id, identity.user_id, &body.content)
        .await?;
    Ok(HttpResponse::Ok().json(post_envelope("Post updated successfully", post)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = views::parse_id(&path, "Post")?;
    state.posts.delete(id, identity.user_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

/// GET /api/posts/user/{user_id}
pub async fn list_user_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PaginationQuery>,
) -> AppResult<HttpResponse> {
    let author_id = views::parse_id(&path, "User")?;
    let request = state
        .pagination
        .parse(query.page.as_deref(), query.limit.as_deref())?;
    let page = state.posts.list_by_author(author_id, request).await?;

    let pagination = views::pagination(&page, Listing::Posts);
    Ok(HttpResponse::Ok().json(PostListEnvelope {
        message: "User posts retrieved successfully".to_string(),
        posts: page.items.into_iter().map(views::post).collect(),
        pagination,
    }))
}
