//! Authentication handlers.

use actix_web::{HttpResponse, web};

use minilinkedin_core::services::Session;
use minilinkedin_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserEnvelope};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn auth_response(message: &str, session: Session) -> AuthResponse {
    AuthResponse {
        message: message.to_string(),
        token: session.token,
        token_type: "Bearer".to_string(),
        expires_in: session.expires_in.max(0) as u64,
        user: views::user(session.user, false),
    }
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let session = state
        .accounts
        .register(&body.name, &body.email, &body.password)
        .await?;

    Ok(HttpResponse::Created().json(auth_response("User registered successfully", session)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let session = state.accounts.login(&body.email, &body.password).await?;

    Ok(HttpResponse::Ok().json(auth_response("Login successful", session)))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.accounts.current_user(identity.user_id).await?;

    Ok(HttpResponse::Ok().json(UserEnvelope {
        message: "User retrieved successfully".to_string(),
        user: views::user(user, false),
    }))
}
