//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;
mod users;
mod views;

#[cfg(test)]
mod tests;

use actix_web::{HttpResponse, web};

use minilinkedin_shared::ErrorResponse;

use crate::middleware::error::{json_error_handler, query_error_handler};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .route("/", web::get().to(health::index))
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                // Auth routes
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                )
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list_posts))
                        .route("", web::post().to(posts::create_post))
                        .route("/user/{user_id}", web::get().to(posts::list_user_posts))
                        .route("/{id}", web::get().to(posts::get_post))
                        .route("/{id}", web::put().to(posts::update_post))
                        .route("/{id}", web::delete().to(posts::delete_post)),
                )
                // "/profile" must be registered before "/{id}"
                .service(
                    web::scope("/users")
                        .route("", web::get().to(users::list_users))
                        .route("/profile", web::get().to(users::own_profile))
                        .route("/profile", web::put().to(users::update_profile))
                        .route("/{id}", web::get().to(users::get_user)),
                ),
        )
        .default_service(web::to(route_not_found));
}

async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::route_not_found())
}
