use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};

use super::configure_routes;
use crate::config::AppConfig;
use crate::state::AppState;

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory(&AppConfig::default())))
                .configure(configure_routes),
        )
        .await
    };
}

/// Registers a user and yields `(token, user_id)`.
macro_rules! register {
    ($app:expr, $name:expr, $email:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "name": $name, "email": $email, "password": "secret123" }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }};
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

#[actix_web::test]
async fn test_index_and_health() {
    let app = test_app!();

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(body["status"], "running");
    assert!(body["version"].is_string());

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "in-memory");
}

#[actix_web::test]
async fn test_unknown_route_is_404() {
    let app = test_app!();

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/nope").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Route not found" }));
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let app = test_app!();
    let (_, user_id) = register!(app, "Ada Lovelace", "Ada@Example.com");

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "Other", "email": "ada@example.com", "password": "secret123" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ada@example.com", "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid credentials");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ada@example.com", "password": "secret123" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["token"].as_str().unwrap().to_string();
    assert!(body["user"].get("password_hash").is_none());

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["id"], user_id);
    assert_eq!(body["user"]["email"], "ada@example.com");
}

#[actix_web::test]
async fn test_register_validation_lists_fields() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "A", "email": "nope", "password": "123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);
}

#[actix_web::test]
async fn test_protected_routes_require_token() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({ "content": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "No token, authorization denied");

    let req = test::TestRequest::get()
        .uri("/api/users/profile")
        .insert_header(bearer("garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Token is not valid");
}

#[actix_web::test]
async fn test_post_ownership_flow() {
    let app = test_app!();
    let (owner, owner_id) = register!(app, "Owner", "owner@example.com");
    let (intruder, _) = register!(app, "Intruder", "intruder@example.com");

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&owner))
        .set_json(json!({ "content": "  hello  " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Post created successfully");
    assert_eq!(body["post"]["content"], "hello");
    assert_eq!(body["post"]["authorId"], owner_id);
    assert_eq!(body["post"]["author"]["name"], "Owner");
    let post_uri = format!("/api/posts/{}", body["post"]["id"].as_str().unwrap());

    // forbidden regardless of the content's validity
    let req = test::TestRequest::put()
        .uri(&post_uri)
        .insert_header(bearer(&intruder))
        .set_json(json!({ "content": "" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&post_uri)
        .insert_header(bearer(&intruder))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&post_uri)
        .insert_header(bearer(&owner))
        .set_json(json!({ "content": "hi" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Post updated successfully");
    assert_eq!(body["post"]["content"], "hi");

    let req = test::TestRequest::delete()
        .uri(&post_uri)
        .insert_header(bearer(&owner))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, test::TestRequest::get().uri(&post_uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Post not found");

    let req = test::TestRequest::delete()
        .uri(&post_uri)
        .insert_header(bearer(&owner))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_post_content_is_validated() {
    let app = test_app!();
    let (token, _) = register!(app, "Writer", "writer@example.com");

    for body in [json!({ "content": "   " }), json!({}), json!({ "content": "x".repeat(2001) })] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"][0]["field"], "content");
    }

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&token))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_malformed_ids_are_not_found() {
    let app = test_app!();

    for uri in ["/api/posts/123", "/api/users/abc", "/api/posts/user/xyz"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[actix_web::test]
async fn test_feed_pagination() {
    let app = test_app!();
    let (token, user_id) = register!(app, "Prolific", "prolific@example.com");

    for i in 0..25 {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(json!({ "content": format!("post {}", i) }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/api/posts?page=1&limit=10").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["posts"].as_array().unwrap().len(), 10);
    assert_eq!(body["pagination"]["totalPosts"], 25);
    assert_eq!(body["pagination"]["totalPages"], 3);
    assert_eq!(body["pagination"]["hasNextPage"], true);
    assert_eq!(body["pagination"]["hasPrevPage"], false);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/user/{}?page=3&limit=10", user_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "User posts retrieved successfully");
    assert_eq!(body["posts"].as_array().unwrap().len(), 5);
    assert_eq!(body["pagination"]["hasNextPage"], false);
    assert_eq!(body["pagination"]["hasPrevPage"], true);

    for query in ["page=0", "page=abc", "limit=-5", "page=100000000000000000"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/posts?{}", query))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", query);
    }

    // a repeated key fails query deserialization and still gets a JSON body
    let req = test::TestRequest::get()
        .uri("/api/posts?page=1&page=2")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|m| m.starts_with("Invalid query string")),
        "{}",
        body
    );
}

#[actix_web::test]
async fn test_profiles_and_directory() {
    let app = test_app!();
    let (token, user_id) = register!(app, "Grace", "grace@example.com");
    register!(app, "Linus", "linus@example.com");

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&token))
        .set_json(json!({ "content": "first" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::put()
        .uri("/api/users/profile")
        .insert_header(bearer(&token))
        .set_json(json!({ "bio": "  Admiral  " }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["user"]["bio"], "Admiral");
    assert_eq!(body["user"]["name"], "Grace");
    assert!(body["user"]["updatedAt"].is_string());

    let req = test::TestRequest::put()
        .uri("/api/users/profile")
        .insert_header(bearer(&token))
        .set_json(json!({ "name": "G", "bio": "b".repeat(501) }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/users/profile")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["postsCount"], 1);
    assert!(body["user"].get("posts").is_none());

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}", user_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["posts"][0]["content"], "first");
    assert!(body["user"].get("password_hash").is_none());

    let req = test::TestRequest::get().uri("/api/users?limit=1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["users"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["totalUsers"], 2);
    assert_eq!(body["pagination"]["totalPages"], 2);
}
