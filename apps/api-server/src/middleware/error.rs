//! Error handling - maps every failure to a `{message, errors?, error?}` body.

use std::fmt;

use actix_web::{
    HttpMessage, HttpRequest, HttpResponse, ResponseError,
    dev::ServiceResponse,
    error::{JsonPayloadError, QueryPayloadError},
    http::StatusCode,
    middleware::{ErrorHandlerResponse, ErrorHandlers},
};
use minilinkedin_core::error::{DomainError, FieldError, RepoError};
use minilinkedin_core::ports::AuthError;
use minilinkedin_shared::{ErrorResponse, FieldErrorBody};

use crate::observability::RequestId;

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Validation(Vec<FieldError>),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg) => ErrorResponse::new(msg.clone()),
            AppError::Validation(errors) => ErrorResponse::validation_failed(
                errors
                    .iter()
                    .map(|e| FieldErrorBody {
                        field: e.field.to_string(),
                        message: e.message.clone(),
                    })
                    .collect(),
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::server_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, .. } => {
                AppError::NotFound(format!("{} not found", entity_type))
            }
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized => AppError::Unauthorized("Invalid credentials".to_string()),
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        DomainError::from(err).into()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::TokenExpired => {
                AppError::Unauthorized(err.to_string())
            }
            // the decoder's reason stays in the logs
            AuthError::InvalidToken(_) => AppError::Unauthorized("Token is not valid".to_string()),
            AuthError::Hashing(msg) => AppError::Internal(msg),
        }
    }
}

/// Turn malformed JSON bodies into 400 responses.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log_rejection(req, "request body", &err);
    AppError::BadRequest(format!("Invalid request body: {}", err)).into()
}

/// Turn query strings that fail to deserialize (e.g. a repeated `page`) into 400 responses.
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    log_rejection(req, "query string", &err);
    AppError::BadRequest(format!("Invalid query string: {}", err)).into()
}

fn log_rejection(req: &HttpRequest, what: &str, err: &dyn fmt::Display) {
    let extensions = req.extensions();
    let request_id = extensions.get::<RequestId>().map_or("-", RequestId::as_str);
    tracing::debug!(request_id, "Rejected {}: {}", what, err);
}

/// Rewrites 500 bodies produced by `AppError::Internal` to carry the internal
/// detail in `error`. Wrapped per `App`; a no-op unless `expose` is set.
pub fn internal_error_detail<B: 'static>(expose: bool) -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, move |res: ServiceResponse<B>| {
        let detail = match res.response().error().and_then(|e| e.as_error::<AppError>()) {
            Some(AppError::Internal(detail)) if expose => Some(detail.clone()),
            _ => None,
        };
        let Some(detail) = detail else {
            return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
        };

        let (req, _) = res.into_parts();
        let response = HttpResponse::InternalServerError()
            .json(ErrorResponse::server_error().with_detail(detail));
        Ok(ErrorHandlerResponse::Response(
            ServiceResponse::new(req, response).map_into_right_body(),
        ))
    })
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};
    use uuid::Uuid;

    async fn failing() -> AppResult<HttpResponse> {
        Err(AppError::Internal("connection pool exhausted".to_string()))
    }

    async fn missing() -> AppResult<HttpResponse> {
        Err(AppError::NotFound("Post not found".to_string()))
    }

    #[::core::prelude::v1::test]
    fn test_domain_errors_map_to_status_codes() {
        let cases = [
            (DomainError::not_found("Post", Uuid::new_v4()), StatusCode::NOT_FOUND),
            (DomainError::invalid("content", "empty"), StatusCode::BAD_REQUEST),
            (DomainError::Forbidden("no".to_string()), StatusCode::FORBIDDEN),
            (DomainError::Duplicate("dup".to_string()), StatusCode::CONFLICT),
            (DomainError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                DomainError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[::core::prelude::v1::test]
    fn test_not_found_message_names_entity() {
        let err = AppError::from(DomainError::not_found("Post", Uuid::new_v4()));
        assert_eq!(err.to_string(), "Not found: Post not found");
    }

    #[::core::prelude::v1::test]
    fn test_auth_errors_are_unauthorized() {
        let err = AppError::from(AuthError::MissingToken);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Unauthorized: No token, authorization denied");
    }

    #[actix_web::test]
    async fn test_internal_detail_is_chosen_per_app() {
        let production = test::init_service(
            App::new()
                .wrap(internal_error_detail(false))
                .route("/", web::get().to(failing)),
        )
        .await;
        let development = test::init_service(
            App::new()
                .wrap(internal_error_detail(true))
                .route("/", web::get().to(failing))
                .route("/missing", web::get().to(missing)),
        )
        .await;

        let res = test::call_service(&production, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"message": "Server error"}));

        let res = test::call_service(&development, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({"message": "Server error", "error": "connection pool exhausted"})
        );

        // other statuses pass through untouched
        let res =
            test::call_service(&development, test::TestRequest::get().uri("/missing").to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"message": "Post not found"}));
    }
}
