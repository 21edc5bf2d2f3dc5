//! Authentication middleware
//!
//! Validates the bearer token on protected routes and exposes the caller

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{ErrorDetail, ErrorResponse};
use crate::services::AuthService;
use crate::AppState;

/// Authenticated user information extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
}

/// Authentication middleware that validates JWT tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Extract Authorization header
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    let Some(token) = token else {
        return unauthorized_response("Missing or invalid Authorization header");
    };

    let auth = AuthService::new(state.db.clone(), &state.config);
    let claims = match auth.validate_token(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!("Rejected token: {}", err);
            return unauthorized_response("Invalid or expired token");
        }
    };

    request.extensions_mut().insert(AuthUser {
        user_id: claims.uid,
        username: claims.sub,
    });

    next.run(request).await
}

fn unauthorized_body(message: &str) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message_en: message.to_string(),
            message_pt: "Não autorizado".to_string(),
            field: None,
        },
    })
}

/// Create unauthorized response
fn unauthorized_response(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, unauthorized_body(message)).into_response()
}

/// Extractor for authenticated user
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    unauthorized_body("Authentication required"),
                )
            })
    }
}
