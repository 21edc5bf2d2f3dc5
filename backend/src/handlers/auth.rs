//! Authentication handlers

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::auth::{AuthService, AuthToken, LoginInput};
use crate::AppState;

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginInput>,
) -> AppResult<Json<AuthToken>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let token = auth_service.login(body).await?;
    Ok(Json(token))
}
