//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for the mock login, registration, and logout.
//! Login never validates the password; it deterministically derives a user
//! from the email alone. Logout tears the whole session down, purchases
//! included.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use crate::web::rest::UserDto;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/login - Mock login; always succeeds.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = UserDto),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut session = state.session.write().await;
    let user = session.login(&req.email, &req.password).await.map_err(|e| {
        error!("Failed to persist login: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to login".to_string(),
        )
    })?;
    Ok(Json(UserDto::from(&user)))
}

/// POST /auth/register - Mock registration; always succeeds.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut session = state.session.write().await;
    let user = session
        .register(&req.name, &req.email, &req.password)
        .await
        .map_err(|e| {
            error!("Failed to persist registration: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to register".to_string(),
            )
        })?;
    Ok((StatusCode::CREATED, Json(UserDto::from(&user))))
}

/// POST /auth/logout - Clears the user and purchase history.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut session = state.session.write().await;
    session.logout().await.map_err(|e| {
        error!("Failed to clear session: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to logout".to_string(),
        )
    })?;
    Ok(StatusCode::OK)
}
