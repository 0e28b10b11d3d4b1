use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::error::{WebError, WebResult};
use crate::middleware::auth::{AdminSession, AuthState};

use super::dto::{LoginRequest, LoginResponse};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, returns the session token", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Wrong username or password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(auth): State<AuthState>,
    Json(req): Json<LoginRequest>,
) -> WebResult<Response> {
    req.validate()?;

    if !auth
        .credentials
        .verify(req.username.trim(), &req.password)
    {
        tracing::warn!("Failed admin login attempt for '{}'", req.username);
        return Err(WebError::Unauthorized);
    }

    let session = auth.sessions.issue(req.username.trim()).await;
    tracing::info!("Admin '{}' logged in", session.username);

    Ok(Json(LoginResponse {
        token: session.token,
    })
    .into_response())
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Session closed"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth"
)]
pub async fn logout(
    State(auth): State<AuthState>,
    Extension(session): Extension<AdminSession>,
) -> WebResult<Response> {
    auth.sessions.revoke(session.token).await;
    tracing::info!("Admin '{}' logged out", session.username);

    Ok(StatusCode::NO_CONTENT.into_response())
}
