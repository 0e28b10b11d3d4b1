use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::NaiveDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::WebError;

/// Context of an authenticated admin, handed to every protected handler.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: Uuid,
    pub username: String,
    pub issued_at: NaiveDateTime,
}

/// In-memory registry of live admin sessions keyed by bearer token.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, AdminSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn issue(&self, username: &str) -> AdminSession {
        let session = AdminSession {
            token: Uuid::new_v4(),
            username: username.to_string(),
            issued_at: chrono::Utc::now().naive_utc(),
        };
        self.sessions
            .write()
            .await
            .insert(session.token, session.clone());
        session
    }

    pub async fn get(&self, token: Uuid) -> Option<AdminSession> {
        self.sessions.read().await.get(&token).cloned()
    }

    pub async fn revoke(&self, token: Uuid) -> bool {
        self.sessions.write().await.remove(&token).is_some()
    }
}

/// The single shared admin credential.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// State shared by the login endpoints and the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    pub sessions: SessionStore,
    pub credentials: AdminCredentials,
}

fn bearer_token(req: &Request) -> Option<Uuid> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .and_then(|token| Uuid::parse_str(token.trim()).ok())
}

/// Rejects requests without a live session and exposes the session to the
/// handler as an `Extension<AdminSession>`.
pub async fn require_auth(
    State(sessions): State<SessionStore>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let session = match bearer_token(&req) {
        Some(token) => sessions.get(token).await,
        None => None,
    };

    let Some(session) = session else {
        tracing::warn!("Rejected request without a valid admin session");
        return Err(WebError::Unauthorized);
    };

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
