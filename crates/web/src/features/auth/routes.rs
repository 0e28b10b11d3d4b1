use axum::{Router, middleware, routing::post};
use storage::Database;

use super::handlers::{login, logout};
use crate::middleware::auth::{AuthState, require_auth};

pub fn routes(auth: AuthState) -> Router<Database> {
    let protected = Router::new()
        .route("/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(
            auth.sessions.clone(),
            require_auth,
        ));

    Router::new()
        .route("/login", post(login))
        .merge(protected)
        .with_state(auth)
}
