pub mod config;
pub mod error;
pub mod features;
pub mod middleware;

use axum::Router;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};

use middleware::auth::AuthState;

/// The full application router, without the API docs.
pub fn build_router(db: Database, auth: AuthState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .nest("/api", features::api_routes(auth))
        .layer(cors)
        .with_state(db)
}
