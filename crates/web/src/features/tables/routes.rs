use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use storage::Database;

use super::handlers::{delete_table, get_table, record_result, reset_table};
use crate::middleware::auth::{SessionStore, require_auth};

pub fn routes(sessions: SessionStore) -> Router<Database> {
    let protected = Router::new()
        .route("/:table_id", delete(delete_table))
        .route("/:table_id/result", put(record_result))
        .route("/:table_id/reset", post(reset_table))
        .route_layer(middleware::from_fn_with_state(sessions, require_auth));

    Router::new()
        .route("/:table_id", get(get_table))
        .merge(protected)
}
