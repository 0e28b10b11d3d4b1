use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use storage::Database;

use super::handlers::{
    assign_round, clear_round, create_round, delete_round, get_assignment, list_rounds,
    reset_tournament, set_bye,
};
use crate::middleware::auth::{SessionStore, require_auth};

pub fn routes(sessions: SessionStore) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_round))
        .route("/:number", delete(delete_round))
        .route("/:number/bye", put(set_bye))
        .route("/:number/assignment", get(get_assignment).put(assign_round))
        .route("/:number/clear", post(clear_round))
        .route_layer(middleware::from_fn_with_state(sessions, require_auth));

    Router::new()
        .route("/", get(list_rounds))
        .merge(protected)
}

pub fn tournament_routes(sessions: SessionStore) -> Router<Database> {
    Router::new()
        .route("/reset", post(reset_tournament))
        .route_layer(middleware::from_fn_with_state(sessions, require_auth))
}
