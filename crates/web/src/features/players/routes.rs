use axum::{
    Router, middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{create_player, list_players, list_players_admin, toggle_player};
use crate::middleware::auth::{SessionStore, require_auth};

pub fn routes(sessions: SessionStore) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_player))
        .route("/admin", get(list_players_admin))
        .route("/:player_id/toggle", post(toggle_player))
        .route_layer(middleware::from_fn_with_state(sessions, require_auth));

    Router::new()
        .route("/", get(list_players))
        .merge(protected)
}
