pub mod auth;
pub mod players;
pub mod rounds;
pub mod standings;
pub mod tables;

use axum::Router;
use storage::Database;

use crate::middleware::auth::AuthState;

/// Every `/api` route, public and admin-only alike.
pub fn api_routes(auth_state: AuthState) -> Router<Database> {
    let sessions = auth_state.sessions.clone();

    Router::new()
        .nest("/auth", auth::routes::routes(auth_state))
        .nest("/standings", standings::routes::routes())
        .nest("/players", players::routes::routes(sessions.clone()))
        .nest("/rounds", rounds::routes::routes(sessions.clone()))
        .nest("/tables", tables::routes::routes(sessions.clone()))
        .nest("/tournament", rounds::routes::tournament_routes(sessions))
}
