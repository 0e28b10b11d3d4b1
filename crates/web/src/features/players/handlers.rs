use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::player::{CreatePlayerRequest, PlayerAdminEntry, PlayerResponse},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebResult;
use crate::middleware::auth::AdminSession;

use super::services;

#[utoipa::path(
    get,
    path = "/api/players",
    responses(
        (status = 200, description = "Active players ordered by name", body = Vec<PlayerResponse>)
    ),
    tag = "players"
)]
pub async fn list_players(State(db): State<Database>) -> WebResult<Response> {
    let players = services::list_active_players(db.pool()).await?;

    let response: Vec<PlayerResponse> = players.into_iter().map(PlayerResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/players/admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All players, including inactive ones, with result counts", body = Vec<PlayerAdminEntry>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "players"
)]
pub async fn list_players_admin(State(db): State<Database>) -> WebResult<Response> {
    let players = services::list_players_admin(db.pool()).await?;

    Ok(Json(players).into_response())
}

#[utoipa::path(
    post,
    path = "/api/players",
    request_body = CreatePlayerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Player created", body = PlayerResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "A player with that name already exists")
    ),
    tag = "players"
)]
pub async fn create_player(
    State(db): State<Database>,
    Extension(session): Extension<AdminSession>,
    Json(req): Json<CreatePlayerRequest>,
) -> WebResult<Response> {
    req.validate()?;

    let player = services::create_player(db.pool(), &req).await?;
    tracing::info!("{} added player '{}'", session.username, player.name);

    Ok((StatusCode::CREATED, Json(PlayerResponse::from(player))).into_response())
}

#[utoipa::path(
    post,
    path = "/api/players/{player_id}/toggle",
    params(
        ("player_id" = Uuid, Path, description = "Player id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Player active flag flipped", body = PlayerResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Player not found")
    ),
    tag = "players"
)]
pub async fn toggle_player(
    State(db): State<Database>,
    Path(player_id): Path<Uuid>,
    Extension(session): Extension<AdminSession>,
) -> WebResult<Response> {
    let player = services::toggle_player(db.pool(), player_id).await?;
    tracing::info!(
        "{} set player '{}' {}",
        session.username,
        player.name,
        if player.active { "active" } else { "inactive" }
    );

    Ok(Json(PlayerResponse::from(player)).into_response())
}
