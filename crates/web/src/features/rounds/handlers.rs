use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use storage::{
    Database,
    dto::round::{
        CreatedRoundResponse, RoundAssignmentRequest, RoundAssignmentResponse, RoundOverview,
        SetByeRequest,
    },
};

use crate::error::WebResult;
use crate::middleware::auth::AdminSession;

use super::services;

#[utoipa::path(
    get,
    path = "/api/rounds",
    responses(
        (status = 200, description = "Every round with its bye and tables", body = Vec<RoundOverview>)
    ),
    tag = "rounds"
)]
pub async fn list_rounds(State(db): State<Database>) -> WebResult<Response> {
    let rounds = services::list_rounds(db.pool()).await?;

    Ok(Json(rounds).into_response())
}

#[utoipa::path(
    post,
    path = "/api/rounds",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Round created after the last one", body = CreatedRoundResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "rounds"
)]
pub async fn create_round(
    State(db): State<Database>,
    Extension(session): Extension<AdminSession>,
) -> WebResult<Response> {
    let round = services::create_round(db.pool()).await?;
    tracing::info!("{} created round {}", session.username, round.number);

    Ok((
        StatusCode::CREATED,
        Json(CreatedRoundResponse {
            number: round.number,
        }),
    )
        .into_response())
}

#[utoipa::path(
    delete,
    path = "/api/rounds/{number}",
    params(
        ("number" = i64, Path, description = "Round number")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Round, its tables and results deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Round not found")
    ),
    tag = "rounds"
)]
pub async fn delete_round(
    State(db): State<Database>,
    Path(number): Path<i64>,
    Extension(session): Extension<AdminSession>,
) -> WebResult<Response> {
    services::delete_round(db.pool(), number).await?;
    tracing::info!("{} deleted round {}", session.username, number);

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    put,
    path = "/api/rounds/{number}/bye",
    params(
        ("number" = i64, Path, description = "Round number")
    ),
    request_body = SetByeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Bye updated", body = RoundAssignmentResponse),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Player unknown or seated in this round")
    ),
    tag = "rounds"
)]
pub async fn set_bye(
    State(db): State<Database>,
    Path(number): Path<i64>,
    Extension(session): Extension<AdminSession>,
    Json(req): Json<SetByeRequest>,
) -> WebResult<Response> {
    services::set_bye(db.pool(), number, &req).await?;
    tracing::info!("{} updated the bye of round {}", session.username, number);

    let assignment = services::get_assignment(db.pool(), number).await?;
    Ok(Json(assignment).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rounds/{number}/assignment",
    params(
        ("number" = i64, Path, description = "Round number")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current composition of the round", body = RoundAssignmentResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Round not found")
    ),
    tag = "rounds"
)]
pub async fn get_assignment(
    State(db): State<Database>,
    Path(number): Path<i64>,
) -> WebResult<Response> {
    let assignment = services::get_assignment(db.pool(), number).await?;

    Ok(Json(assignment).into_response())
}

#[utoipa::path(
    put,
    path = "/api/rounds/{number}/assignment",
    params(
        ("number" = i64, Path, description = "Round number")
    ),
    request_body = RoundAssignmentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Composition stored", body = RoundAssignmentResponse),
        (status = 400, description = "Not a 4 + 4 + bye split of the active players"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "rounds"
)]
pub async fn assign_round(
    State(db): State<Database>,
    Path(number): Path<i64>,
    Extension(session): Extension<AdminSession>,
    Json(req): Json<RoundAssignmentRequest>,
) -> WebResult<Response> {
    let assignment = services::assign_round(db.pool(), number, &req).await?;
    tracing::info!("{} assigned tables for round {}", session.username, number);

    Ok(Json(assignment).into_response())
}

#[utoipa::path(
    post,
    path = "/api/rounds/{number}/clear",
    params(
        ("number" = i64, Path, description = "Round number")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Outcomes of the round's tables blanked"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "rounds"
)]
pub async fn clear_round(
    State(db): State<Database>,
    Path(number): Path<i64>,
    Extension(session): Extension<AdminSession>,
) -> WebResult<Response> {
    let cleared = services::clear_round(db.pool(), number).await?;
    tracing::info!(
        "{} cleared {} table(s) of round {}",
        session.username,
        cleared,
        number
    );

    Ok(Json(json!({ "tables_cleared": cleared })).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournament/reset",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Every round, table and result removed; players kept"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "rounds"
)]
pub async fn reset_tournament(
    State(db): State<Database>,
    Extension(session): Extension<AdminSession>,
) -> WebResult<Response> {
    services::reset_tournament(db.pool()).await?;
    tracing::warn!("{} reset the tournament", session.username);

    Ok(StatusCode::NO_CONTENT.into_response())
}
