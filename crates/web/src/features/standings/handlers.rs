use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{Database, dto::standings::StandingsResponse};

use crate::error::WebResult;

use super::services;

#[utoipa::path(
    get,
    path = "/api/standings",
    responses(
        (status = 200, description = "Live standings with participation and top-4 verdicts", body = StandingsResponse)
    ),
    tag = "standings"
)]
pub async fn get_standings(State(db): State<Database>) -> WebResult<Response> {
    let standings = services::get_standings(db.pool()).await?;

    Ok(Json(standings).into_response())
}
