use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::table::{TableResponse, UpdateTableResultRequest},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebResult;
use crate::middleware::auth::AdminSession;

use super::services;

#[utoipa::path(
    get,
    path = "/api/tables/{table_id}",
    params(
        ("table_id" = Uuid, Path, description = "Table id")
    ),
    responses(
        (status = 200, description = "Table with its seated players", body = TableResponse),
        (status = 404, description = "Table not found")
    ),
    tag = "tables"
)]
pub async fn get_table(
    State(db): State<Database>,
    Path(table_id): Path<Uuid>,
) -> WebResult<Response> {
    let table = services::get_table(db.pool(), table_id).await?;

    Ok(Json(table).into_response())
}

#[utoipa::path(
    put,
    path = "/api/tables/{table_id}/result",
    params(
        ("table_id" = Uuid, Path, description = "Table id")
    ),
    request_body = UpdateTableResultRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Outcome recorded", body = TableResponse),
        (status = 400, description = "Invalid outcome for the players at this table"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Table not found")
    ),
    tag = "tables"
)]
pub async fn record_result(
    State(db): State<Database>,
    Path(table_id): Path<Uuid>,
    Extension(session): Extension<AdminSession>,
    Json(req): Json<UpdateTableResultRequest>,
) -> WebResult<Response> {
    req.validate()?;

    let table = services::record_result(db.pool(), table_id, &req).await?;
    tracing::info!(
        "{} recorded the result of table {} in round {}",
        session.username,
        table.table_no,
        table.round_number
    );

    Ok(Json(table).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tables/{table_id}/reset",
    params(
        ("table_id" = Uuid, Path, description = "Table id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Outcome blanked, seats kept", body = TableResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Table not found")
    ),
    tag = "tables"
)]
pub async fn reset_table(
    State(db): State<Database>,
    Path(table_id): Path<Uuid>,
    Extension(session): Extension<AdminSession>,
) -> WebResult<Response> {
    let table = services::reset_table(db.pool(), table_id).await?;
    tracing::info!(
        "{} reset table {} in round {}",
        session.username,
        table.table_no,
        table.round_number
    );

    Ok(Json(table).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/tables/{table_id}",
    params(
        ("table_id" = Uuid, Path, description = "Table id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Table and its results deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Table not found")
    ),
    tag = "tables"
)]
pub async fn delete_table(
    State(db): State<Database>,
    Path(table_id): Path<Uuid>,
    Extension(session): Extension<AdminSession>,
) -> WebResult<Response> {
    services::delete_table(db.pool(), table_id).await?;
    tracing::info!("{} deleted table {}", session.username, table_id);

    Ok(StatusCode::NO_CONTENT.into_response())
}
