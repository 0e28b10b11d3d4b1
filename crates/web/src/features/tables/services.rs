use sqlx::SqlitePool;
use storage::{
    dto::table::{TableResponse, UpdateTableResultRequest},
    repository::table::TableRepository,
};
use uuid::Uuid;

use crate::error::WebResult;

pub async fn get_table(pool: &SqlitePool, table_id: Uuid) -> WebResult<TableResponse> {
    let repo = TableRepository::new(pool);
    let table = repo.find_by_id(table_id).await?;
    let results = repo.results(table_id).await?;

    Ok(TableResponse::new(table, results))
}

/// Check the outcome against who sits at the table, then record it.
pub async fn record_result(
    pool: &SqlitePool,
    table_id: Uuid,
    req: &UpdateTableResultRequest,
) -> WebResult<TableResponse> {
    let repo = TableRepository::new(pool);
    repo.find_by_id(table_id).await?;

    let seated = repo.seated_players(table_id).await?;
    let outcome = req.to_outcome(&seated)?;

    let table = repo.apply_outcome(table_id, &outcome).await?;
    let results = repo.results(table_id).await?;

    Ok(TableResponse::new(table, results))
}

pub async fn reset_table(pool: &SqlitePool, table_id: Uuid) -> WebResult<TableResponse> {
    let repo = TableRepository::new(pool);
    let table = repo.reset(table_id).await?;
    let results = repo.results(table_id).await?;

    Ok(TableResponse::new(table, results))
}

pub async fn delete_table(pool: &SqlitePool, table_id: Uuid) -> WebResult<()> {
    let table = TableRepository::new(pool).delete(table_id).await?;
    tracing::debug!(
        "Deleted table {} of round {}",
        table.table_no,
        table.round_number
    );

    Ok(())
}
