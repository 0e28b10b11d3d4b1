use sqlx::SqlitePool;
use storage::{
    dto::round::{RoundAssignmentRequest, RoundAssignmentResponse, RoundOverview, SetByeRequest},
    error::Result as StorageResult,
    models::Round,
    repository::{player::PlayerRepository, round::RoundRepository},
};

use crate::error::WebResult;

pub async fn list_rounds(pool: &SqlitePool) -> StorageResult<Vec<RoundOverview>> {
    RoundRepository::new(pool).list_overviews().await
}

pub async fn create_round(pool: &SqlitePool) -> StorageResult<Round> {
    RoundRepository::new(pool).create_next().await
}

pub async fn delete_round(pool: &SqlitePool, number: i64) -> StorageResult<()> {
    RoundRepository::new(pool).delete(number).await
}

pub async fn set_bye(pool: &SqlitePool, number: i64, req: &SetByeRequest) -> StorageResult<Round> {
    RoundRepository::new(pool)
        .set_bye(number, req.bye_player_id)
        .await
}

pub async fn get_assignment(
    pool: &SqlitePool,
    number: i64,
) -> StorageResult<RoundAssignmentResponse> {
    RoundRepository::new(pool).assignment(number).await
}

/// Validate the composition against the active roster, then store it.
pub async fn assign_round(
    pool: &SqlitePool,
    number: i64,
    req: &RoundAssignmentRequest,
) -> WebResult<RoundAssignmentResponse> {
    let active: Vec<_> = PlayerRepository::new(pool)
        .list_active()
        .await?
        .into_iter()
        .map(|p| p.player_id)
        .collect();

    let partition = req.to_partition(&active)?;

    let repo = RoundRepository::new(pool);
    repo.apply_assignment(number, &partition).await?;

    Ok(repo.assignment(number).await?)
}

pub async fn clear_round(pool: &SqlitePool, number: i64) -> StorageResult<u64> {
    RoundRepository::new(pool).clear(number).await
}

pub async fn reset_tournament(pool: &SqlitePool) -> StorageResult<()> {
    RoundRepository::new(pool).reset_tournament().await
}
