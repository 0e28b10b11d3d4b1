use sqlx::SqlitePool;
use storage::{
    dto::standings::StandingsResponse, error::Result,
    repository::standings::StandingsRepository, services::standings::compute_standings,
};

/// Recompute the standings from the current state of the store
pub async fn get_standings(pool: &SqlitePool) -> Result<StandingsResponse> {
    let snapshot = StandingsRepository::new(pool).load_snapshot().await?;

    tracing::debug!(
        players = snapshot.players.len(),
        rounds = snapshot.rounds.len(),
        tables = snapshot.tables.len(),
        "Computing standings"
    );

    Ok(compute_standings(&snapshot))
}
