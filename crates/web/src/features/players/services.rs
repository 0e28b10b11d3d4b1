use sqlx::SqlitePool;
use storage::{
    dto::player::{CreatePlayerRequest, PlayerAdminEntry},
    error::Result,
    models::Player,
    repository::player::PlayerRepository,
};
use uuid::Uuid;

/// List active players
pub async fn list_active_players(pool: &SqlitePool) -> Result<Vec<Player>> {
    let repo = PlayerRepository::new(pool);
    repo.list_active().await
}

/// List every player with their result counts
pub async fn list_players_admin(pool: &SqlitePool) -> Result<Vec<PlayerAdminEntry>> {
    let repo = PlayerRepository::new(pool);
    repo.list_with_counts().await
}

/// Register a new player
pub async fn create_player(pool: &SqlitePool, request: &CreatePlayerRequest) -> Result<Player> {
    let repo = PlayerRepository::new(pool);
    repo.create(request).await
}

/// Activate or deactivate a player
pub async fn toggle_player(pool: &SqlitePool, player_id: Uuid) -> Result<Player> {
    let repo = PlayerRepository::new(pool);
    repo.toggle_active(player_id).await
}
