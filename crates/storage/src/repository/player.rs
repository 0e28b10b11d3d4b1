use sqlx::SqlitePool;
use uuid::Uuid;

use crate::dto::player::{CreatePlayerRequest, PlayerAdminEntry};
use crate::error::{Result, StorageError};
use crate::models::Player;

/// Repository for Player database operations
pub struct PlayerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PlayerRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List active players ordered by name
    pub async fn list_active(&self) -> Result<Vec<Player>> {
        let players = sqlx::query_as::<_, Player>(
            r#"
            SELECT player_id, name, active, created_at
            FROM players
            WHERE active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(players)
    }

    /// List every player, active or not, with the number of tables they sat at
    pub async fn list_with_counts(&self) -> Result<Vec<PlayerAdminEntry>> {
        let players = sqlx::query_as::<_, PlayerAdminEntry>(
            r#"
            SELECT p.player_id, p.name, p.active, COUNT(r.table_id) AS results_count
            FROM players p
            LEFT JOIN game_results r ON r.player_id = p.player_id
            GROUP BY p.player_id, p.name, p.active
            ORDER BY p.name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(players)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Player> {
        sqlx::query_as::<_, Player>(
            r#"
            SELECT player_id, name, active, created_at
            FROM players
            WHERE player_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Case-insensitive name lookup
    pub async fn find_by_name_ci(&self, name: &str) -> Result<Option<Player>> {
        let player = sqlx::query_as::<_, Player>(
            r#"
            SELECT player_id, name, active, created_at
            FROM players
            WHERE lower(name) = lower(?)
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(player)
    }

    /// Register a new, active player. Names colliding case-insensitively with
    /// an existing player are rejected.
    pub async fn create(&self, req: &CreatePlayerRequest) -> Result<Player> {
        let name = req.normalized_name();

        if self.find_by_name_ci(name).await?.is_some() {
            return Err(StorageError::ConstraintViolation(format!(
                "A player named '{}' already exists",
                name
            )));
        }

        let player = sqlx::query_as::<_, Player>(
            r#"
            INSERT INTO players (player_id, name, active, created_at)
            VALUES (?, ?, 1, ?)
            RETURNING player_id, name, active, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(chrono::Utc::now().naive_utc())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                return StorageError::ConstraintViolation(format!(
                    "A player named '{}' already exists",
                    name
                ));
            }
            err
        })?;

        Ok(player)
    }

    /// Flip a player's active flag. Players are never deleted.
    pub async fn toggle_active(&self, id: Uuid) -> Result<Player> {
        sqlx::query_as::<_, Player>(
            r#"
            UPDATE players
            SET active = NOT active
            WHERE player_id = ?
            RETURNING player_id, name, active, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Insert any of `names` not registered yet. Returns how many were added.
    pub async fn ensure_roster(&self, names: &[&str]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for name in names {
            let result = sqlx::query(
                r#"
                INSERT INTO players (player_id, name, active, created_at)
                VALUES (?, ?, 1, ?)
                ON CONFLICT (name) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(*name)
            .bind(chrono::Utc::now().naive_utc())
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM players")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
