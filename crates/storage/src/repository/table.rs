use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::dto::table::TableOutcome;
use crate::error::{Result, StorageError};
use crate::models::{GameTable, TableResult};

const TABLE_COLUMNS: &str =
    "table_id, round_number, table_no, banned_card, sweep, save_player_id, created_at";

/// Repository for tables and the results they own
pub struct TableRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TableRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<GameTable> {
        sqlx::query_as::<_, GameTable>(&format!(
            "SELECT {TABLE_COLUMNS} FROM game_tables WHERE table_id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn results(&self, id: Uuid) -> Result<Vec<TableResult>> {
        let results = sqlx::query_as::<_, TableResult>(
            r#"
            SELECT table_id, player_id, position
            FROM game_results
            WHERE table_id = ?
            "#,
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(results)
    }

    /// Players seated at a table
    pub async fn seated_players(&self, id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self
            .results(id)
            .await?
            .into_iter()
            .map(|r| r.player_id)
            .collect())
    }

    /// Every table ordered by round then table number, each with its results
    pub async fn list_with_results(&self) -> Result<Vec<(GameTable, Vec<TableResult>)>> {
        let tables = sqlx::query_as::<_, GameTable>(&format!(
            "SELECT {TABLE_COLUMNS} FROM game_tables ORDER BY round_number, table_no"
        ))
        .fetch_all(self.pool)
        .await?;

        let results = sqlx::query_as::<_, TableResult>(
            "SELECT table_id, player_id, position FROM game_results",
        )
        .fetch_all(self.pool)
        .await?;

        let mut by_table: HashMap<Uuid, Vec<TableResult>> = HashMap::new();
        for result in results {
            by_table.entry(result.table_id).or_default().push(result);
        }

        Ok(tables
            .into_iter()
            .map(|table| {
                let results = by_table.remove(&table.table_id).unwrap_or_default();
                (table, results)
            })
            .collect())
    }

    /// Write a validated outcome: table fields first, then every position is
    /// cleared and the podium re-applied.
    pub async fn apply_outcome(&self, id: Uuid, outcome: &TableOutcome) -> Result<GameTable> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE game_tables
            SET banned_card = ?, sweep = ?, save_player_id = ?
            WHERE table_id = ?
            "#,
        )
        .bind(&outcome.banned_card)
        .bind(outcome.sweep)
        .bind(outcome.save_player_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        clear_positions(&mut tx, id).await?;

        for (player_id, position) in &outcome.placements {
            sqlx::query("UPDATE game_results SET position = ? WHERE table_id = ? AND player_id = ?")
                .bind(position.as_db())
                .bind(id)
                .bind(player_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        self.find_by_id(id).await
    }

    /// Blank a table's outcome while keeping who sits there
    pub async fn reset(&self, id: Uuid) -> Result<GameTable> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE game_tables
            SET banned_card = NULL, sweep = 0, save_player_id = NULL
            WHERE table_id = ?
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        clear_positions(&mut tx, id).await?;
        tx.commit().await?;

        self.find_by_id(id).await
    }

    /// Delete a table together with its results. Returns the deleted table.
    pub async fn delete(&self, id: Uuid) -> Result<GameTable> {
        let table = self.find_by_id(id).await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM game_results WHERE table_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM game_tables WHERE table_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(table)
    }
}

async fn clear_positions(conn: &mut SqliteConnection, table_id: Uuid) -> Result<()> {
    sqlx::query("UPDATE game_results SET position = NULL WHERE table_id = ?")
        .bind(table_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Id of table `table_no` in round `round_number`, creating an empty one if
/// needed.
pub(crate) async fn get_or_create_table(
    conn: &mut SqliteConnection,
    round_number: i64,
    table_no: i64,
) -> Result<Uuid> {
    let existing = sqlx::query_scalar::<_, Uuid>(
        "SELECT table_id FROM game_tables WHERE round_number = ? AND table_no = ?",
    )
    .bind(round_number)
    .bind(table_no)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(table_id) = existing {
        return Ok(table_id);
    }

    let table_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO game_tables (table_id, round_number, table_no, sweep, created_at)
        VALUES (?, ?, ?, 0, ?)
        "#,
    )
    .bind(table_id)
    .bind(round_number)
    .bind(table_no)
    .bind(chrono::Utc::now().naive_utc())
    .execute(&mut *conn)
    .await?;

    Ok(table_id)
}
