use std::collections::{BTreeMap, HashMap};

use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::dto::round::{
    ParticipantView, PlayerRef, RoundAssignmentResponse, RoundOverview, RoundPartition,
    TableOverview,
};
use crate::error::{Result, StorageError};
use crate::models::{GameTable, Player, Position, Round, TableResult};
use crate::repository::table::{TableRepository, get_or_create_table};

/// Repository for rounds, their byes and table composition
pub struct RoundRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RoundRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Round>> {
        let rounds = sqlx::query_as::<_, Round>(
            "SELECT number, bye_player_id, created_at FROM rounds ORDER BY number",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rounds)
    }

    pub async fn find(&self, number: i64) -> Result<Option<Round>> {
        let round = sqlx::query_as::<_, Round>(
            "SELECT number, bye_player_id, created_at FROM rounds WHERE number = ?",
        )
        .bind(number)
        .fetch_optional(self.pool)
        .await?;

        Ok(round)
    }

    /// Every known round (from round records or tables) with its tables,
    /// ordered by round number then table number.
    pub async fn list_overviews(&self) -> Result<Vec<RoundOverview>> {
        let names: HashMap<Uuid, String> = sqlx::query_as::<_, Player>(
            "SELECT player_id, name, active, created_at FROM players",
        )
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(|p| (p.player_id, p.name))
        .collect();
        let name_of = |id: Uuid| names.get(&id).cloned().unwrap_or_default();

        let mut overviews: BTreeMap<i64, RoundOverview> = BTreeMap::new();

        for round in self.list().await? {
            overviews.insert(
                round.number,
                RoundOverview {
                    number: round.number,
                    bye: round.bye_player_id.map(|player_id| PlayerRef {
                        player_id,
                        name: name_of(player_id),
                    }),
                    tables: Vec::new(),
                },
            );
        }

        let tables = TableRepository::new(self.pool).list_with_results().await?;
        for (table, results) in tables {
            let round_number = table.round_number;
            let overview = table_overview(table, results, &name_of);
            overviews
                .entry(round_number)
                .or_insert_with(|| RoundOverview {
                    number: round_number,
                    bye: None,
                    tables: Vec::new(),
                })
                .tables
                .push(overview);
        }

        Ok(overviews.into_values().collect())
    }

    /// One past the highest round number seen in round records or tables
    pub async fn next_number(&self) -> Result<i64> {
        let max_round = sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(number) FROM rounds")
            .fetch_one(self.pool)
            .await?
            .unwrap_or(0);
        let max_table =
            sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(round_number) FROM game_tables")
                .fetch_one(self.pool)
                .await?
                .unwrap_or(0);

        Ok(max_round.max(max_table) + 1)
    }

    /// Create an empty round after the last one
    pub async fn create_next(&self) -> Result<Round> {
        let number = self.next_number().await?;

        let round = sqlx::query_as::<_, Round>(
            r#"
            INSERT INTO rounds (number, bye_player_id, created_at)
            VALUES (?, NULL, ?)
            RETURNING number, bye_player_id, created_at
            "#,
        )
        .bind(number)
        .bind(chrono::Utc::now().naive_utc())
        .fetch_one(self.pool)
        .await?;

        Ok(round)
    }

    /// Delete a round: its tables, their results and the round record.
    pub async fn delete(&self, number: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM game_results
            WHERE table_id IN (SELECT table_id FROM game_tables WHERE round_number = ?)
            "#,
        )
        .bind(number)
        .execute(&mut *tx)
        .await?;

        let tables = sqlx::query("DELETE FROM game_tables WHERE round_number = ?")
            .bind(number)
            .execute(&mut *tx)
            .await?;

        let rounds = sqlx::query("DELETE FROM rounds WHERE number = ?")
            .bind(number)
            .execute(&mut *tx)
            .await?;

        if tables.rows_affected() == 0 && rounds.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }

    /// Set or clear the resting player of a round, creating the round record
    /// if needed. A player seated at one of the round's tables cannot rest.
    pub async fn set_bye(&self, number: i64, bye_player_id: Option<Uuid>) -> Result<Round> {
        let mut tx = self.pool.begin().await?;

        if let Some(player_id) = bye_player_id {
            let exists = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM players WHERE player_id = ?",
            )
            .bind(player_id)
            .fetch_one(&mut *tx)
            .await?;
            if exists == 0 {
                return Err(StorageError::ConstraintViolation(format!(
                    "Player {} does not exist",
                    player_id
                )));
            }

            let seated = sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*)
                FROM game_results r
                JOIN game_tables t ON t.table_id = r.table_id
                WHERE t.round_number = ? AND r.player_id = ?
                "#,
            )
            .bind(number)
            .bind(player_id)
            .fetch_one(&mut *tx)
            .await?;
            if seated > 0 {
                return Err(StorageError::ConstraintViolation(format!(
                    "Player is seated at a table in round {} and cannot rest",
                    number
                )));
            }
        }

        let round = upsert_bye(&mut tx, number, bye_player_id).await?;
        tx.commit().await?;

        Ok(round)
    }

    /// Current table composition and bye of a round
    pub async fn assignment(&self, number: i64) -> Result<RoundAssignmentResponse> {
        let rows = sqlx::query_as::<_, (i64, Uuid)>(
            r#"
            SELECT t.table_no, r.player_id
            FROM game_results r
            JOIN game_tables t ON t.table_id = r.table_id
            WHERE t.round_number = ?
            ORDER BY t.table_no
            "#,
        )
        .bind(number)
        .fetch_all(self.pool)
        .await?;

        let round = self.find(number).await?;
        if round.is_none() && rows.is_empty() {
            return Err(StorageError::NotFound);
        }

        let seats_at = |table_no: i64| {
            let mut seats: Vec<Uuid> = rows
                .iter()
                .filter(|(no, _)| *no == table_no)
                .map(|(_, player_id)| *player_id)
                .collect();
            seats.sort();
            seats
        };

        Ok(RoundAssignmentResponse {
            round_number: number,
            table1: seats_at(1),
            table2: seats_at(2),
            bye_player_id: round.and_then(|r| r.bye_player_id),
        })
    }

    /// Store a validated composition. Seats are replaced with unplaced
    /// results and a save player who no longer sits at the table is cleared.
    pub async fn apply_assignment(&self, number: i64, partition: &RoundPartition) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        upsert_bye(&mut tx, number, Some(partition.bye)).await?;

        for (table_no, seats) in [(1, &partition.table1), (2, &partition.table2)] {
            let table_id = get_or_create_table(&mut tx, number, table_no).await?;

            sqlx::query("DELETE FROM game_results WHERE table_id = ?")
                .bind(table_id)
                .execute(&mut *tx)
                .await?;

            for player_id in seats {
                sqlx::query(
                    "INSERT INTO game_results (table_id, player_id, position) VALUES (?, ?, NULL)",
                )
                .bind(table_id)
                .bind(player_id)
                .execute(&mut *tx)
                .await?;
            }

            sqlx::query(
                r#"
                UPDATE game_tables
                SET save_player_id = NULL
                WHERE table_id = ?
                  AND save_player_id NOT IN (SELECT player_id FROM game_results WHERE table_id = ?)
                "#,
            )
            .bind(table_id)
            .bind(table_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Blank the outcome of every table in a round. The bye is kept.
    pub async fn clear(&self, number: i64) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let tables = sqlx::query(
            r#"
            UPDATE game_tables
            SET banned_card = NULL, sweep = 0, save_player_id = NULL
            WHERE round_number = ?
            "#,
        )
        .bind(number)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE game_results
            SET position = NULL
            WHERE table_id IN (SELECT table_id FROM game_tables WHERE round_number = ?)
            "#,
        )
        .bind(number)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(tables.rows_affected())
    }

    /// Drop every round, table and result. Players are kept.
    pub async fn reset_tournament(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for statement in [
            "DELETE FROM game_results",
            "DELETE FROM game_tables",
            "DELETE FROM rounds",
        ] {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

async fn upsert_bye(
    conn: &mut SqliteConnection,
    number: i64,
    bye_player_id: Option<Uuid>,
) -> Result<Round> {
    let round = sqlx::query_as::<_, Round>(
        r#"
        INSERT INTO rounds (number, bye_player_id, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT (number) DO UPDATE SET bye_player_id = excluded.bye_player_id
        RETURNING number, bye_player_id, created_at
        "#,
    )
    .bind(number)
    .bind(bye_player_id)
    .bind(chrono::Utc::now().naive_utc())
    .fetch_one(&mut *conn)
    .await?;

    Ok(round)
}

fn table_overview(
    table: GameTable,
    results: Vec<TableResult>,
    name_of: &impl Fn(Uuid) -> String,
) -> TableOverview {
    let mut participants: Vec<ParticipantView> = results
        .iter()
        .map(|r| ParticipantView {
            player_id: r.player_id,
            name: name_of(r.player_id),
            position: r.finish(),
        })
        .collect();
    // Podium first, then the rest by name.
    participants.sort_by(|a, b| {
        (a.position.is_none(), a.position, &a.name).cmp(&(b.position.is_none(), b.position, &b.name))
    });

    let placed = |position: Position| {
        participants
            .iter()
            .find(|p| p.position == Some(position))
            .map(|p| p.name.clone())
    };
    let played = table.sweep || placed(Position::First).is_some();

    TableOverview {
        table_id: table.table_id,
        table_no: table.table_no,
        winner: placed(Position::First),
        second: placed(Position::Second),
        third: placed(Position::Third),
        banned_card: table.banned_card,
        sweep: table.sweep,
        save: table.save_player_id.map(name_of),
        played,
        participants,
    }
}
