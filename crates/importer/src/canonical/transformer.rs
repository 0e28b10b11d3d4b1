use super::models::*;
use crate::name_mapper::canonical_name;
use crate::{ImporterError, Result};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use storage::models::Position;
use tracing::{debug, info};
use uuid::Uuid;

/// Counts of what an import wrote.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub players_created: usize,
    pub rounds: usize,
    pub tables: usize,
}

pub struct TournamentTransformer<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TournamentTransformer<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Write a validated tournament in one transaction. Tables already
    /// present at the same round and table number are replaced.
    pub async fn import_to_database(&self, tournament: &TournamentFile) -> Result<ImportSummary> {
        let mut tx = self.pool.begin().await?;
        let mut players = PlayerCache::default();
        let mut summary = ImportSummary::default();

        for name in &tournament.players {
            players.resolve(name, &mut tx).await?;
        }

        for round in &tournament.rounds {
            let bye = match &round.bye {
                Some(name) => Some(players.resolve(name, &mut tx).await?),
                None => None,
            };
            self.upsert_round(round.number, bye, &mut tx).await?;

            for table in &round.tables {
                self.import_table(round.number, table, &mut players, &mut tx)
                    .await?;
                summary.tables += 1;
            }
            summary.rounds += 1;
        }

        tx.commit().await?;

        summary.players_created = players.created;
        info!(
            "Imported {} round(s) and {} table(s), {} new player(s)",
            summary.rounds, summary.tables, summary.players_created
        );
        Ok(summary)
    }

    async fn upsert_round(
        &self,
        number: i64,
        bye: Option<Uuid>,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO rounds (number, bye_player_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT (number)
            DO UPDATE SET bye_player_id = COALESCE(excluded.bye_player_id, rounds.bye_player_id)
            "#,
        )
        .bind(number)
        .bind(bye)
        .bind(chrono::Utc::now().naive_utc())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn import_table(
        &self,
        round_number: i64,
        table: &TableData,
        players: &mut PlayerCache,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM game_results
            WHERE table_id IN (
                SELECT table_id FROM game_tables WHERE round_number = ? AND table_no = ?
            )
            "#,
        )
        .bind(round_number)
        .bind(table.table_no)
        .execute(&mut **tx)
        .await?;

        sqlx::query("DELETE FROM game_tables WHERE round_number = ? AND table_no = ?")
            .bind(round_number)
            .bind(table.table_no)
            .execute(&mut **tx)
            .await?;

        let save_player_id = match &table.save {
            Some(name) => Some(players.resolve(name, tx).await?),
            None => None,
        };
        let banned_card = table
            .banned_card
            .as_deref()
            .map(str::trim)
            .filter(|card| !card.is_empty());

        let table_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO game_tables
                (table_id, round_number, table_no, banned_card, sweep, save_player_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(table_id)
        .bind(round_number)
        .bind(table.table_no)
        .bind(banned_card)
        .bind(table.is_sweep())
        .bind(save_player_id)
        .bind(chrono::Utc::now().naive_utc())
        .execute(&mut **tx)
        .await?;

        let podium = [
            (&table.winner, Position::First),
            (&table.second, Position::Second),
            (&table.third, Position::Third),
        ];

        for name in &table.players {
            let player_id = players.resolve(name, tx).await?;
            let position = podium
                .iter()
                .find(|(placed, _)| {
                    placed
                        .as_deref()
                        .is_some_and(|placed| canonical_name(placed) == canonical_name(name))
                })
                .map(|(_, position)| position.as_db());

            sqlx::query(
                "INSERT INTO game_results (table_id, player_id, position) VALUES (?, ?, ?)",
            )
            .bind(table_id)
            .bind(player_id)
            .bind(position)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                ImporterError::TransformationError(format!(
                    "Failed to seat '{}' in round {}, table {}: {}",
                    name, round_number, table.table_no, e
                ))
            })?;
        }

        debug!(
            "Round {} table {}: {} player(s){}",
            round_number,
            table.table_no,
            table.players.len(),
            if table.is_sweep() { ", sweep" } else { "" }
        );

        Ok(())
    }
}

/// Player ids by roster name, creating missing players on first sight.
#[derive(Default)]
struct PlayerCache {
    ids: HashMap<String, Uuid>,
    created: usize,
}

impl PlayerCache {
    async fn resolve(&mut self, source_name: &str, tx: &mut Transaction<'_, Sqlite>) -> Result<Uuid> {
        let name = canonical_name(source_name);
        if let Some(id) = self.ids.get(name) {
            return Ok(*id);
        }

        // A player stored under the old spelling is reused as is.
        let existing = sqlx::query_scalar::<_, Uuid>(
            "SELECT player_id FROM players WHERE name = ? OR name = ? ORDER BY name = ? DESC LIMIT 1",
        )
        .bind(name)
        .bind(source_name.trim())
        .bind(name)
        .fetch_optional(&mut **tx)
        .await?;

        let id = match existing {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                sqlx::query(
                    "INSERT INTO players (player_id, name, active, created_at) VALUES (?, ?, 1, ?)",
                )
                .bind(id)
                .bind(name)
                .bind(chrono::Utc::now().naive_utc())
                .execute(&mut **tx)
                .await?;
                self.created += 1;
                debug!("Created player '{}'", name);
                id
            }
        };

        self.ids.insert(name.to_string(), id);
        Ok(id)
    }
}
