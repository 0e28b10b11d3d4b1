use sqlx::SqlitePool;

use crate::error::Result;
use crate::repository::player::PlayerRepository;
use crate::repository::round::RoundRepository;
use crate::repository::table::TableRepository;
use crate::services::standings::{
    PlayerEntry, ResultEntry, RoundEntry, TableEntry, TournamentSnapshot,
};

/// Reads the store into the shape the standings engine consumes
pub struct StandingsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StandingsRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn load_snapshot(&self) -> Result<TournamentSnapshot> {
        let players = PlayerRepository::new(self.pool)
            .list_active()
            .await?
            .into_iter()
            .map(|p| PlayerEntry {
                player_id: p.player_id,
                name: p.name,
            })
            .collect();

        let rounds = RoundRepository::new(self.pool)
            .list()
            .await?
            .into_iter()
            .map(|r| RoundEntry {
                number: r.number,
                bye_player_id: r.bye_player_id,
            })
            .collect();

        let tables = TableRepository::new(self.pool)
            .list_with_results()
            .await?
            .into_iter()
            .map(|(table, results)| TableEntry {
                table_id: table.table_id,
                round_number: table.round_number,
                table_no: table.table_no,
                sweep: table.sweep,
                save_player_id: table.save_player_id,
                results: results
                    .iter()
                    .map(|r| ResultEntry {
                        player_id: r.player_id,
                        position: r.finish(),
                    })
                    .collect(),
            })
            .collect();

        Ok(TournamentSnapshot {
            players,
            rounds,
            tables,
        })
    }
}
