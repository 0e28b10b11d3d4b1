use crate::canonical::models::TournamentFile;
use crate::canonical::transformer::{ImportSummary, TournamentTransformer};
use crate::canonical::validator::TournamentValidator;
use crate::Result;
use sqlx::SqlitePool;
use storage::repository::player::PlayerRepository;

/// The club's standing roster.
pub const DEFAULT_ROSTER: [&str; 9] = [
    "Borux", "Negro", "Gueta", "Teran", "Mauro", "Gordor", "Xephi", "Omar", "Richard",
];

const INITIAL_TOURNAMENT: &str = include_str!("../data/initial_tournament.json");

/// Rounds 1 to 9 as played before the tracker existed.
pub fn initial_tournament() -> Result<TournamentFile> {
    Ok(serde_json::from_str(INITIAL_TOURNAMENT)?)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub players_added: u64,
    /// `None` when tables already existed and history was left alone.
    pub history: Option<ImportSummary>,
}

/// Register the default roster, then load the historical rounds into an
/// empty tournament. Safe to run repeatedly.
pub async fn seed(pool: &SqlitePool) -> Result<SeedSummary> {
    let players_added = PlayerRepository::new(pool)
        .ensure_roster(&DEFAULT_ROSTER)
        .await?;
    tracing::info!("Roster ready, {} player(s) added", players_added);

    let tables = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM game_tables")
        .fetch_one(pool)
        .await?;
    if tables > 0 {
        tracing::info!("{} table(s) already recorded, skipping historical rounds", tables);
        return Ok(SeedSummary {
            players_added,
            history: None,
        });
    }

    let tournament = initial_tournament()?;
    let report = TournamentValidator::validate(&tournament)?;
    report.log_warnings();

    let history = TournamentTransformer::new(pool)
        .import_to_database(&tournament)
        .await?;

    Ok(SeedSummary {
        players_added,
        history: Some(history),
    })
}
