use clap::{Parser, Subcommand};
use importer::{
    canonical::{
        models::TournamentFile, transformer::TournamentTransformer,
        validator::TournamentValidator,
    },
    seed,
};
use std::path::PathBuf;
use storage::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tourney-import")]
#[command(about = "Tournament roster and round importer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the default roster and, into an empty tournament, the historical rounds
    Seed,
    /// Validate and import a tournament JSON file
    Import {
        file: PathBuf,

        #[arg(long)]
        validate_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tourney_import={},importer={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Seed => {
            handle_seed(&cli.database_url).await?;
        }
        Commands::Import {
            file,
            validate_only,
        } => {
            handle_import(file, validate_only, &cli.database_url).await?;
        }
    }

    Ok(())
}

async fn connect(database_url: &str) -> Result<Database, Box<dyn std::error::Error>> {
    tracing::info!("Connecting to database...");
    let db = Database::new(database_url).await?;
    db.run_migrations().await?;
    Ok(db)
}

async fn handle_seed(database_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = connect(database_url).await?;

    let summary = seed::seed(db.pool()).await?;
    match summary.history {
        Some(history) => tracing::info!(
            "✓ Seeded {} player(s) and {} historical round(s)",
            summary.players_added,
            history.rounds
        ),
        None => tracing::info!("✓ Seeded {} player(s)", summary.players_added),
    }

    Ok(())
}

async fn handle_import(
    file: PathBuf,
    validate_only: bool,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Loading tournament JSON from: {}", file.display());

    let json_content = tokio::fs::read_to_string(&file).await?;
    let tournament: TournamentFile = serde_json::from_str(&json_content)?;

    tracing::info!(
        "Loaded {} round(s) (v{})",
        tournament.rounds.len(),
        tournament.format_version
    );

    tracing::info!("Validating tournament file...");
    let validation_report = TournamentValidator::validate(&tournament)?;
    validation_report.log_warnings();
    tracing::info!("✓ Validation successful!");

    if validate_only {
        return Ok(());
    }

    let db = connect(database_url).await?;

    let transformer = TournamentTransformer::new(db.pool());
    let summary = transformer.import_to_database(&tournament).await?;

    tracing::info!(
        "✓ Import completed: {} round(s), {} table(s)",
        summary.rounds,
        summary.tables
    );

    Ok(())
}
