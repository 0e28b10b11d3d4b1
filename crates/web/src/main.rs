use anyhow::Context;
use storage::Database;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use web::config::Config;
use web::features;
use web::middleware::auth::{AdminCredentials, AuthState, SessionStore};

#[derive(OpenApi)]
#[openapi(
    paths(
        features::auth::handlers::login,
        features::auth::handlers::logout,
        features::standings::handlers::get_standings,
        features::players::handlers::list_players,
        features::players::handlers::list_players_admin,
        features::players::handlers::create_player,
        features::players::handlers::toggle_player,
        features::rounds::handlers::list_rounds,
        features::rounds::handlers::create_round,
        features::rounds::handlers::delete_round,
        features::rounds::handlers::set_bye,
        features::rounds::handlers::get_assignment,
        features::rounds::handlers::assign_round,
        features::rounds::handlers::clear_round,
        features::rounds::handlers::reset_tournament,
        features::tables::handlers::get_table,
        features::tables::handlers::record_result,
        features::tables::handlers::reset_table,
        features::tables::handlers::delete_table,
    ),
    components(
        schemas(
            features::auth::dto::LoginRequest,
            features::auth::dto::LoginResponse,
            storage::dto::standings::StandingsResponse,
            storage::dto::standings::StandingRow,
            storage::dto::standings::ParticipationRow,
            storage::dto::standings::Verdict,
            storage::dto::player::CreatePlayerRequest,
            storage::dto::player::PlayerResponse,
            storage::dto::player::PlayerAdminEntry,
            storage::dto::round::Slot,
            storage::dto::round::RoundAssignmentRequest,
            storage::dto::round::RoundAssignmentResponse,
            storage::dto::round::SetByeRequest,
            storage::dto::round::CreatedRoundResponse,
            storage::dto::round::RoundOverview,
            storage::dto::round::TableOverview,
            storage::dto::round::ParticipantView,
            storage::dto::round::PlayerRef,
            storage::dto::table::UpdateTableResultRequest,
            storage::dto::table::TableResponse,
            storage::dto::table::ResultView,
            storage::models::Position,
        )
    ),
    tags(
        (name = "auth", description = "Admin login and logout"),
        (name = "standings", description = "Public live standings"),
        (name = "players", description = "Player roster"),
        (name = "rounds", description = "Rounds, byes and table composition"),
        (name = "tables", description = "Table outcomes"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("Session token")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting tournament tracker");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!("Opening database at: {}", config.database_url);
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let auth = AuthState {
        sessions: SessionStore::new(),
        credentials: AdminCredentials::new(&config.admin_username, &config.admin_password),
    };

    let app = web::build_router(db, auth).merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
