use anyhow::Context;
use rankings::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod routes;

use config::Config;
use middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::domains::handlers::list_domains,
        features::domains::handlers::get_domain,
        features::domains::handlers::get_match_formats,
        features::domains::handlers::get_format_for_team_size,
        features::rankings::handlers::create_definition,
        features::rankings::handlers::list_definitions,
        features::rankings::handlers::get_definition,
        features::rankings::handlers::list_levels,
        features::rankings::handlers::add_level,
        features::rankings::handlers::get_member_rank,
        features::rankings::handlers::assign_level,
        features::rankings::handlers::get_member_history,
        features::rankings::handlers::get_leaderboard,
        features::matches::handlers::list_matches,
        features::matches::handlers::get_match,
        features::matches::handlers::record_match,
        features::matches::handlers::correct_match,
        features::entries::handlers::apply_entry,
        features::entries::handlers::correct_entry,
    ),
    components(
        schemas(
            rankings::dto::domain::DomainResponse,
            rankings::dto::domain::StatFieldInfo,
            rankings::dto::domain::TieBreakInfo,
            rankings::dto::domain::MatchFormatInfo,
            rankings::dto::domain::MatchFormatsResponse,
            rankings::dto::domain::LevelTemplateInfo,
            rankings::dto::domain::AttributeFieldInfo,
            rankings::dto::ranking::CreateDefinitionRequest,
            rankings::dto::ranking::CreateLevelRequest,
            rankings::dto::ranking::AssignLevelRequest,
            rankings::dto::ranking::RankingDefinitionResponse,
            rankings::dto::ranking::RankingLevelResponse,
            rankings::dto::ranking::MemberRankResponse,
            rankings::dto::ranking::LeaderboardEntryResponse,
            rankings::dto::matches::RecordMatchRequest,
            rankings::dto::matches::CorrectMatchRequest,
            rankings::dto::matches::MatchResponse,
            rankings::dto::matches::RecordedMatchResponse,
            rankings::dto::matches::MatchCorrectionResponse,
            rankings::dto::entry::StatEntryRequest,
            rankings::dto::entry::CorrectEntryRequest,
            rankings::dto::entry::StatEntryResponse,
            rankings::dto::entry::EntryCorrectionResponse,
            rankings::dto::common::PaginationMeta,
            rankings::domains::Direction,
            rankings::domains::TeamSize,
            rankings::domains::Winner,
            rankings::models::EntryKind,
        )
    ),
    tags(
        (name = "domains", description = "Supported activity domains"),
        (name = "rankings", description = "Ranking definitions, levels, members and leaderboards"),
        (name = "matches", description = "Match recording and correction"),
        (name = "entries", description = "Manual stat entries"),
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
                        .bearer_format("API Key")
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

    tracing::info!("Starting ranking engine API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::with_max_connections(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty, every write endpoint will answer 401");
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    let app = routes::router(db.engine(), api_keys)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app).await?;

    Ok(())
}
