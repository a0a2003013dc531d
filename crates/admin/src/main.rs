use anyhow::Context;
use clap::{Parser, Subcommand};
use rankings::{
    Database, DomainRegistry,
    dto::ranking::{CreateDefinitionRequest, CreateLevelRequest},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use validator::Validate;

#[derive(Parser)]
#[command(name = "rank-admin")]
#[command(about = "Ranking engine administration", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List compiled-in domains. Does not touch the database.
    Domains,
    /// Apply pending database migrations.
    Migrate,
    CreateDefinition {
        #[arg(long)]
        organization: Uuid,

        #[arg(long)]
        activity: Uuid,

        #[arg(long)]
        domain: String,

        /// Copy the domain's default level ladder.
        #[arg(long)]
        seed_levels: bool,
    },
    AddLevel {
        #[arg(long)]
        definition: Uuid,

        #[arg(long)]
        name: String,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        order: i32,
    },
    /// Set a member's level, or clear it when `--level` is omitted.
    AssignLevel {
        #[arg(long)]
        definition: Uuid,

        #[arg(long)]
        user: Uuid,

        #[arg(long)]
        level: Option<Uuid>,
    },
    Leaderboard {
        #[arg(long)]
        definition: Uuid,

        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("rank_admin={},rankings={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Commands::Domains = cli.command {
        print_domains(&DomainRegistry::new());
        return Ok(());
    }

    let database_url = cli
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for this command")?;
    let db = Database::new(database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Domains => {}
        Commands::Migrate => {
            db.run_migrations()
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations applied");
        }
        Commands::CreateDefinition {
            organization,
            activity,
            domain,
            seed_levels,
        } => {
            let req = CreateDefinitionRequest {
                organization_id: organization,
                activity_id: activity,
                domain_id: domain,
                seed_default_levels: seed_levels,
            };
            req.validate()?;

            let definition = db.engine().create_definition(&req).await?;
            println!("{}", definition.definition_id);
        }
        Commands::AddLevel {
            definition,
            name,
            color,
            order,
        } => {
            let req = CreateLevelRequest {
                name,
                color,
                level_order: order,
            };
            req.validate()?;

            let level = db.engine().add_level(definition, &req).await?;
            println!("{}", level.level_id);
        }
        Commands::AssignLevel {
            definition,
            user,
            level,
        } => {
            let rank = db.engine().assign_level(definition, user, level).await?;
            match rank.current_level_id {
                Some(level_id) => println!("{} -> {}", rank.user_id, level_id),
                None => println!("{} -> (no level)", rank.user_id),
            }
        }
        Commands::Leaderboard { definition, limit } => {
            let leaderboard = db.engine().leaderboard(definition).await?;
            tracing::debug!(
                domain = %leaderboard.definition.domain_id,
                members = leaderboard.rows.len(),
                "Loaded leaderboard"
            );

            for row in leaderboard.rows.iter().take(limit) {
                let level = row.level.as_ref().map_or("-", |level| level.name.as_str());
                let stats: Vec<String> = row
                    .member
                    .stats
                    .iter()
                    .map(|(field, value)| format!("{}={}", field, value))
                    .collect();
                println!(
                    "{:>4}  {}  {:<12}  {}",
                    row.position,
                    row.member.user_id,
                    level,
                    stats.join(" ")
                );
            }
        }
    }

    Ok(())
}

fn print_domains(registry: &DomainRegistry) {
    for descriptor in registry.list() {
        let formats = descriptor
            .match_config
            .map(|config| {
                config
                    .formats
                    .iter()
                    .map(|format| format.id)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_else(|| "manual entries only".to_string());
        println!("{:<14} {:<16} {}", descriptor.id, descriptor.name, formats);
    }
}
