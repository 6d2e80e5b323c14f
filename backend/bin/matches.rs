use anyhow::Result;
use clap::{Parser, Subcommand};
use roomble::{
    constants::TOKEN_TTL_DAYS,
    db::{get_db_pool, DatabaseConfig, PgMatchStore},
    models::{SwipeAction, SwipeOutcome},
    utils::{init_logging, issue_token},
    Config, MatchResolver, StorePolicy,
};
use std::sync::Arc;
use tracing::info;

/// Operator tooling for the match store.
#[derive(Parser)]
#[command(name = "matches", about = "Inspect and drive roommate matches")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a swipe as `actor`
    Swipe {
        #[arg(long)]
        actor: String,
        #[arg(long)]
        target: String,
        #[arg(long, default_value = "like")]
        action: String,
    },
    /// List every match involving a user
    List {
        #[arg(long)]
        user: String,
    },
    /// Print a bearer token for a user id
    Token {
        #[arg(long)]
        user: String,
        #[arg(long, default_value_t = TOKEN_TTL_DAYS)]
        ttl_days: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Swipe { actor, target, action } => {
            let action: SwipeAction = action.parse()?;
            let resolver = connect(&config).await?;
            match resolver.resolve_swipe(&actor, &target, action).await? {
                SwipeOutcome::Passed => info!("Passed, nothing stored"),
                SwipeOutcome::Created(m) => info!("Created one-sided match {}", m.id),
                SwipeOutcome::BecameMutual(m) => info!("Match {} is now mutual", m.id),
                SwipeOutcome::Unchanged(m) => info!("Match {} unchanged (mutual: {})", m.id, m.is_mutual),
            }
        }
        Command::List { user } => {
            let resolver = connect(&config).await?;
            let matches = resolver.matches_for(&user).await?;
            info!("{} matches for {}", matches.len(), user);
            println!("{}", serde_json::to_string_pretty(&matches)?);
        }
        Command::Token { user, ttl_days } => {
            let token = issue_token(&user, &config.jwt_secret, chrono::Duration::days(ttl_days))?;
            println!("{}", token);
        }
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<MatchResolver> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;
    Ok(MatchResolver::new(Arc::new(PgMatchStore::new(pool)), StorePolicy::from(config)))
}
