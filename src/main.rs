use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tourganizer_engine::api::state::AppState;
use tourganizer_engine::config::AppConfig;
use tourganizer_engine::draw::DrawConfig;
use tourganizer_engine::engine::TournamentEngine;
use tourganizer_engine::storage::{StorageConfig, TournamentStore};

#[derive(Parser)]
#[command(name = "tourganizer-engine")]
#[command(about = "Pairing and standings engine for debate tournaments")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path
    #[arg(long, default_value = "./data")]
    data_dir: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// List stored tournaments
    List,

    /// Print current standings for a tournament
    Standings {
        /// Tournament ID
        tournament_id: String,
    },

    /// Print the round history for a tournament
    Rounds {
        /// Tournament ID
        tournament_id: String,
    },
}

fn load_config(path: &str) -> Result<AppConfig> {
    let path = std::path::PathBuf::from(path);
    if path.exists() {
        Ok(AppConfig::from_file(&path)?)
    } else {
        Ok(AppConfig::default())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting tourganizer-engine v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli.config)?;
    let store = TournamentStore::new(StorageConfig::new(std::path::PathBuf::from(
        &cli.data_dir,
    )));
    let engine = TournamentEngine::new(store, DrawConfig::from(&config.draw));

    match cli.command {
        Commands::Serve { host, port } => {
            let state = AppState {
                engine: Arc::new(engine),
            };
            let app = tourganizer_engine::api::build_router(state, &config.server.cors_origin);
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::List => {
            let tournaments = engine.list_tournaments()?;
            if tournaments.is_empty() {
                println!("No tournaments stored.");
            }
            for t in tournaments {
                println!(
                    "{}  {}  {}  {} ({} prelim + {} out rounds)",
                    t.id, t.date, t.name, t.status, t.prelim_rounds, t.out_rounds
                );
            }
        }
        Commands::Standings { tournament_id } => {
            let tournament = engine.get_tournament(&tournament_id)?;
            let standings = engine.standings(&tournament_id)?;
            println!("Standings for {} ({})", tournament.name, tournament.status);
            println!("{:>4}  {:<30} {:>4} {:>6} {:>7}", "Rank", "Team", "Wins", "Losses", "Points");
            for s in standings {
                println!(
                    "{:>4}  {:<30} {:>4} {:>6} {:>7}",
                    s.rank, s.team_name, s.wins, s.losses, s.points
                );
            }
        }
        Commands::Rounds { tournament_id } => {
            let rounds = engine.rounds(&tournament_id)?;
            if rounds.is_empty() {
                println!("No rounds drawn yet.");
            }
            for round in rounds {
                println!("Round {} [{:?}] {:?}", round.number, round.stage, round.status);
                for p in &round.pairings {
                    let outcome = match &p.result {
                        Some(r) => format!("winner {}", r.winner),
                        None => "pending".to_string(),
                    };
                    println!(
                        "  {}: {} (aff) vs {} (neg) - {}",
                        p.room, p.affirmative, p.negative, outcome
                    );
                }
            }
        }
    }

    Ok(())
}
