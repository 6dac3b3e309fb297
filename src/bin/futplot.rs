//! futplot: insight CLI.
//!
//! Runs the get-or-generate path once and prints the JSON envelope.
//! Logs go to stderr (`RUST_LOG`, default `info`).

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use futplot::stats::all_metrics;
use futplot::{
    Config, Envelope, FutplotError, InMemoryPlayers, InsightService, InsightServiceBuilder,
    PlayerDirectory, Prewarmer,
};

/// Cached LLM insights for football statistics
#[derive(Parser)]
#[command(name = "futplot")]
#[command(version)]
#[command(about = "Cached LLM insights for football statistics")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Load players from a JSON file instead of the database.
    #[arg(long, global = true)]
    players: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Positive/negative labels for a pair of plot axes
    Axis {
        /// X-axis metric id or label
        x: String,
        /// Y-axis metric id or label
        y: String,
    },

    /// Scouting report for a player
    Player {
        /// Player name (partial names are resolved)
        name: String,
    },

    /// Flush player reports and regenerate the top players
    Prewarm {
        /// Number of players to regenerate (overrides config)
        #[arg(long)]
        top: Option<usize>,
    },

    /// List the metric catalog
    Metrics,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(code) => code,
        Err(e) => print_envelope(Envelope::<()>::from_result(Err(e))),
    }
}

async fn run(args: Args) -> futplot::Result<ExitCode> {
    if let Command::Metrics = args.command {
        return Ok(print_metrics());
    }

    let config = Config::load(args.config.as_deref())?;
    let players = load_players(args.players.as_deref(), &config).await?;
    let service = InsightServiceBuilder::from_config(&config)
        .await?
        .players(players)
        .build()?;

    let code = match args.command {
        Command::Axis { x, y } => print_envelope(Envelope::from_result(
            service.axis_insight(&x, &y).await,
        )),
        Command::Player { name } => print_envelope(Envelope::from_result(
            service.player_insight(&name).await,
        )),
        Command::Prewarm { top } => prewarm(service, &config, top).await,
        Command::Metrics => print_metrics(),
    };
    Ok(code)
}

async fn prewarm(service: InsightService, config: &Config, top: Option<usize>) -> ExitCode {
    let mut prewarmer = Prewarmer::new(service, &config.prewarm);
    if let Some(n) = top {
        prewarmer = prewarmer.top_n(n);
    }
    print_envelope(Envelope::from_result(prewarmer.run().await))
}

async fn load_players(
    file: Option<&std::path::Path>,
    config: &Config,
) -> futplot::Result<Arc<dyn PlayerDirectory>> {
    if let Some(path) = file {
        return Ok(Arc::new(InMemoryPlayers::from_json_file(path)?));
    }

    #[cfg(feature = "postgres")]
    if let Some(url) = config.database_url() {
        return Ok(Arc::new(futplot::PgPlayers::connect(&url).await?));
    }

    #[cfg(not(feature = "postgres"))]
    let _ = config;

    Err(FutplotError::Configuration(
        "no player source: pass --players <file.json> or set DATABASE_URL".to_string(),
    ))
}

fn print_metrics() -> ExitCode {
    let metrics: Vec<_> = all_metrics()
        .map(|m| {
            json!({
                "id": m.id,
                "label": m.label,
                "type": m.metric_type,
                "components": m.components,
            })
        })
        .collect();
    print_envelope((200, Envelope::ok(metrics)))
}

fn print_envelope<T: Serialize>((status, envelope): (u16, Envelope<T>)) -> ExitCode {
    match serde_json::to_string_pretty(&envelope) {
        Ok(body) => println!("{body}"),
        Err(e) => eprintln!("failed to serialize response: {e}"),
    }
    if status == 200 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
