//! Room AHP CLI - Rank rooms from the terminal
//!
//! - `rank` scores and ranks the rooms of a JSON file
//! - `weights` prints the criteria weights and consistency ratios

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use room_ahp::adapters::{JsonRoomFile, PreferenceFile};
use room_ahp::application::{
    GetWeightsHandler, GetWeightsQuery, RankRoomsCommand, RankRoomsHandler,
};
use room_ahp::config::{AppConfig, ConfigError, LoggingConfig};
use room_ahp::domain::ahp::{
    format_ranking, AggregationMethod, FacilityFilter, PreferenceSet, UserRequirements,
};
use room_ahp::domain::foundation::DomainError;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable report
    #[default]
    Table,
    Json,
    Yaml,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Failed to render output: {0}")]
    Render(String),
}

/// Room AHP CLI application
#[derive(Parser)]
#[command(name = "room-ahp")]
#[command(about = "Rank rooms with the Analytic Hierarchy Process", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ROOM_AHP_CONFIG")]
    config: Option<PathBuf>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score and rank the rooms in a JSON file
    Rank {
        /// Room file: an array of rooms or {"rooms": [...], "requirements": {...}}
        #[arg(short, long)]
        rooms: PathBuf,

        /// weighted_sum, weighted_product or combined
        #[arg(short, long)]
        method: Option<String>,

        /// Pairwise comparison file
        #[arg(short, long)]
        preferences: Option<PathBuf>,

        /// Seats the booking needs
        #[arg(long)]
        seats: Option<u32>,

        /// The booking needs a projector
        #[arg(long)]
        need_projector: bool,

        /// Computers the booking needs
        #[arg(long)]
        need_computers: Option<u32>,

        /// Exclude rooms with fewer seats
        #[arg(long)]
        min_seats: Option<u32>,

        /// Keep only rooms whose projector presence matches
        #[arg(long)]
        projector: Option<bool>,

        /// Keep only rooms whose computer presence matches
        #[arg(long)]
        computers: Option<bool>,

        /// Show the criteria breakdown for every room
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show criteria weights and consistency ratios
    Weights {
        /// Pairwise comparison file
        #[arg(short, long)]
        preferences: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::load_from(cli.config.as_deref())?;
    init_tracing(&config.logging, cli.verbose);
    config.validate().map_err(ConfigError::from)?;

    match cli.command {
        Commands::Rank {
            rooms,
            method,
            preferences,
            seats,
            need_projector,
            need_computers,
            min_seats,
            projector,
            computers,
            detailed,
        } => {
            let method = method
                .map(|m| m.parse::<AggregationMethod>())
                .transpose()
                .map_err(DomainError::from)?;
            let requirements = (seats.is_some() || need_projector || need_computers.is_some())
                .then(|| UserRequirements {
                    required_seats: seats.unwrap_or(0),
                    need_projector,
                    need_computers: need_computers.unwrap_or(0),
                    time_window: None,
                });

            let command = RankRoomsCommand {
                method,
                preferences: load_preferences(preferences)?,
                requirements,
                filter: FacilityFilter {
                    min_seating: min_seats,
                    projector,
                    computers,
                },
            };
            let handler = RankRoomsHandler::new(Arc::new(JsonRoomFile::new(rooms)), config);
            let out = handler.handle(command)?;

            match cli.output {
                OutputFormat::Table => {
                    print!("{}", format_ranking(&out.result.rankings, detailed));
                    if out.excluded > 0 {
                        println!("{} room(s) excluded by facility filter", out.excluded);
                    }
                    if !out.result.is_consistent {
                        println!("Warning: preference judgments are inconsistent (CR >= 0.10)");
                        for (group, cr) in &out.result.consistency_ratios {
                            println!("  {}: {:.4}", group, cr);
                        }
                    }
                    Ok(())
                }
                format => render(&out.result, format),
            }
        }

        Commands::Weights { preferences } => {
            let view = GetWeightsHandler::new(config).handle(GetWeightsQuery {
                preferences: load_preferences(preferences)?,
            })?;
            match cli.output {
                OutputFormat::Table => {
                    print!("{}", view.summary);
                    Ok(())
                }
                format => render(&view, format),
            }
        }
    }
}

fn load_preferences(path: Option<PathBuf>) -> Result<PreferenceSet, DomainError> {
    path.map(|p| PreferenceFile::new(p).load())
        .transpose()
        .map(Option::unwrap_or_default)
}

fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<(), CliError> {
    let text = match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| CliError::Render(e.to_string()))?
        }
        _ => serde_json::to_string_pretty(value).map_err(|e| CliError::Render(e.to_string()))?,
    };
    println!("{}", text);
    Ok(())
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        logging.level.to_ascii_lowercase()
    };

    let json = logging.json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.as_str().into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| {
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr)
        }))
        .init();
}
