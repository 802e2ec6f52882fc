// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

mod commands;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use commands::{parse_assignment, resolve_type, with_entity_type};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use survey_engine::logging::{init_logging, LogConfig};
use survey_engine::settings::{load_settings, EngineSettings};
use survey_engine::{ConfigProvider, JsonFileStore, SurveyEngine};
use tracing::{debug, warn};

const DEFAULT_CONFIG_PATH: &str = "data/survey-config.json";

/// Survey Engine - inspect field policies and manage survey records
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Field policy configuration document (JSON)
    #[arg(long, env = "SURVEY_ENGINE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of the JSON file store (default: ~/.survey-engine/data)
    #[arg(long, env = "SURVEY_ENGINE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Per-operation store timeout in milliseconds
    #[arg(long, env = "SURVEY_ENGINE_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Enable JSON log format
    #[arg(long, env = "SURVEY_ENGINE_LOG_JSON", default_value = "false")]
    log_json: bool,

    /// Custom log directory (default: ~/.survey-engine/logs)
    #[arg(long, env = "SURVEY_ENGINE_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the identity, display-name field and field policies of a type
    Describe { type_name: String },
    /// List every stored item of a type
    List { type_name: String },
    /// Show the visible fields of one item
    Show { type_name: String, id: String },
    /// Create an item from its placeholder, applying Field=Value pairs
    New {
        type_name: String,
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
    /// Delete one item
    Delete { type_name: String, id: String },
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".survey-engine")
        .join("data")
}

async fn build_engine(args: &Args, settings: &EngineSettings) -> Result<SurveyEngine> {
    let config_path = args
        .config
        .clone()
        .or_else(|| settings.config_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| settings.data_dir.clone())
        .unwrap_or_else(default_data_dir);

    let mut options = settings.engine_options();
    if let Some(ms) = args.timeout_ms {
        options.store_timeout = Duration::from_millis(ms);
    }

    let provider = ConfigProvider::from_path(&config_path);
    let store = JsonFileStore::open(data_dir).await?;
    let engine = SurveyEngine::from_provider(&provider, Arc::new(store), options)
        .await?
        .with_survey_models()?;
    Ok(engine)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    // Settings are read before logging is up, so failures are reported after.
    let (settings, settings_error) = match load_settings() {
        Ok(settings) => (settings, None),
        Err(e) => (EngineSettings::default(), Some(e)),
    };

    let mut log_config = LogConfig::from_settings(&settings.log);
    if let Some(dir) = args.log_dir.clone() {
        log_config.log_dir = dir;
    }
    log_config.json_format |= args.log_json;
    init_logging(&log_config)?;
    debug!(log_file = %log_config.log_file().display(), "Logging initialized");
    if let Some(e) = settings_error {
        warn!("Failed to load settings, using defaults: {e}");
    }

    let engine = build_engine(&args, &settings).await?;
    let mut out = std::io::stdout().lock();

    match &args.command {
        Command::Describe { type_name } => {
            let type_name = resolve_type(&engine, type_name)?;
            with_entity_type!(type_name, T => commands::describe::<T, _>(&engine, &mut out))?;
        }
        Command::List { type_name } => {
            let type_name = resolve_type(&engine, type_name)?;
            with_entity_type!(type_name, T => commands::list::<T, _>(&engine, &mut out).await)?;
        }
        Command::Show { type_name, id } => {
            let type_name = resolve_type(&engine, type_name)?;
            with_entity_type!(type_name, T => commands::show::<T, _>(&engine, id, &mut out).await)?;
        }
        Command::New { type_name, set } => {
            let type_name = resolve_type(&engine, type_name)?;
            with_entity_type!(type_name, T => commands::create::<T, _>(&engine, set, &mut out).await)?;
        }
        Command::Delete { type_name, id } => {
            let type_name = resolve_type(&engine, type_name)?;
            with_entity_type!(type_name, T => commands::delete::<T, _>(&engine, id, &mut out).await)?;
        }
    }
    out.flush()?;
    Ok(())
}
