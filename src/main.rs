use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;
mod repl;

use song_storage::config::{AppConfig, CliConfig, FileConfig};
use song_storage::playback::{AudioEngine, NullEngine, PlaybackController, RodioEngine};
use song_storage::{CancelToken, CatalogManager, ContentStore, SqliteSongStore};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite song database file.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Root directory for stored audio files (created if absent).
    #[clap(long, value_parser = parse_path)]
    pub storage_dir: Option<PathBuf>,

    /// Optional TOML config file; its values override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Milliseconds between playback poll iterations.
    #[clap(long, default_value_t = 200)]
    pub playback_poll_interval_ms: u64,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        db_path: cli_args.db_path,
        storage_dir: cli_args.storage_dir,
        playback_poll_interval_ms: cli_args.playback_poll_interval_ms,
    };
    let app_config = AppConfig::resolve(&cli_config, file_config)?;

    let store = SqliteSongStore::new(&app_config.db_path)
        .with_context(|| format!("Failed to open song database {:?}", app_config.db_path))?;
    let content = ContentStore::new(&app_config.storage_dir)?;

    let engine: Box<dyn AudioEngine> = match RodioEngine::new() {
        Ok(engine) => Box::new(engine),
        Err(err) => {
            warn!("No audio output available ({:#}), playback disabled", err);
            Box::new(NullEngine::new())
        }
    };
    let playback = PlaybackController::new(engine, app_config.playback_poll_interval);

    let mut manager = CatalogManager::new(Box::new(store), content, playback);
    let song_count = manager.song_count()?;
    info!(
        "Catalog opened at {:?} with {} songs",
        app_config.db_path, song_count
    );

    // Ctrl-C outside the shell's raw mode stops an in-flight playback; the
    // playback loop observes the token on its next poll.
    let interrupt = CancelToken::new();
    let handler_token = interrupt.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .context("Failed to install interrupt handler")?;

    cli_style::print_welcome(
        &app_config.db_path.display().to_string(),
        &app_config.storage_dir.display().to_string(),
        song_count,
    );

    repl::run(&mut manager, &app_config, interrupt)
}
