use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use objview_core::AppConfig;

mod commands;

use commands::source::SourceArgs;

#[derive(Parser)]
#[command(name = "objview")]
#[command(author, version, about = "A terminal objdump viewer with smooth scrolling")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Listing to view (shorthand for `view`)
    #[command(flatten)]
    source: SourceArgs,

    /// Use this config file instead of ~/.config/objview/config.toml
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse a listing in the terminal
    View {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the openDocument message of every row as JSON lines
    Locations {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the effective configuration
    Config,
}

/// Send logs to `<data_dir>/objview.log`; the terminal belongs to the UI
/// and stdout to host messages
///
/// The returned guard flushes the background writer when dropped.
fn init_logging(config: &AppConfig) -> Result<WorkerGuard> {
    let log_path = config.log_path();
    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .and_then(|name| name.to_str())
        .context("log path has no file name")?;

    // The appender creates missing parent directories
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(log_dir)
        .with_context(|| format!("opening {}", log_path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    let config = Arc::new(config);

    let _log_guard = init_logging(&config)?;
    tracing::info!("objview {} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(Commands::View { source }) => commands::view::run(config, &source).await,
        None => commands::view::run(config, &cli.source).await,
        Some(Commands::Locations { source }) => commands::locations::run(&config, &source).await,
        Some(Commands::Config) => commands::config::run(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logs_written_to_data_dir() {
        let dir = std::env::temp_dir().join(format!("objview-log-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let mut config = AppConfig::default();
        config.general.data_dir = dir.join("nested");
        config.general.log_level = "info".to_string();

        let guard = init_logging(&config).unwrap();
        tracing::info!("hello from the log test");
        // Dropping the guard flushes the background writer
        drop(guard);

        let log = std::fs::read_to_string(config.log_path()).unwrap();
        assert!(log.contains("hello from the log test"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
