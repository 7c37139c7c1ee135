//! Binary entry point for the cmddocs CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Build docs for the tree in commands.json into ./docs/command
//! cmddocs --tree commands.json --metadata metadata.json
//!
//! # Use a config file and a different output directory
//! cmddocs --config docs/cmddocs.toml --output-dir build/command
//! ```

use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::error;

use cmddocs::metadata::Metadata;
use cmddocs::{load_metadata, Config, DocsError, Driver, JsonTreeSource};

/// Generate reStructuredText command reference pages.
#[derive(Parser, Debug)]
#[command(name = "cmddocs", version, about = "Generate command reference pages")]
struct Cli {
    /// Config file (default: cmddocs.toml in the current directory, if present).
    ///
    /// Relative `tree` and `metadata` entries resolve against its directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON command tree manifest (overrides `docs.tree`).
    #[arg(long)]
    tree: Option<PathBuf>,

    /// JSON API metadata (overrides `docs.metadata`).
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// Output directory; wiped on every run (overrides `docs.output_dir`).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Root command name (overrides `docs.root_name`).
    #[arg(long)]
    root_name: Option<String>,

    /// Log level for tracing output.
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn execute(cli: Cli) -> Result<(), DocsError> {
    let cwd = env::current_dir()?;
    let config = resolve_config(&cli, Config::discover(cli.config.as_deref(), &cwd)?);

    let tree = config.docs.tree.clone().ok_or_else(|| {
        DocsError::Config("no command tree given: pass --tree or set docs.tree".to_string())
    })?;
    let metadata = match &config.docs.metadata {
        Some(path) => load_metadata(path)?,
        None => Metadata::new(),
    };

    let driver = Driver::new(
        config.docs.output_dir.clone(),
        config.transform_config(metadata),
    );
    driver.run(&JsonTreeSource::new(tree))?;
    Ok(())
}

/// Apply command-line overrides on top of the loaded config.
fn resolve_config(cli: &Cli, mut config: Config) -> Config {
    if let Some(tree) = &cli.tree {
        config.docs.tree = Some(tree.clone());
    }
    if let Some(metadata) = &cli.metadata {
        config.docs.metadata = Some(metadata.clone());
    }
    if let Some(output_dir) = &cli.output_dir {
        config.docs.output_dir = output_dir.clone();
    }
    if let Some(root_name) = &cli.root_name {
        config.docs.root_name = root_name.clone();
    }
    config
}
