//! Main entry point for the App Store CLI.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use dotenv::dotenv;
use shared::config::{Config, LogFormat};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;

use commands::{admin::AdminCommand, catalog::AppsCommand, session::SessionCommand};

/// App Store CLI
#[derive(Parser)]
#[command(name = "appstore")]
#[command(about = "Command-line client for the App Store backend", long_about = None)]
struct Cli {
    /// Path to the configuration file (optional)
    #[arg(
        long,
        short,
        global = true,
        help = "Path to the configuration file (e.g., appstore.yaml or appstore.json)."
    )]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the configuration file and environment
    #[arg(
        long,
        global = true,
        help = "Backend base URL (e.g., http://localhost:8000). Overrides APPSTORE_API_BASE."
    )]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the App Store CLI
#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is reachable
    Health,

    /// Browse and search the public catalog
    Apps {
        #[command(subcommand)]
        command: AppsCommand,
    },

    /// Sign in, register, and inspect the stored session
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Manage catalog entries (requires a signed-in session)
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)
        #[arg(long, short, value_enum)]
        shell: Shell,
    },

    /// Generate a configuration file
    Config {
        /// Format of the configuration file to generate (yaml or json). Defaults to yaml.
        #[arg(
            long,
            short,
            default_value = "yaml",
            help = "Format of the configuration file to generate (yaml or json)."
        )]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Completion { shell } => {
            commands::completion::generate_completion(*shell);
            return Ok(());
        }
        Commands::Config { format } => return commands::config::generate_config(format),
        _ => {}
    }

    let config = load(cli.config, cli.api_base.as_deref())?;
    let level = initialize_tracing(&config);
    tracing::debug!(%level, "logging initialized");

    match cli.command {
        Commands::Health => commands::catalog::health(&config).await,
        Commands::Apps { command } => commands::catalog::run(&config, command).await,
        Commands::Session { command } => commands::session::run(&config, command).await,
        Commands::Admin { command } => commands::admin::run(&config, command).await,
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}

/// Loads and validates configuration for commands that talk to the backend.
fn load(path: Option<PathBuf>, api_base: Option<&str>) -> Result<Config> {
    let config = Config::load_config(path, api_base).context("failed to load configuration")?;
    if let Err(problems) = config.validate() {
        bail!("invalid configuration:\n  - {}", problems.join("\n  - "));
    }
    Ok(config)
}

/// Initializes the tracing subscriber on stderr using the provided configuration.
fn initialize_tracing(config: &Config) -> String {
    let env_filter = build_env_filter(config);

    let fmt_builder = fmt::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    let installed = if matches!(config.logging.format, LogFormat::Json) {
        fmt_builder.json().with_ansi(false).try_init()
    } else {
        fmt_builder.with_ansi(true).try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }

    config.logging.level.clone()
}

fn build_env_filter(config: &Config) -> EnvFilter {
    let default_level = config
        .logging
        .level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::WARN);

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy()
    })
}
