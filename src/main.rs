use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quizharvest::config::Config;

mod commands;

rust_i18n::i18n!("locales", fallback = "en");

#[derive(Parser)]
#[command(
    name = "quizharvest",
    version,
    about = "Harvests daily current-affairs quizzes and delivers them to Telegram",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "QUIZ_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the configuration file
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one incremental harvest (default)
    Run,

    /// List links on the listing page and whether they were processed
    Links,

    /// Extract questions from a single article and print them as JSON
    Extract {
        /// Article URL
        url: String,
    },

    /// Show progress store statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    setup_tracing(&config.logging.format, &config.logging.level, cli.verbose)?;
    quizharvest::i18n::init_from_env();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            tracing::info!(listing = %config.source.listing_url, "Starting run command");
            commands::run(&config).await?;
        }

        Commands::Links => {
            tracing::info!(listing = %config.source.listing_url, "Starting links command");
            commands::links(&config).await?;
        }

        Commands::Extract { url } => {
            tracing::info!(url = %url, "Starting extract command");
            commands::extract(&config, &url).await?;
        }

        Commands::Stats => {
            commands::stats(&config)?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("quizharvest=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("quizharvest={level},warn")))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
