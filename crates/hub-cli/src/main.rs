mod db;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hub-cli")]
#[command(about = "InfluencerHub operator command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Load and validate configuration, then print it with secrets redacted
    CheckConfig,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database answers
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Insert the demo influencers if the directory is empty
    Seed {
        /// Seed file to use instead of `HUB_SEED_PATH`
        #[arg(long)]
        path: Option<PathBuf>,
        /// Validate the seed file and print what would be inserted
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("hub-cli: run with --help to list commands");
        return Ok(());
    };

    let config = hub_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::CheckConfig => db::run_check_config(&config),
        Commands::Db { command } => match command {
            DbCommands::Ping => db::run_ping(&config).await,
            DbCommands::Migrate => db::run_migrate(&config).await,
            DbCommands::Seed { path, dry_run } => {
                let path = path.unwrap_or_else(|| config.seed_path.clone());
                db::run_seed(&config, &path, dry_run).await
            }
        },
    }
}
