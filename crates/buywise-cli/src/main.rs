mod host;
mod output;
mod settings;

use std::path::PathBuf;

use buywise_popup::{JsonFileStore, MemoryChoice, Orchestrator, PopupConfig};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::host::{LocalRelay, SnapshotHost, TerminalPrompt};
use crate::settings::{PrefsCommands, ServerUrlCommands};

#[derive(Debug, Parser)]
#[command(name = "buywise")]
#[command(about = "BuyWise purchase advisor command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze the product in a saved page snapshot
    Analyze {
        /// Page snapshot JSON (tab, bridge state and scraped product)
        #[arg(long)]
        page: PathBuf,
        /// Answer the stored-analysis prompt without asking
        #[arg(long, value_enum)]
        choice: Option<ChoiceArg>,
        /// Print the rendered view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the backend answers at the configured server URL
    Health,
    /// Show, replace or reset stored preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },
    /// Show or change the backend base URL
    ServerUrl {
        #[command(subcommand)]
        command: ServerUrlCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ChoiceArg {
    /// Reuse the stored analysis
    Reuse,
    /// Run a fresh analysis
    New,
}

impl From<ChoiceArg> for MemoryChoice {
    fn from(choice: ChoiceArg) -> Self {
        match choice {
            ChoiceArg::Reuse => Self::UseExisting,
            ChoiceArg::New => Self::NewAnalysis,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let app_config = buywise_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(app_config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = JsonFileStore::new(app_config.storage_path.clone());
    let mut config = PopupConfig::load(&store, &app_config).await?;

    match cli.command {
        Some(Commands::Analyze { page, choice, json }) => {
            run_analyze(&config, &store, &page, choice, json).await?;
        }
        Some(Commands::Health) => run_health(&config).await?,
        Some(Commands::Prefs { command }) => {
            settings::run_prefs(&mut config, &store, command).await?;
        }
        Some(Commands::ServerUrl { command }) => {
            settings::run_server_url(&mut config, &store, command).await?;
        }
        None => println!("buywise: use --help to list commands"),
    }

    Ok(())
}

/// One popup attempt against a page snapshot.
///
/// Failures print the same single status line the popup would show and
/// exit non-zero.
async fn run_analyze(
    config: &PopupConfig,
    store: &JsonFileStore,
    page: &std::path::Path,
    choice: Option<ChoiceArg>,
    json: bool,
) -> anyhow::Result<()> {
    let host = SnapshotHost::load(page).await?;
    let relay = LocalRelay::new(store);
    let prompt = TerminalPrompt::new(choice.map(MemoryChoice::from));
    let orchestrator = Orchestrator::new(config, &host, &host, &relay, &prompt)?;

    match orchestrator.analyze().await {
        Ok(outcome) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.view)?);
            } else {
                output::print_outcome(&outcome);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "analysis failed");
            anyhow::bail!(e.user_message())
        }
    }
}

async fn run_health(config: &PopupConfig) -> anyhow::Result<()> {
    let client = config.client()?;
    match client.health_check().await {
        Ok(()) => {
            println!("backend at {} is reachable", config.location);
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            anyhow::bail!("backend at {} is not reachable: {e}", config.location)
        }
    }
}
