//! `reelsift`: review duplicate media versions and decide what to keep.
#![allow(missing_docs)]

mod commands;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use reelsift_config::ConfigLoader;
use reelsift_core::api::HttpBackend;
use reelsift_core::batch::DedupeSession;
use reelsift_core::policy::{Direction, RuleId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "reelsift",
    version,
    about = "Review duplicate media versions and resolve them on the backend"
)]
struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Env file to load instead of `./.env`
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,
    /// Backend base URL, overrides the configuration
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect or edit the version-selection policy
    Policy {
        #[command(subcommand)]
        action: PolicyCommand,
    },
    /// List libraries available for policy scoping
    Libraries,
    /// Ask the backend to start a full library scan
    Scan,
    /// Show duplicate tasks grouped by movie or series
    List,
    /// Keep the best version of every task in the given groups and delete the rest
    Execute {
        /// Group keys as shown by `list` (e.g. movie-Dune, series-Foo)
        #[arg(required = true)]
        keys: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Hide the given groups' tasks from future listings
    Ignore {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Drop the given groups' tasks from the current listing
    Remove {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Execute every listed task
    ClearAll {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum PolicyCommand {
    /// Print the current policy
    Show {
        /// Print the persisted JSON shape instead
        #[arg(long)]
        json: bool,
    },
    /// Set the rule chain order (highest priority first)
    Reorder {
        #[arg(required = true)]
        rules: Vec<RuleId>,
    },
    /// Enable or disable a rule (date_added included)
    #[command(group(ArgGroup::new("state").required(true).args(["on", "off"])))]
    Toggle {
        rule: RuleId,
        #[arg(long)]
        on: bool,
        #[arg(long)]
        off: bool,
    },
    /// Set the comparison direction of a directional rule
    Direction { rule: RuleId, direction: Direction },
    /// Reorder the effect tags (all current tags, preferred first)
    EffectOrder {
        #[arg(required = true)]
        labels: Vec<String>,
    },
    /// Pick one best version per resolution instead of one overall
    KeepPerResolution {
        #[arg(action = clap::ArgAction::Set, value_parser = clap::builder::BoolishValueParser::new())]
        enabled: bool,
    },
    /// Seconds the executor waits between deletions
    DeleteDelay {
        #[arg(allow_negative_numbers = true)]
        seconds: i64,
    },
    /// Restrict the policy to libraries; no ids means every library
    Scope { library_ids: Vec<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = &cli.env_file {
        loader = loader.with_env_file(path);
    }
    let mut load = loader.load().context("failed to load configuration")?;
    if let Some(url) = cli.base_url {
        load.config.backend.base_url = url;
        load.config = load.config.validate().context("invalid --base-url")?;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| load.config.logging.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    tracing::debug!(source = %load.source, env_file = load.env_file_loaded, "configuration resolved");

    let backend = HttpBackend::new(load.config.backend.http_settings())
        .context("failed to create backend client")?;
    let mut session = DedupeSession::new(backend);

    match cli.command {
        Command::Policy { action } => commands::policy::run(&session, action).await,
        Command::Libraries => commands::tasks::libraries(&session).await,
        Command::Scan => commands::tasks::scan(&session).await,
        Command::List => commands::tasks::list(&mut session).await,
        Command::Execute { keys, yes } => {
            commands::tasks::execute(&mut session, &keys, yes).await
        }
        Command::Ignore { keys } => commands::tasks::ignore(&mut session, &keys).await,
        Command::Remove { keys } => commands::tasks::remove(&mut session, &keys).await,
        Command::ClearAll { yes } => commands::tasks::clear_all(&mut session, yes).await,
    }
}
