mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, gate::GateSubcommand, roadmap::RoadmapSubcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "coddy",
    about = "Track roadmap.md phases and tasks, and check subscription feature access",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .coddy/ or .git/)
    #[arg(long, global = true, env = "CODDY_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .coddy/settings.yaml and a starter roadmap.md
    Init {
        /// Subscription tier to record (Free, Creator, Architect, Visionary)
        #[arg(long)]
        tier: Option<String>,
    },

    /// Inspect and update roadmap.md
    Roadmap {
        #[command(subcommand)]
        subcommand: RoadmapSubcommand,
    },

    /// Check which features the active tier unlocks
    Gate {
        #[command(subcommand)]
        subcommand: GateSubcommand,
    },

    /// Show, change, or validate project settings
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved project root");

    let result = match cli.command {
        Commands::Init { tier } => cmd::init::run(&root, tier.as_deref(), cli.json),
        Commands::Roadmap { subcommand } => cmd::roadmap::run(&root, subcommand, cli.json),
        Commands::Gate { subcommand } => cmd::gate::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
