mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "specflow",
    about = "Check PRDs for ambiguity and score features against the Definition of Ready",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .specflow/ or .git/)
    #[arg(long, global = true, env = "SPECFLOW_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log progress at info level
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a PRD file and show its structure
    Parse {
        /// PRD file (.md, .json, .yaml)
        file: PathBuf,

        /// Write the parsed PRD as JSON to this path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Detect ambiguities and score every feature of a PRD
    Analyze {
        /// PRD file (.md, .json, .yaml)
        file: PathBuf,

        /// Skip ambiguity detection
        #[arg(long)]
        no_ambiguities: bool,

        /// Skip readiness scoring
        #[arg(long)]
        no_quality: bool,

        /// Pattern matching only, even when AI is enabled in config
        #[arg(long)]
        no_ai: bool,
    },

    /// Show the per-check readiness breakdown for features of a PRD
    Score {
        /// PRD file (.md, .json, .yaml)
        file: PathBuf,

        /// Only score the feature with this name
        #[arg(long)]
        feature: Option<String>,
    },

    /// Run vague-term detection on a piece of text
    Detect {
        /// Text to check
        text: String,
    },

    /// Show, create, or validate the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Parse { file, output } => cmd::parse::run(&file, output.as_deref(), cli.json),
        Commands::Analyze {
            file,
            no_ambiguities,
            no_quality,
            no_ai,
        } => cmd::analyze::run(
            &root,
            &file,
            cmd::analyze::Options {
                ambiguities: !no_ambiguities,
                quality: !no_quality,
                ai: !no_ai,
            },
            cli.json,
        ),
        Commands::Score { file, feature } => cmd::score::run(&file, feature.as_deref(), cli.json),
        Commands::Detect { text } => cmd::detect::run(&text, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
