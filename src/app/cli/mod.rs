//! CLI Adapter.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::app::api::{self, CandidateListing, ResolveOptions};
use crate::domain::{AppError, ConfigOverrides};

const DEFAULT_CONFIG_PATH: &str = "cfx-resolve.toml";

#[derive(Parser)]
#[command(name = "cfx-resolve")]
#[command(version)]
#[command(
    about = "Resolve the newest configuration artifact from a Subversion repository",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select, export and hand off the configuration artifact
    #[clap(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        config: ConfigArgs,
        /// Export only; do not start the execution tool
        #[arg(long)]
        no_handoff: bool,
    },
    /// Show the ranked candidate set without exporting anything
    #[clap(visible_alias = "ls")]
    List {
        #[command(flatten)]
        config: ConfigArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },
}

#[derive(Args)]
struct ConfigArgs {
    /// Resolution configuration file (.toml, or legacy .xml)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Override the selection policy (semver_then_time, newest_by_time)
    #[arg(long)]
    policy: Option<String>,
    /// Override the name pattern ('*' or '*.<ext>')
    #[arg(long)]
    pattern: Option<String>,
    /// Override the local cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

impl ConfigArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            selection_policy: self.policy.clone(),
            name_pattern: self.pattern.clone(),
            cache_directory: self.cache_dir.clone(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ListFormat {
    Table,
    Json,
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<(), AppError> = match cli.command {
        Commands::Resolve { config, no_handoff } => run_resolve(&config, !no_handoff),
        Commands::List { config, format } => run_list(&config, format),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_resolve(args: &ConfigArgs, handoff: bool) -> Result<(), AppError> {
    let options = ResolveOptions { overrides: args.overrides(), handoff };
    let resolved = api::resolve(&args.config, &options)?;
    println!("Selected: {} -> {}", resolved.source.name, resolved.local_path.display());
    Ok(())
}

fn run_list(args: &ConfigArgs, format: ListFormat) -> Result<(), AppError> {
    let listing = api::list_candidates(&args.config, &args.overrides())?;
    match format {
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(&listing).map_err(|err| {
                AppError::Io(std::io::Error::other(format!("Failed to serialize listing: {}", err)))
            })?;
            println!("{}", json);
        }
        ListFormat::Table => print_table(&listing),
    }
    Ok(())
}

fn print_table(listing: &CandidateListing) {
    println!(
        "{} ({}, pattern {})",
        listing.repository_location, listing.selection_policy, listing.name_pattern
    );
    if listing.candidates.is_empty() {
        println!("  (no candidates)");
        return;
    }
    let width = listing.candidates.iter().map(|c| c.name.len()).max().unwrap_or(0);
    for candidate in &listing.candidates {
        println!(
            "  {:>3}  {:<width$}  {:<12}  {}",
            candidate.rank,
            candidate.name,
            candidate.version.as_deref().unwrap_or("-"),
            if candidate.timestamp.is_empty() { "-" } else { candidate.timestamp.as_str() },
            width = width
        );
    }
}
