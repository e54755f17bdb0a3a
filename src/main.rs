use cardpipe::application::resolver::MetadataResolver;
use cardpipe::config::PipelineConfig;
use cardpipe::domain::card::validate_prefix;
use cardpipe::domain::outcome::classify;
use cardpipe::infrastructure::static_table::StaticBinTable;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity (-v info, -vv debug). Logs go to stderr.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Pipeline configuration file (JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve issuer details for a six-digit prefix from the local table.
    Lookup {
        prefix: String,

        /// JSON issuer table to use instead of the built-in one.
        #[arg(long)]
        table: Option<PathBuf>,
    },
    /// Show how an HTTP status would be classified.
    Classify { status: u16 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.config {
        Some(path) => PipelineConfig::from_file(path).into_diagnostic()?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Command::Lookup { prefix, table } => {
            let prefix = validate_prefix(&prefix).into_diagnostic()?;
            let table = match table {
                Some(path) => {
                    StaticBinTable::from_json(File::open(path).into_diagnostic()?).into_diagnostic()?
                }
                None => StaticBinTable::builtin(),
            };
            let resolver = MetadataResolver::new(table, config.lookup_timeout());
            let metadata = resolver.resolve(prefix).await;
            println!("{}", serde_json::to_string_pretty(&metadata).into_diagnostic()?);
        }
        Command::Classify { status } => {
            println!("{}", serde_json::to_string(&classify(status)).into_diagnostic()?);
        }
    }

    Ok(())
}
