use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::BatchArgs;

#[derive(Parser)]
#[command(name = "vibecoder")]
#[command(about = "Vibecoder CLI - inspect the section catalog and run operation batches", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/vibecoder/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List section types, categories and presets
    Catalog {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate an operation batch against a section list
    Validate(BatchArgs),
    /// Print the section list a batch would produce
    Preview(BatchArgs),
    /// Commit a batch and write the resulting section list
    Apply {
        #[command(flatten)]
        batch: BatchArgs,
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Profile id for an empty section list
        #[arg(long)]
        profile: Option<String>,
    },
    /// Print the inverse batch of a committed batch
    Inverse(BatchArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vibecoder=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref());

    match cli.command {
        Commands::Catalog { json } => commands::catalog::run(json)?,
        Commands::Validate(batch) => commands::batch::validate(&batch, &config)?,
        Commands::Preview(batch) => commands::batch::preview(&batch, &config)?,
        Commands::Apply {
            batch,
            out,
            profile,
        } => commands::batch::apply(&batch, &config, out.as_deref(), profile.as_deref()).await?,
        Commands::Inverse(batch) => commands::batch::inverse(&batch, &config)?,
    }

    Ok(())
}
