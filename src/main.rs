mod cli;
mod server;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mnemos", version, about = "Associative memory and knowledge graph MCP server for AI agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (stdio transport unless --http or server.transport = "http")
    Serve {
        /// Serve Streamable HTTP on server.host:server.port instead of stdio
        #[arg(long)]
        http: bool,
        /// JSON snapshot of memory entries to import before serving
        #[arg(long)]
        seed: Option<PathBuf>,
    },
    /// Print statistics and a consolidation summary for a memory snapshot
    Stats {
        /// JSON snapshot in the export_memories format
        file: PathBuf,
        /// Only consolidate memories in this context
        #[arg(long)]
        context: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let mut config = mnemos::config::MnemosConfig::load()?;

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { http, seed } => {
            if let Some(seed) = seed {
                config.memory.seed_path = Some(seed.to_string_lossy().into_owned());
            }
            if http || config.server.transport == "http" {
                server::serve_http(config).await?;
            } else {
                server::serve_stdio(config).await?;
            }
        }
        Command::Stats { file, context } => {
            cli::stats::stats(&config, &file, context.as_deref())?;
        }
    }

    Ok(())
}
