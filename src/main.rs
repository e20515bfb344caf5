//! MBridge gateway.
//!
//! ```text
//!     Browser ──POST /api/analyze──▶ ┌──────────────┐ ──generateContent──▶ Generative Language API
//!                                    │   gateway    │
//!     Browser ──POST /api/subscribe─▶│ (validate,   │ ──POST {email,ts}──▶ Subscriber sheet webhook
//!                                    │  inject key) │
//!                                    └──────────────┘
//!     AI assistant ──stdio JSON-RPC──▶ mcp server (same proxies + risk + market data)
//! ```
//!
//! `mbridge-gateway serve` (default) runs the HTTP proxy.
//! `mbridge-gateway mcp` runs the MCP tool server on stdin/stdout.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::io::BufReader;

use mbridge_gateway::config::load_config;
use mbridge_gateway::lifecycle::{signals, startup, Shutdown};
use mbridge_gateway::mcp::McpServer;
use mbridge_gateway::observability::{logging, metrics};
use mbridge_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "mbridge-gateway", version)]
#[command(about = "Server-side proxy for the MBridge trading coach", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "MBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Run the HTTP proxy
    Serve,
    /// Run the MCP tool server over stdio
    Mcp,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "mbridge-gateway starting");

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_shutdown().await;
        signal_shutdown.trigger();
    });

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse() {
                    Ok(addr) => metrics::init_metrics(addr),
                    Err(_) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        "Failed to parse metrics address"
                    ),
                }
            }

            let listener = startup::bind(&config.listener).await?;
            let server = HttpServer::new(config)?;
            server.run(listener, shutdown.subscribe()).await?;
        }
        Command::Mcp => {
            let client = startup::http_client(&config.timeouts)?;
            let server = McpServer::new(&config, client);
            server
                .run(
                    BufReader::new(tokio::io::stdin()),
                    tokio::io::stdout(),
                    shutdown.subscribe(),
                )
                .await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
