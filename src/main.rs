//! Summarize gateway.
//!
//! Accepts summarization requests (JSON text or a multipart file upload)
//! and forwards them to a downstream language-model service, relaying
//! its response back unchanged.
//!
//! ```text
//!     Client ──POST /summarize──▶ ┌──────────────────────────┐
//!                                 │ classify Content-Type    │
//!                                 │  ├─ multipart: `file`    │──POST /v1/summarize-file──▶
//!                                 │  └─ JSON object          │──POST /v1/summarize───────▶  LLM
//!     Client ◀──status/headers/── │ relay verbatim           │◀──────────────────────────  service
//!               body              └──────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use summarize_gateway::config::load_config;
use summarize_gateway::observability::init_logging;
use summarize_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "summarize-gateway")]
#[command(about = "HTTP gateway forwarding summarize requests to an LLM service", long_about = None)]
struct Args {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability)?;

    tracing::info!("summarize-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        downstream = %config.downstream.base_url,
        text_path = %config.downstream.text_path,
        file_path = %config.downstream.file_path,
        max_body_bytes = config.limits.max_body_bytes,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
