use std::path::PathBuf;

use clap::{Parser, Subcommand};
use summarize_sdk::{GatewayClient, GatewayReply, SummarizeRequest};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the summarize gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway liveness
    Health,
    /// Summarize a piece of text
    Text {
        text: String,
        /// Summary style hint passed through to the model service
        #[arg(short, long)]
        style: Option<String>,
    },
    /// Upload a file for summarization
    File { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = GatewayClient::new(&cli.url);

    let reply = match cli.command {
        Commands::Health => client.health().await?,
        Commands::Text { text, style } => {
            client
                .summarize_text(&SummarizeRequest { text, style })
                .await?
        }
        Commands::File { path } => client.summarize_file(&path).await?,
    };

    print_reply(&reply)?;
    Ok(())
}

fn print_reply(reply: &GatewayReply) -> Result<(), Box<dyn std::error::Error>> {
    if !reply.is_success() {
        eprintln!("Response: {}", reply.text().trim_end());
        return Err(format!("gateway returned status {}", reply.status).into());
    }

    match reply.json() {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", reply.text()),
    }
    Ok(())
}
