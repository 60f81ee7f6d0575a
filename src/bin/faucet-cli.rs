use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "faucet-cli")]
#[command(about = "Command-line client for the testnet faucet", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    /// Admin API key (needed for `status` and `networks`)
    #[arg(short, long, env = "FAUCET_ADMIN_KEY", default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the balance of an address
    Balance { address: String, chain: String },
    /// Request tokens for an address
    Request { address: String, chain: String },
    /// Check faucet status
    Status,
    /// List testnets with their daily tally and active cooldowns
    Networks,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if !cli.key.is_empty() {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
        );
    }

    let request = match &cli.command {
        Commands::Balance { address, chain } => client
            .get(format!("{}/balance", cli.url))
            .query(&[("address", address), ("chain", chain)]),
        Commands::Request { address, chain } => client
            .get(format!("{}/request", cli.url))
            .query(&[("address", address), ("chain", chain)]),
        Commands::Status => client
            .get(format!("{}/admin/status", cli.url))
            .headers(headers),
        Commands::Networks => client
            .get(format!("{}/admin/networks", cli.url))
            .headers(headers),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }

    if !status.is_success() {
        eprintln!("Error: faucet returned status {}", status);
        std::process::exit(1);
    }
    Ok(())
}
