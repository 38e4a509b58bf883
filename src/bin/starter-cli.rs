use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "starter-cli")]
#[command(about = "Command-line client for the embedded wallet starter", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the wallet session and the current notification
    Status,
    /// Connect the wallet
    Connect {
        /// google, apple, phantom or injected (defaults to the first offered)
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Disconnect the wallet
    Disconnect,
    /// Send the 0.001 SOL self-transfer demo
    Send,
    /// Sign a message with the connected wallet
    Sign {
        #[arg(default_value = "Hello Solana!")]
        message: String,
    },
    /// Check that the starter is up
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Status => client.get(format!("{}/api/session", base)).send().await?,
        Commands::Connect { provider } => {
            let body = match provider {
                Some(provider) => json!({ "provider": provider.to_lowercase() }),
                None => json!({}),
            };
            client
                .post(format!("{}/api/connect", base))
                .json(&body)
                .send()
                .await?
        }
        Commands::Disconnect => client.post(format!("{}/api/disconnect", base)).send().await?,
        Commands::Send => client.post(format!("{}/api/transaction", base)).send().await?,
        Commands::Sign { message } => {
            client
                .post(format!("{}/api/sign-message", base))
                .json(&json!({ "message": message }))
                .send()
                .await?
        }
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: starter returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
