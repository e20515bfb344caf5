use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use mbridge_gateway::risk::{self, RiskPercent};
use mbridge_gateway::verdict::{self, Emphasis, Verdict};

#[derive(Parser)]
#[command(name = "mbridge-cli")]
#[command(about = "Preview CLI for the MBridge gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway health
    Health,
    /// Get a verdict on a trade rationale or news headline
    Analyze {
        input: String,
        /// Print the canned demo verdict without calling the gateway
        #[arg(long)]
        demo: bool,
        /// Emphasize the verdict with <strong> tags for web previews
        #[arg(long)]
        html: bool,
    },
    /// Subscribe an email address to the newsletter
    Subscribe { email: String },
    /// Compute a lot size locally
    Risk {
        #[arg(long)]
        balance: f64,
        /// Snapped to the nearest 0.5 step within 0.5..=5
        #[arg(long, default_value_t = 1.0)]
        risk_percent: f64,
        /// Stop distance in pips
        #[arg(long)]
        stop_loss: f64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{base}/health")).send().await?;
            print_response(res).await?;
        }
        Commands::Analyze { input, demo, html } => {
            let emphasis = if html { Emphasis::Html } else { Emphasis::Markdown };
            if demo {
                println!("{}", verdict::emphasize(&verdict::demo_verdict(), emphasis));
                return Ok(());
            }

            let res = client
                .post(format!("{base}/api/analyze"))
                .json(&json!({ "input": input }))
                .send()
                .await;

            let body = match res {
                Ok(res) if res.status().is_success() => res.json::<Value>().await.ok(),
                Ok(res) => {
                    eprintln!("Error: gateway returned status {}", res.status());
                    None
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    None
                }
            };

            match body.as_ref().and_then(verdict::extract_text) {
                Some(text) => {
                    println!("{}", verdict::emphasize(text, emphasis));
                    match Verdict::find(text) {
                        Some(v) => eprintln!("Verdict: {v}"),
                        None => eprintln!("Warning: response carried no verdict keyword"),
                    }
                }
                None => println!("{}", verdict::OFFLINE_NOTICE),
            }
        }
        Commands::Subscribe { email } => {
            let res = client
                .post(format!("{base}/api/subscribe"))
                .json(&json!({ "email": email }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Risk {
            balance,
            risk_percent,
            stop_loss,
        } => {
            let percent = RiskPercent::nearest(risk_percent);
            let size = risk::calculate(balance, percent.value(), stop_loss);
            println!("Risk: {percent}");
            println!("Risk amount: ${:.2}", size.risk_amount);
            println!("Lot size: {:.2}", size.lots);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: gateway returned status {status}");
        eprintln!("Response: {text}");
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{text}"),
    }
    Ok(())
}
