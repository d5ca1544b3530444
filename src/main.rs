//! Console entry point for the Skybook booking agent
//!
//! One dialogue session per process: read a line, process the turn, print
//! the outcome, stop on booking or exit.

use skybook::{Agent, AnthropicExtractor, IntentExtractor, InventoryStore, OpenAIExtractor, Session};
use std::path::Path;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let inventory_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "flights.jsonl".to_string());

    let inventory = if Path::new(&inventory_path).exists() {
        InventoryStore::from_jsonl_path(&inventory_path)?
    } else {
        warn!(path = %inventory_path, "No inventory file found, generating a synthetic one");
        let today = chrono::Utc::now().date_naive();
        InventoryStore::new(skybook::inventory::generate(
            1000,
            today,
            &mut rand::thread_rng(),
        ))
    };
    info!(flights = inventory.len(), "Inventory ready");

    let extractor: Box<dyn IntentExtractor> = if std::env::var("OPENAI_API_KEY").is_ok() {
        Box::new(OpenAIExtractor::from_env()?)
    } else if std::env::var("ANTHROPIC_API_KEY").is_ok() {
        Box::new(AnthropicExtractor::from_env()?)
    } else {
        return Err("Set OPENAI_API_KEY or ANTHROPIC_API_KEY to run the agent".into());
    };
    info!(backend = extractor.name(), "Extractor ready");

    let agent = Agent::builder()
        .name("Flight Booking Agent")
        .extractor(extractor)
        .inventory(inventory)
        .build()?;

    println!("{}", agent.name());
    println!("Type your request. Type 'exit' to quit.\n");

    let mut session = Session::new();
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        stdout.write_all(b"You: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break; // stdin closed
        };
        if line.trim().is_empty() {
            continue;
        }

        match agent.process_turn(&mut session, &line).await {
            Ok(outcome) => {
                println!("\n{}\n", outcome.message());
                if outcome.is_terminal() {
                    break;
                }
            }
            Err(err) => {
                warn!(error = %err, "Turn failed");
                println!("\nSorry, I could not process that request. Please try again.\n");
            }
        }
    }

    Ok(())
}
