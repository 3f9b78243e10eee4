// src/bin/crypto_price_cli.rs
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;

use crypto_price_skill::client::{AlexaLocationClient, CryptoCompareClient};
use crypto_price_skill::config::SkillConfig;
use crypto_price_skill::handler::SkillHandler;
use crypto_price_skill::reference::ReferenceData;
use crypto_price_skill::resolver::resolve_with_cutoff;
use crypto_price_skill::types::{RequestBody, SkillRequest};

#[derive(Parser)]
#[command(name = "crypto-price-cli")]
#[command(about = "Crypto price voice skill CLI", long_about = None)]
struct Cli {
    /// Directory with cryptocurrencies.json, currencies.json and country_to_currency.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Table {
    Coins,
    Currencies,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which table entry a spoken name resolves to
    Resolve {
        query: String,
        #[arg(short, long, value_enum, default_value = "coins")]
        table: Table,
    },
    /// Speak the current price of a coin
    Price {
        coin: String,
        #[arg(short, long)]
        currency: Option<String>,
    },
    /// Run a skill request JSON file through the handler
    Handle { file: PathBuf },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = SkillConfig::from_env()?;
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir;
    }
    let reference = ReferenceData::for_config(&config)?;
    reference.validate(&config)?;

    match cli.command {
        Commands::Resolve { query, table } => {
            let (lookup, default_name) = match table {
                Table::Coins => (&reference.coins, config.default_crypto.clone()),
                Table::Currencies => (
                    &reference.currencies,
                    reference.default_currency(&config.default_country)?.to_string(),
                ),
            };
            let resolution =
                resolve_with_cutoff(&query, lookup, &default_name, config.match_cutoff)?;
            println!("{} ({}) via {}", resolution.name, resolution.symbol, resolution.kind);
        }
        Commands::Price { coin, currency } => {
            let handler = build_handler(config, reference)?;
            let request = SkillRequest::price_question(Some(&coin), currency.as_deref());
            let RequestBody::IntentRequest(intent_request) = &request.request else {
                unreachable!("price_question builds an intent request");
            };
            let report = handler
                .collect_crypto_price(&request, &intent_request.intent)
                .await?;
            println!("{}", report.message());
        }
        Commands::Handle { file } => {
            let handler = build_handler(config, reference)?;
            let raw = std::fs::read_to_string(&file)?;
            let request: SkillRequest = serde_json::from_str(&raw)?;
            let response = handler.handle(&request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn build_handler(config: SkillConfig, reference: ReferenceData) -> anyhow::Result<SkillHandler> {
    let http_client = Client::builder().timeout(config.timeout).build()?;
    let quotes = Arc::new(CryptoCompareClient::from_config(&config, http_client.clone()));
    let locations = Arc::new(AlexaLocationClient::new(http_client));
    Ok(SkillHandler::new(config, reference, quotes, locations)?)
}
