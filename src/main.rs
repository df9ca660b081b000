use std::env;
use std::process::exit;

use log::{error, info};

mod engine;
mod error;
mod formatter;
mod service;
mod store;
mod types;
mod validator;

use crate::store::http::HttpStore;

const DEFAULT_API_URL: &str = "http://localhost:8181/api";

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let trip_name = match env::args().nth(1) {
        Some(name) => name,
        None => {
            eprintln!("usage: tripledger_rs <trip-name>");
            exit(2);
        }
    };

    let api_url = env::var("TRIPLEDGER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    info!("Using trip API at {api_url}");
    let store = HttpStore::new(&api_url);

    match run(&store, &trip_name).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            exit(1);
        }
    }
}

async fn run(store: &HttpStore, trip_name: &str) -> anyhow::Result<String> {
    let trip_id = store
        .find_trip_id_by_name(trip_name)
        .await?
        .ok_or_else(|| anyhow::anyhow!("no trip named `{trip_name}`"))?;

    let view = service::handle_settlement(store, &trip_id).await?;

    Ok(format!(
        "Balances (1 MYR = {:.2} INR):\n{}\nSettlements:\n{}",
        view.current_rate,
        formatter::format_ledger(&view.ledger),
        formatter::format_settlements(&view.settlements)
    ))
}
