//! Demo: Market Snapshot
//!
//! Prints the ticker and top of book for a handful of markets using only
//! public endpoints.
//!
//! Run: cargo run --bin market_snapshot [MARKET ...]

use colored::*;
use qtrade_rest::{ClientConfig, QtradeRestClient};
use qtrade_types::Market;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let markets: Vec<Market> = {
        let args: Vec<String> = std::env::args().skip(1).collect();
        if args.is_empty() {
            vec![Market::BtcUsdt, Market::LtcBtc, Market::EthBtc]
        } else {
            args.iter()
                .map(|name| name.parse())
                .collect::<Result<_, _>>()?
        }
    };

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  MARKET SNAPSHOT".cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    // Public data needs no keypair; from_env still picks up the endpoint
    let client = QtradeRestClient::with_config(ClientConfig::from_env()?)?;

    for market in markets {
        let ticker = match client.get_ticker(market).await {
            Ok(ticker) => ticker,
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), market, e);
                continue;
            }
        };
        let book = client.get_orderbook(market).await?;

        println!("  {}", market.as_str().yellow().bold());
        println!(
            "    {} {}  {} {}",
            "LAST:".dimmed(),
            fmt_opt(ticker.last),
            "24H VOL:".dimmed(),
            ticker.day_volume_market
        );
        match (book.best_bid(), book.best_ask()) {
            (Some((bid, bid_size)), Some((ask, ask_size))) => {
                println!(
                    "    {} {} x {}  {} {} x {}  {} {}",
                    "BID:".green(),
                    bid,
                    bid_size,
                    "ASK:".red(),
                    ask,
                    ask_size,
                    "SPREAD:".dimmed(),
                    ask - bid
                );
            }
            _ => println!("    {}", "book is empty".dimmed()),
        }
        println!();
    }

    Ok(())
}

fn fmt_opt(value: Option<rust_decimal::Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
