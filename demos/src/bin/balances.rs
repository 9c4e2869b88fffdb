//! Demo: Account Balances
//!
//! Lists non-zero balances and open orders. Requires `QTRADE_HMAC_KEYPAIR`
//! in the environment.
//!
//! Run: QTRADE_HMAC_KEYPAIR=<keyID>:<secret> cargo run --bin balances

use colored::*;
use qtrade_rest::{ClientConfig, QtradeRestClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ClientConfig::from_env()?;
    let client = QtradeRestClient::with_config(config)?;
    if !client.has_credentials() {
        eprintln!("{} QTRADE_HMAC_KEYPAIR is not set", "✗".red());
        std::process::exit(1);
    }

    let user = client.account()?.get_user_info().await?;
    println!(
        "{} Signed in as {} {} ({})",
        "✓".green(),
        user.first_name,
        user.last_name,
        user.email
    );
    println!();

    println!("  {}", "BALANCES".cyan().bold());
    println!("  {}", "─".repeat(40));
    for balance in client.get_balances().await? {
        if balance.amount().is_some_and(|a| a.is_zero()) {
            continue;
        }
        println!("  {:<8} {:>30}", balance.currency.yellow(), balance.balance);
    }
    println!();

    let orders = client.get_open_orders().await?;
    println!("  {} ({})", "OPEN ORDERS".cyan().bold(), orders.len());
    println!("  {}", "─".repeat(40));
    for order in orders {
        let market = order
            .market()
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|_| order.market_id.to_string());
        println!(
            "  #{:<10} {:<10} {:<11} {} @ {}",
            order.id,
            market,
            order.order_type.to_string(),
            order.market_amount_remaining,
            order.price
        );
    }

    Ok(())
}
