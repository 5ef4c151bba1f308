//! Submits the newsletter form once against a running relay.
//!
//! `cargo run --example subscribe -- you@example.com [http://localhost:8080/api/subscribe]`

use list_relay::form::{RelayClient, SubscriptionForm};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let email = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: subscribe <email> [relay url]"))?;
    let endpoint = args
        .next()
        .unwrap_or_else(|| "http://localhost:8080/api/subscribe".to_string());

    let client = RelayClient::new(endpoint)?;
    let mut form = SubscriptionForm::new();
    form.set_email(email);

    let status = form.submit(&client).await?;
    println!("{status:?}: {}", form.message());

    Ok(())
}
