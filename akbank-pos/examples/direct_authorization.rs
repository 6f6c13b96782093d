//! Direct sale against the pre-production gateway.
//!
//! # Running this example
//!
//! ```bash
//! export AKBANK_MERCHANT_SAFE_ID=...
//! export AKBANK_TERMINAL_SAFE_ID=...
//! export AKBANK_SECRET_KEY=...
//! RUST_LOG=akbank_pos=debug cargo run --example direct_authorization
//! ```

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::use_debug,
    reason = "examples are allowed to use println and simple formatting"
)]

use std::env;

use akbank_pos::{PosError, VirtualPos};
use tracing_subscriber::EnvFilter;

fn required(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    env::var(name).map_err(|_| format!("{name} environment variable not set").into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let pos = VirtualPos::new(
        required("AKBANK_MERCHANT_SAFE_ID")?,
        required("AKBANK_TERMINAL_SAFE_ID")?,
        required("AKBANK_SECRET_KEY")?,
        "TEST",
    )?;

    let mut request = pos.request();
    request
        .set_card_holder_name("Test Card Holder")
        .set_card_number("4355084355084358")
        .set_card_expiry("12", "30")
        .set_card_code("000")
        .set_order_id(format!("ORDER-{}", chrono::Utc::now().timestamp_millis()))
        .set_customer_ipv4("203.0.113.10")
        .set_customer_email("buyer@example.com")
        .set_amount("10.50", "TRY")?
        .set_installment("1")?;

    match pos.auth(request).await {
        Ok(response) if response.is_approved() => {
            println!("Approved");
            println!("  Auth code: {}", response.auth_code().unwrap_or("-"));
            println!("  Host message: {}", response.host_message);
        }
        Ok(response) => {
            println!("Declined: {} {}", response.response_code, response.response_message);
        }
        Err(PosError::Gateway { status, error }) => {
            eprintln!(
                "Gateway rejected the request (HTTP {status}): {} {}",
                error.code, error.message
            );
            for detail in &error.errors {
                eprintln!("  {detail:?}");
            }
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
