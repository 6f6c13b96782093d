//! Builds the 3-D Secure redirect page and checks a gateway callback.
//!
//! No network access is needed: the page is printed and would normally be
//! served to the card holder's browser, which posts it to the gateway.
//!
//! ```bash
//! cargo run --example three_d_redirect
//! ```

#![allow(clippy::print_stdout, reason = "examples are allowed to use println")]

use akbank_pos::{VirtualPos, form::FormEncoding};
use base64::{Engine, engine::general_purpose::STANDARD};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let pos = VirtualPos::new("MERCHANT-SAFE-ID", "TERMINAL-SAFE-ID", "demo-secret-key", "TEST3D")?;

    let mut request = pos.request();
    request
        .set_lang("TR")
        .set_ok_url("https://shop.example/payment/ok")
        .set_fail_url("https://shop.example/payment/fail")
        .set_order_id("ORDER-3D-1")
        .set_customer_email("buyer@example.com")
        .set_card_number("4355084355084358")
        .set_card_expiry("12", "30")
        .set_card_code("000")
        .set_amount("249.9", "TRY")?;

    let form = pos.auth_3d_form(request);
    println!("Form posts to {}", form.endpoint);
    println!("As JSON for a frontend:\n{}\n", serde_json::to_string_pretty(&form)?);

    let page = form.encode();
    let html = String::from_utf8(STANDARD.decode(&page)?)?;
    println!("Decoded page:\n{html}\n");

    // the gateway posts signed parameters back to okUrl / failUrl
    let callback =
        FormEncoding::from_pairs([("orderId", "ORDER-3D-1"), ("responseCode", "VPS-0000")]);
    let fields = ["orderId", "responseCode"];
    let signature = pos.signer().sign_fields(&callback, &fields);
    let valid = pos.signer().verify_fields(&callback, &fields, &signature);
    println!("Callback signature valid: {valid}");

    Ok(())
}
