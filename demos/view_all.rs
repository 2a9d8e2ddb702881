//! Lists every product through the bridge and prints the rendered markup.
//!
//! Point `INVENTORY_API` at a running backend, or let it default to
//! http://localhost:8090/api/products.

use inventory_console::bridge::{Bridge, Trigger};
use inventory_console::config::{BridgeConfig, DEFAULT_API_BASE_URL};
use inventory_console::dom::{MemoryDom, RESULT_OUTPUT};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base = std::env::var("INVENTORY_API").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
    let bridge = Bridge::new(MemoryDom::new(), &BridgeConfig::with_base_url(base))?;

    let outcome = bridge.dispatch(Trigger::ViewAll).await;
    println!("outcome: {outcome:?}");
    println!("{}", bridge.dom().html(RESULT_OUTPUT).unwrap_or_default());
    Ok(())
}
