//! `delivery order` - show an order confirmation.

use delivery_cli::presenter::render_order;
use delivery_cli::{ApiClient, CliConfig, ClientError};
use delivery_core::OrderId;

/// Fetch and print an order.
#[allow(clippy::print_stdout)]
pub async fn show(config: &CliConfig, order_id: OrderId) -> Result<(), ClientError> {
    let order = ApiClient::new(config)?.order(order_id).await?;
    print!("{}", render_order(&order));
    Ok(())
}
