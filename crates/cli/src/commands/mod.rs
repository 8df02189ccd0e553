//! CLI subcommand implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod migrate;
pub mod order;

use delivery_cli::ClientError;
use delivery_core::{OrderId, ProductId};

/// Parse a product ID argument.
pub fn parse_product_id(raw: &str) -> Result<ProductId, ClientError> {
    raw.parse()
        .map_err(|_| ClientError::InvalidArgument(format!("not a product id: {raw}")))
}

/// Parse an order ID argument.
pub fn parse_order_id(raw: &str) -> Result<OrderId, ClientError> {
    raw.parse()
        .map_err(|_| ClientError::InvalidArgument(format!("not an order id: {raw}")))
}
