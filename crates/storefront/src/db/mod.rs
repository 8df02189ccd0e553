//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `delivery_storefront`
//!
//! The storefront is the source of truth for the catalog and for prices.
//!
//! ## Tables
//!
//! - `category` - Product categories (unique `slug`)
//! - `product` - Products with their current price
//! - `customer_order` - Contact details of a placed order
//! - `order_item` - `(product, quantity)` lines of an order, in submission order
//! - `banner` - Home page banners; only `active` rows are served, by `position`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p delivery-cli -- migrate
//! ```

pub mod catalog;
pub mod orders;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use delivery_core::ProductId;

pub use catalog::CatalogRepository;
pub use orders::OrderRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// An order referenced a product that does not exist.
    #[error("unknown product {0}")]
    UnknownProduct(ProductId),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Convert a stored `INTEGER` quantity into a line quantity.
fn quantity_from_db(value: i32) -> Result<u32, RepositoryError> {
    u32::try_from(value)
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| RepositoryError::DataCorruption(format!("invalid quantity: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_from_db() {
        assert_eq!(quantity_from_db(3).ok(), Some(3));
        assert!(matches!(
            quantity_from_db(0),
            Err(RepositoryError::DataCorruption(_))
        ));
        assert!(matches!(
            quantity_from_db(-2),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
