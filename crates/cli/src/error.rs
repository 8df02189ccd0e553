//! CLI error type.

use thiserror::Error;

use delivery_core::checkout::CheckoutError;

use crate::config::ConfigError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The storefront could not be reached or answered garbage.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The storefront answered with a non-success status.
    #[error("storefront returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// Checkout did not produce an order.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// A command argument was rejected.
    #[error("{0}")]
    InvalidArgument(String),

    /// Database error while migrating.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl ClientError {
    /// Whether the storefront reported the requested resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}
