//! Delivery CLI library: adapters that run the core cart and checkout flow
//! from a terminal.
//!
//! - [`storage::FileStorage`] - JSON file persistence for the cart store
//! - [`api::ApiClient`] - HTTP client for the storefront, and the order gateway
//! - [`presenter`] - Terminal notifications and text rendering

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod presenter;
pub mod storage;

pub use api::ApiClient;
pub use config::CliConfig;
pub use error::ClientError;
pub use presenter::TerminalNotifier;
pub use storage::FileStorage;
