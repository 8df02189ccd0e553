//! Delivery Core - Shared types, cart store and checkout flow.
//!
//! This crate is used by every component of the delivery storefront:
//! - `storefront` - HTTP service for the catalog and order creation
//! - `cli` - Client session front end (cart, checkout, confirmation)
//!
//! # Architecture
//!
//! The core crate performs no network or filesystem I/O. The cart store talks
//! to a [`cart::CartStorage`] port and the checkout flow talks to an
//! [`checkout::OrderGateway`] port; the binaries provide the adapters.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails and phone numbers
//! - [`catalog`] - Product and category records
//! - [`order`] - Order creation payloads and created-order representation
//! - [`cart`] - Client-side cart store with persistence and snapshots
//! - [`checkout`] - Checkout form validation and submission state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod order;
pub mod types;

pub use types::*;
