//! Client-side shopping cart.
//!
//! The cart lives entirely on the client until checkout. [`CartStore`] owns the
//! line items, persists them through a [`CartStorage`] port on every mutation
//! and publishes a [`CartSnapshot`] to subscribers after each change.
//!
//! # Example
//!
//! ```rust
//! use delivery_core::cart::{CartProduct, CartStore, MemoryStorage};
//! use delivery_core::{Price, ProductId};
//!
//! let mut cart = CartStore::open(MemoryStorage::default());
//! let pizza = CartProduct {
//!     product_id: ProductId::generate(),
//!     name: "Margherita".to_string(),
//!     unit_price: Price::from_cents(1000).unwrap(),
//!     image: None,
//! };
//!
//! cart.add_item(pizza.clone(), 2);
//! cart.add_item(pizza, 1);
//!
//! assert_eq!(cart.items().len(), 1);
//! assert_eq!(cart.item_count(), 3);
//! assert_eq!(cart.subtotal().to_string(), "30.00");
//! ```

mod item;
mod storage;
mod store;

pub use item::{CartLineItem, CartProduct};
pub use storage::{CartStorage, MemoryStorage, StorageError};
pub use store::{CART_STORAGE_KEY, CartSnapshot, CartStore};
