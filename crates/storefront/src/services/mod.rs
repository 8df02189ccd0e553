//! Business logic services for storefront.
//!
//! # Services
//!
//! - `catalog` - Cached catalog reads (categories and products)

pub mod catalog;

pub use catalog::CatalogService;
