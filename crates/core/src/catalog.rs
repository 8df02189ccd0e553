//! Catalog records served by the storefront.

use serde::{Deserialize, Serialize};

use crate::types::{BannerId, CategoryId, Price, ProductId};

/// A product category (e.g. "Pizzas", "Drinks").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// URL-safe handle used to filter products.
    pub slug: String,
    /// Display color as a hex string, e.g. `#3B82F6`.
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Number of products in the category. Only set on category listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_count: Option<u64>,
}

/// A product as sold by the storefront.
///
/// The storefront is the source of truth for `price`; clients only ever send
/// product IDs and quantities when ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub category_id: CategoryId,
    /// The product's category, embedded by catalog reads. Order line
    /// snapshots leave it out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// A promotional banner on the storefront home page.
///
/// Only active banners are ever served, lowest `position` first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: BannerId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Image URL.
    pub image: String,
    /// Where the banner leads when followed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub position: i32,
}
