//! Order creation payloads and the created-order representation.
//!
//! The checkout flow sends a [`CreateOrderRequest`] carrying contact details
//! and `(product_id, quantity)` pairs only. Prices are resolved by the
//! storefront, which answers with an [`Order`] holding product snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartLineItem;
use crate::catalog::Product;
use crate::checkout::CustomerDetails;
use crate::types::{Email, EmailError, OrderId, OrderLineId, Phone, PhoneError, Price, ProductId};

/// Largest quantity of one product accepted in a single order.
pub const MAX_LINE_QUANTITY: u32 = 9999;

/// One requested line: which product and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub items: Vec<OrderItemRequest>,
}

/// Reasons a [`CreateOrderRequest`] is refused at the service boundary.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OrderRequestError {
    /// A required contact field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// The email address is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    /// The phone number is malformed.
    #[error("invalid phone: {0}")]
    InvalidPhone(#[from] PhoneError),
    /// The order has no line items.
    #[error("order must contain at least one item")]
    NoItems,
    /// A line quantity is zero or above [`MAX_LINE_QUANTITY`].
    #[error("quantity for product {product_id} must be between 1 and 9999")]
    InvalidQuantity {
        /// Offending product.
        product_id: ProductId,
    },
}

/// A create-order request that passed boundary validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub name: String,
    pub email: Email,
    pub phone: Phone,
    pub address: String,
    /// At most one entry per product, in first-seen order.
    pub items: Vec<OrderItemRequest>,
}

impl CreateOrderRequest {
    /// Build a request from validated customer details and the cart's lines.
    ///
    /// Only product IDs and quantities are carried over.
    #[must_use]
    pub fn from_cart(details: &CustomerDetails, lines: &[CartLineItem]) -> Self {
        Self {
            name: details.name.clone(),
            email: details.email.as_str().to_owned(),
            phone: details.phone.as_str().to_owned(),
            address: details.address.clone(),
            items: lines
                .iter()
                .map(|line| OrderItemRequest {
                    product_id: line.product_id,
                    quantity: line.quantity,
                })
                .collect(),
        }
    }

    /// Validate the request, merging repeated products by summing quantities.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderRequestError`] for the first problem found: blank
    /// contact fields, malformed email or phone, no items, or a quantity
    /// outside `1..=MAX_LINE_QUANTITY` after merging.
    pub fn validate(&self) -> Result<NewOrder, OrderRequestError> {
        let name = required("name", &self.name)?;
        let email = Email::parse(required("email", &self.email)?)?;
        let phone = Phone::parse(required("phone", &self.phone)?)?;
        let address = required("address", &self.address)?;

        if self.items.is_empty() {
            return Err(OrderRequestError::NoItems);
        }

        let mut items: Vec<OrderItemRequest> = Vec::with_capacity(self.items.len());
        for item in &self.items {
            if item.quantity == 0 {
                return Err(OrderRequestError::InvalidQuantity {
                    product_id: item.product_id,
                });
            }
            match items.iter_mut().find(|i| i.product_id == item.product_id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
                None => items.push(*item),
            }
        }

        if let Some(item) = items.iter().find(|i| i.quantity > MAX_LINE_QUANTITY) {
            return Err(OrderRequestError::InvalidQuantity {
                product_id: item.product_id,
            });
        }

        Ok(NewOrder {
            name: name.to_owned(),
            email,
            phone,
            address: address.to_owned(),
            items,
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, OrderRequestError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(OrderRequestError::MissingField(field));
    }
    Ok(trimmed)
}

/// A persisted order line with the product resolved at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: OrderLineId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub product: Product,
}

impl OrderLine {
    /// Current price of this line: product price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// A created order as returned by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderLine>,
    pub total: Price,
}

impl Order {
    /// Sum of all line totals.
    #[must_use]
    pub fn compute_total(items: &[OrderLine]) -> Price {
        items.iter().map(OrderLine::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }
}
