//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check (main.rs)
//! GET  /health/ready           - Readiness check (main.rs)
//!
//! # Catalog
//! GET  /api/banners            - Active home page banners
//! GET  /api/categories         - Category listing with product counts
//! GET  /api/products           - Product listing (?category=<slug>)
//! GET  /api/products/{id}      - Product detail
//!
//! # Orders
//! POST /api/orders             - Create order (201)
//! GET  /api/orders             - Order listing, newest first
//! GET  /api/orders/{id}        - Order detail
//! ```

pub mod catalog;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::rate_limit::RateLimiterLayer;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::products))
        .route("/{id}", get(catalog::show))
}

/// Create the order routes router.
///
/// When `limiter` is given it wraps order creation only.
pub fn order_routes(limiter: Option<RateLimiterLayer>) -> Router<AppState> {
    let mut create = post(orders::create);
    if let Some(layer) = limiter {
        create = create.layer(layer);
    }

    Router::new()
        .route("/", get(orders::index).merge(create))
        .route("/{id}", get(orders::show))
}

/// Create all API routes for the storefront.
pub fn routes(order_limiter: Option<RateLimiterLayer>) -> Router<AppState> {
    Router::new()
        .route("/api/banners", get(catalog::banners))
        .route("/api/categories", get(catalog::categories))
        .nest("/api/products", product_routes())
        .nest("/api/orders", order_routes(order_limiter))
}
