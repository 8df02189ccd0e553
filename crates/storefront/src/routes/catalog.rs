//! Catalog route handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use delivery_core::ProductId;
use delivery_core::catalog::{Banner, Category, Product};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    /// Category slug to filter by.
    pub category: Option<String>,
}

/// List active home page banners, lowest position first.
#[instrument(skip(state))]
pub async fn banners(State(state): State<AppState>) -> Result<Json<Arc<Vec<Banner>>>> {
    Ok(Json(state.catalog().banners().await?))
}

/// List all categories with their product counts.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Arc<Vec<Category>>>> {
    Ok(Json(state.catalog().categories().await?))
}

/// List products, optionally restricted to one category.
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Arc<Vec<Product>>>> {
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|slug| !slug.is_empty());

    Ok(Json(state.catalog().products(category).await?))
}

/// Show a single product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let not_found = || AppError::NotFound(format!("product {id}"));
    let product_id = id.parse::<ProductId>().map_err(|_| not_found())?;

    state
        .catalog()
        .product(product_id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}
