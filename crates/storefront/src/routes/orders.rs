//! Order route handlers.
//!
//! Order creation trusts only product IDs and quantities from the client.
//! Contact fields are validated here; products and prices come from the
//! database.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::instrument;

use delivery_core::OrderId;
use delivery_core::order::{CreateOrderRequest, Order};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create an order.
///
/// Responds `201 Created` with the stored order.
#[instrument(skip_all, fields(lines = tracing::field::Empty))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>)> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    tracing::Span::current().record("lines", request.items.len());

    let new_order = request.validate()?;
    let order = OrderRepository::new(state.pool()).create(&new_order).await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// List all orders, newest first.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    Ok(Json(OrderRepository::new(state.pool()).list().await?))
}

/// Show a single order with its lines.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Order>> {
    let not_found = || AppError::NotFound(format!("order {id}"));
    let order_id = id.parse::<OrderId>().map_err(|_| not_found())?;

    OrderRepository::new(state.pool())
        .get(order_id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}
