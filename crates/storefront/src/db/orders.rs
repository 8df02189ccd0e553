//! Order repository for database operations.
//!
//! Orders store contact details and `(product, quantity)` lines only. Line
//! products are joined at read time, so totals reflect current prices.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use delivery_core::catalog::Product;
use delivery_core::order::{NewOrder, Order, OrderLine};
use delivery_core::{CategoryId, OrderId, OrderLineId, Price, ProductId};

use super::{RepositoryError, quantity_from_db};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    name: String,
    email: String,
    phone: String,
    address: String,
    created_at: DateTime<Utc>,
}

/// Internal row type: an order line joined with its product.
#[derive(Debug, sqlx::FromRow)]
struct LineRow {
    id: OrderLineId,
    order_id: OrderId,
    product_id: ProductId,
    quantity: i32,
    name: String,
    description: Option<String>,
    price: Price,
    photo: Option<String>,
    category_id: CategoryId,
}

impl TryFrom<LineRow> for OrderLine {
    type Error = RepositoryError;

    fn try_from(row: LineRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            quantity: quantity_from_db(row.quantity)?,
            product: Product {
                id: row.product_id,
                name: row.name,
                description: row.description,
                price: row.price,
                photo: row.photo,
                category_id: row.category_id,
                category: None,
            },
        })
    }
}

fn assemble(row: OrderRow, items: Vec<OrderLine>) -> Order {
    let total = Order::compute_total(&items);
    Order {
        id: row.id,
        name: row.name,
        email: row.email,
        phone: row.phone,
        address: row.address,
        created_at: row.created_at,
        items,
        total,
    }
}

const LINE_COLUMNS: &str = r"
    SELECT oi.id, oi.order_id, oi.product_id, oi.quantity,
           p.name, p.description, p.price, p.photo, p.category_id
    FROM order_item oi
    JOIN product p ON p.id = oi.product_id
";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a validated order and its lines in one transaction.
    ///
    /// Lines keep the order in which they were submitted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::UnknownProduct` if any line references a
    /// product that does not exist; nothing is written in that case.
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let product_ids: Vec<Uuid> = order
            .items
            .iter()
            .map(|item| item.product_id.as_uuid())
            .collect();

        let mut tx = self.pool.begin().await?;

        let known: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM product WHERE id = ANY($1)")
            .bind(product_ids)
            .fetch_all(&mut *tx)
            .await?;

        if let Some(missing) = order
            .items
            .iter()
            .find(|item| !known.contains(&item.product_id.as_uuid()))
        {
            return Err(RepositoryError::UnknownProduct(missing.product_id));
        }

        let order_id = OrderId::generate();
        sqlx::query(
            r"
            INSERT INTO customer_order (id, name, email, phone, address)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(order_id)
        .bind(&order.name)
        .bind(order.email.as_str())
        .bind(order.phone.as_str())
        .bind(&order.address)
        .execute(&mut *tx)
        .await?;

        for (position, item) in order.items.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| RepositoryError::DataCorruption("too many order lines".to_string()))?;
            let quantity = i32::try_from(item.quantity).map_err(|_| {
                RepositoryError::DataCorruption(format!("quantity out of range: {}", item.quantity))
            })?;

            sqlx::query(
                r"
                INSERT INTO order_item (id, order_id, product_id, quantity, position)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(OrderLineId::generate())
            .bind(order_id)
            .bind(item.product_id)
            .bind(quantity)
            .bind(position)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            order_id = %order_id,
            lines = order.items.len(),
            "Order created"
        );

        self.get(order_id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Get an order with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored quantity is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, name, email, phone, address, created_at
            FROM customer_order
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, LineRow>(&format!(
            "{LINE_COLUMNS} WHERE oi.order_id = $1 ORDER BY oi.position"
        ))
        .bind(id)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(OrderLine::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(assemble(row, lines)))
    }

    /// List all orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored quantity is invalid.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, name, email, phone, address, created_at
            FROM customer_order
            ORDER BY created_at DESC, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let order_ids: Vec<Uuid> = rows.iter().map(|row| row.id.as_uuid()).collect();
        let line_rows = sqlx::query_as::<_, LineRow>(&format!(
            "{LINE_COLUMNS} WHERE oi.order_id = ANY($1) ORDER BY oi.order_id, oi.position"
        ))
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut lines_by_order: HashMap<OrderId, Vec<OrderLine>> = HashMap::new();
        for line in line_rows {
            let order_id = line.order_id;
            lines_by_order
                .entry(order_id)
                .or_default()
                .push(OrderLine::try_from(line)?);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let lines = lines_by_order.remove(&row.id).unwrap_or_default();
                assemble(row, lines)
            })
            .collect())
    }
}
