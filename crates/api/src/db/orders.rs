//! Order repository for database operations.
//!
//! Queries are bound at runtime so the crate builds without a live database;
//! the schema they target lives in `crates/api/migrations/`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use orderdesk_core::{Email, OrderId, ProductId};

use super::RepositoryError;
use crate::models::Order;

/// Storage port for customer orders.
///
/// Production code uses [`PgOrderRepository`]; tests substitute in-memory
/// implementations.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Check whether an order already exists for this (email, product) pair.
    ///
    /// Email comparison is case-insensitive. This is a fast-fail
    /// optimization only: between this check and a subsequent insert another
    /// writer may commit the same pair, so it is *not* sufficient for
    /// correctness. [`OrderRepository::insert`] is the authoritative guard.
    async fn exists(&self, email: &Email, product_id: &ProductId) -> Result<bool, RepositoryError>;

    /// Persist a new order.
    ///
    /// The composite unique index on `(lower(email), product_id)` is the
    /// final arbiter: of two concurrent inserts for the same pair exactly
    /// one succeeds and the other gets [`RepositoryError::Duplicate`].
    async fn insert(&self, order: &Order) -> Result<OrderId, RepositoryError>;

    /// Fetch all orders belonging to an email, case-insensitively.
    ///
    /// Returns rows in insertion order; an unknown email yields an empty
    /// vec, never an error.
    async fn find_all_by_email(&self, email: &Email) -> Result<Vec<Order>, RepositoryError>;
}

/// `PostgreSQL`-backed [`OrderRepository`].
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn exists(&self, email: &Email, product_id: &ProductId) -> Result<bool, RepositoryError> {
        let found = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (
                SELECT 1 FROM orders
                WHERE lower(email) = lower($1) AND product_id = $2
            )
            ",
        )
        .bind(email)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(found)
    }

    async fn insert(&self, order: &Order) -> Result<OrderId, RepositoryError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r"
            INSERT INTO orders (order_id, email, first_name, last_name, product_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING order_id
            ",
        )
        .bind(order.order_id)
        .bind(&order.email)
        .bind(&order.first_name)
        .bind(&order.last_name)
        .bind(&order.product_id)
        .bind(order.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Duplicate;
            }
            RepositoryError::Database(e)
        })?;

        Ok(OrderId::from_uuid(id))
    }

    async fn find_all_by_email(&self, email: &Email) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT order_id, email, first_name, last_name, product_id, created_at
            FROM orders
            WHERE lower(email) = lower($1)
            ORDER BY created_at ASC
            ",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            orders.push(order_from_row(&row)?);
        }

        Ok(orders)
    }
}

/// Map a database row back onto the domain model.
///
/// Stored emails and product ids are re-parsed; a row that no longer
/// satisfies the domain constraints surfaces as `DataCorruption` rather
/// than panicking or silently passing through.
fn order_from_row(row: &PgRow) -> Result<Order, RepositoryError> {
    let order_id: Uuid = row.try_get("order_id")?;
    let raw_email: String = row.try_get("email")?;
    let first_name: String = row.try_get("first_name")?;
    let last_name: String = row.try_get("last_name")?;
    let raw_product_id: String = row.try_get("product_id")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    let email = Email::parse(&raw_email).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
    })?;
    let product_id = ProductId::parse(&raw_product_id).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid product id in database: {e}"))
    })?;

    Ok(Order {
        order_id: OrderId::from_uuid(order_id),
        email,
        first_name,
        last_name,
        product_id,
        created_at,
    })
}
