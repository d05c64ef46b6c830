//! The order creation workflow.
//!
//! Orchestrates the user directory lookup, the uniqueness pre-check, and the
//! final insert. Every call ends in exactly one of four outcomes: a new
//! order id, `Duplicate`, `EmailNotFound`, or `DirectoryUnavailable`
//! (anything else is an unclassified internal failure). The workflow holds
//! no state between requests; the order store is the only shared resource.

use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use orderdesk_core::{Email, OrderId, ProductId};

use crate::db::{OrderRepository, RepositoryError};
use crate::directory::UserDirectory;
use crate::models::Order;

/// Terminal failure outcomes of [`OrderService::create_order`].
#[derive(Debug, Error)]
pub enum CreateOrderError {
    /// This customer has already ordered this product.
    #[error("customer has already ordered this product")]
    Duplicate,

    /// The email is unknown to the external user directory.
    #[error("email does not exist in external user system")]
    EmailNotFound,

    /// The external user directory could not be reached or misbehaved.
    #[error("external user directory error: {0}")]
    DirectoryUnavailable(String),

    /// Unclassified storage failure; never exposed to API consumers.
    #[error(transparent)]
    Repository(RepositoryError),
}

/// Order workflow, generic over the identity lookup and storage ports.
///
/// Handlers construct one per request; both ports are cheap to clone.
pub struct OrderService<D, R> {
    directory: D,
    orders: R,
}

impl<D, R> OrderService<D, R>
where
    D: UserDirectory,
    R: OrderRepository,
{
    /// Create a new order service.
    pub const fn new(directory: D, orders: R) -> Self {
        Self { directory, orders }
    }

    /// Create a new order for a given product and email.
    ///
    /// Steps: a friendly duplicate pre-check (racy, fast-fail only), an
    /// identity lookup against the directory, then the insert whose unique
    /// constraint is the real duplicate protection. A directory outage
    /// never leaves a partially written order behind - the insert only
    /// happens after a successful resolution.
    ///
    /// # Errors
    ///
    /// Returns [`CreateOrderError`] for each of the terminal failure
    /// outcomes described on the type.
    #[instrument(skip(self), fields(product_id = %product_id, email = %email))]
    pub async fn create_order(
        &self,
        product_id: &ProductId,
        email: &Email,
    ) -> Result<OrderId, CreateOrderError> {
        // Friendly pre-check (not sufficient under concurrency)
        if self
            .orders
            .exists(email, product_id)
            .await
            .map_err(CreateOrderError::Repository)?
        {
            return Err(CreateOrderError::Duplicate);
        }

        // Verify the customer exists in the external directory
        let user = self
            .directory
            .find_user_by_email(email.as_str())
            .await
            .map_err(|e| CreateOrderError::DirectoryUnavailable(e.to_string()))?
            .ok_or(CreateOrderError::EmailNotFound)?;

        let order = Order {
            order_id: OrderId::generate(),
            email: email.clone(),
            first_name: user.first_name,
            last_name: user.last_name,
            product_id: product_id.clone(),
            created_at: Utc::now(),
        };

        // Real protection: the storage unique constraint catches the race
        // the pre-check could not
        match self.orders.insert(&order).await {
            Ok(order_id) => {
                tracing::info!(order_id = %order_id, "order created");
                Ok(order_id)
            }
            Err(RepositoryError::Duplicate) => Err(CreateOrderError::Duplicate),
            Err(e) => Err(CreateOrderError::Repository(e)),
        }
    }

    /// Return all orders belonging to an email, case-insensitively.
    ///
    /// Pure read-through to the store; no business logic.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the store query fails.
    pub async fn orders_by_email(&self, email: &Email) -> Result<Vec<Order>, RepositoryError> {
        self.orders.find_all_by_email(email).await
    }
}
