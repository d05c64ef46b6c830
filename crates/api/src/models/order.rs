//! The persisted order model.

use chrono::{DateTime, Utc};

use orderdesk_core::{Email, OrderId, ProductId};

/// A customer order.
///
/// Orders are created exactly once by the order workflow after a successful
/// identity resolution and a uniqueness-checked insert, and are immutable
/// thereafter. The name fields are stamped from the user directory at
/// creation time and never re-validated later.
///
/// Invariant: no two orders share the same (email, product) pair, with the
/// email compared case-insensitively. The storage layer enforces this.
#[derive(Debug, Clone)]
pub struct Order {
    /// Server-generated unique identifier.
    pub order_id: OrderId,
    /// Customer email, the case-insensitive identity key.
    pub email: Email,
    /// First name as reported by the user directory at creation time.
    pub first_name: String,
    /// Last name as reported by the user directory at creation time.
    pub last_name: String,
    /// The ordered product.
    pub product_id: ProductId,
    /// Server-assigned creation timestamp, set once.
    pub created_at: DateTime<Utc>,
}
