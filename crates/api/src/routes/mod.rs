//! HTTP route handlers for the order API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health         - Liveness check
//! GET  /health/ready   - Readiness check (verifies database)
//!
//! # Orders
//! POST /api/orders        - Create an order
//! GET  /api/orders?email= - List orders for an email
//! ```

pub mod orders;

use axum::{Router, routing::post};

use crate::state::AppState;

/// Create the order routes router.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/orders",
        post(orders::create_order).get(orders::list_orders),
    )
}
