//! Order route handlers.
//!
//! Adapts HTTP requests and responses to the order workflow's typed
//! contract; business logic lives in [`crate::services::OrderService`].
//! Wire DTOs use camelCase field names.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use orderdesk_core::{Email, OrderId, ProductId};

use crate::db::PgOrderRepository;
use crate::error::{AppError, Result};
use crate::models::Order;
use crate::services::OrderService;
use crate::state::AppState;

/// Request body for order creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Product the customer wants to order.
    pub product_id: String,
    /// Customer email to verify against the user directory.
    pub email: String,
}

/// Response body for a successfully created order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    /// The generated order identifier.
    pub order_id: OrderId,
}

/// One order in a listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: OrderId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub product_id: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.order_id,
            email: order.email.into_inner(),
            first_name: order.first_name,
            last_name: order.last_name,
            product_id: order.product_id.into_inner(),
        }
    }
}

/// Create an order.
///
/// POST /api/orders
///
/// # Errors
///
/// Returns 400 for malformed input, 409 for a duplicate order, 422 for an
/// email the directory does not know, 502 when the directory is down.
#[instrument(skip(state, request), fields(product_id = %request.product_id, email = %request.email))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>)> {
    let product_id = ProductId::parse(&request.product_id)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let email =
        Email::parse(request.email.trim()).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let service = OrderService::new(
        state.directory().clone(),
        PgOrderRepository::new(state.pool().clone()),
    );
    let order_id = service.create_order(&product_id, &email).await?;

    Ok((StatusCode::CREATED, Json(CreateOrderResponse { order_id })))
}

/// Query parameters for the order listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    /// Email whose orders to list; required.
    pub email: Option<String>,
}

/// List all orders belonging to an email.
///
/// GET /api/orders?email=...
///
/// # Errors
///
/// Returns 400 when the `email` parameter is missing or malformed.
#[instrument(skip(state, query))]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>> {
    let raw = query.email.ok_or(AppError::MissingParameter("email"))?;
    let email = Email::parse(raw.trim()).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let service = OrderService::new(
        state.directory().clone(),
        PgOrderRepository::new(state.pool().clone()),
    );
    let orders = service.orders_by_email(&email).await?;

    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_order_response_uses_camel_case_wire_names() {
        let order = Order {
            order_id: OrderId::generate(),
            email: Email::parse("george.bluth@reqres.in").unwrap(),
            first_name: "George".to_owned(),
            last_name: "Bluth".to_owned(),
            product_id: ProductId::parse("TV-1").unwrap(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(OrderResponse::from(order)).unwrap();

        assert_eq!(json["email"], "george.bluth@reqres.in");
        assert_eq!(json["firstName"], "George");
        assert_eq!(json["lastName"], "Bluth");
        assert_eq!(json["productId"], "TV-1");
        assert!(json["orderId"].is_string());
    }

    #[test]
    fn test_create_request_accepts_camel_case_wire_names() {
        let request: CreateOrderRequest = serde_json::from_str(
            r#"{ "productId": "TV-1", "email": "george.bluth@reqres.in" }"#,
        )
        .unwrap();

        assert_eq!(request.product_id, "TV-1");
        assert_eq!(request.email, "george.bluth@reqres.in");
    }
}
