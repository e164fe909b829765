//! Order read endpoints. Orders are created by checkout (see routes::cart).

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use bazaar_core::{Order, OrderItem, OrderStatus};

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
}

impl OrderResponse {
    /// Builds the DTO from an order and its frozen items.
    pub fn from_parts(order: Order, items: Vec<OrderItem>) -> Self {
        OrderResponse {
            id: order.id,
            status: order.status,
            total_cents: order.total_cents,
            created_at: order.created_at.to_rfc3339(),
            items: items
                .into_iter()
                .map(|item| OrderItemResponse {
                    line_total_cents: item.line_total().cents(),
                    product_id: item.product_id,
                    product_name: item.name_snapshot,
                    quantity: item.quantity,
                    unit_price_cents: item.unit_price_cents,
                })
                .collect(),
        }
    }
}

// -- Handlers --

/// GET /orders — the caller's orders, newest first.
#[tracing::instrument(skip(state, auth))]
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.db.orders().list_for_user(auth.id()).await?;

    Ok(Json(
        orders
            .into_iter()
            .map(|(order, items)| OrderResponse::from_parts(order, items))
            .collect(),
    ))
}

/// GET /orders/{id} — one of the caller's orders.
///
/// Another user's order id is a plain 404, not a 403: the response must not
/// confirm that the id exists.
#[tracing::instrument(skip(state, auth))]
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let (order, items) = state
        .db
        .orders()
        .get_for_user(&id, auth.id())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order not found: {id}")))?;

    Ok(Json(OrderResponse::from_parts(order, items)))
}
