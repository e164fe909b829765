//! Cart endpoints: add, remove, view, checkout.
//!
//! Handlers orchestrate only: repositories load state, the pure rules in
//! `bazaar_core::cart` decide, repositories apply. Checkout delegates to
//! the one multi-row transaction in bazaar-db.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use bazaar_core::cart::{remove_outcome, RemoveOutcome};
use bazaar_core::validation::{validate_cart_size, validate_quantity, validate_uuid};
use bazaar_core::{cart, CartItem, CoreError, Money};

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::routes::orders::OrderResponse;
use crate::AppState;

// -- Request types --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub product_id: String,
    /// Absent, zero, or >= the line quantity removes the whole line.
    pub quantity: Option<i64>,
}

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineResponse {
    pub product_id: String,
    pub product_name: String,
    pub image_url: Option<String>,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub line_total_cents: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummaryResponse {
    pub items: Vec<CartLineResponse>,
    pub total_cents: i64,
}

async fn summary(state: &AppState, user_id: &str) -> Result<CartSummaryResponse, ApiError> {
    let lines = state.db.carts().view(user_id).await?;
    let total = lines.iter().map(|l| l.line_total()).sum::<Money>();

    Ok(CartSummaryResponse {
        items: lines
            .into_iter()
            .map(|l| CartLineResponse {
                line_total_cents: l.line_total().cents(),
                product_id: l.product_id,
                product_name: l.product_name,
                image_url: l.image_url,
                unit_price_cents: l.unit_price_cents,
                quantity: l.quantity,
            })
            .collect(),
        total_cents: total.cents(),
    })
}

// -- Handlers --

/// POST /cart/add — create or top up a cart line.
///
/// The price snapshot is refreshed to the product's current price on every
/// add (see DESIGN.md).
#[tracing::instrument(skip(state, auth, req))]
pub async fn add(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AddToCartRequest>,
) -> Result<Json<CartSummaryResponse>, ApiError> {
    validate_uuid("productId", &req.product_id)?;
    validate_quantity(req.quantity)?;

    let product = state
        .db
        .products()
        .get_by_id(&req.product_id)
        .await?
        .filter(|p| p.is_published)
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", req.product_id)))?;

    let existing = state.db.carts().get_line(auth.id(), &product.id).await?;

    let cumulative = existing.as_ref().map_or(0, |l| l.quantity) + req.quantity;
    cart::ensure_stock(&product, cumulative)?;

    let now = Utc::now();
    match existing {
        Some(line) => {
            state
                .db
                .carts()
                .update_line(&line.id, cumulative, product.price_cents, now)
                .await?;
        }
        None => {
            let count = state.db.carts().count_for_user(auth.id()).await?;
            validate_cart_size(count as usize)?;

            let line = CartItem {
                id: Uuid::new_v4().to_string(),
                user_id: auth.id().to_string(),
                product_id: product.id.clone(),
                quantity: req.quantity,
                unit_price_cents: product.price_cents,
                added_at: now,
                updated_at: now,
            };
            state.db.carts().insert_line(&line).await?;
        }
    }

    info!(user_id = %auth.id(), product_id = %product.id, quantity = %cumulative, "Cart line upserted");

    Ok(Json(summary(&state, auth.id()).await?))
}

/// POST /cart/remove — decrement or delete a cart line.
#[tracing::instrument(skip(state, auth, req))]
pub async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RemoveFromCartRequest>,
) -> Result<Json<CartSummaryResponse>, ApiError> {
    validate_uuid("productId", &req.product_id)?;

    let line = state
        .db
        .carts()
        .get_line(auth.id(), &req.product_id)
        .await?
        .ok_or_else(|| CoreError::CartItemNotFound(req.product_id.clone()))?;

    match remove_outcome(line.quantity, req.quantity) {
        RemoveOutcome::Delete => state.db.carts().delete_line(&line.id).await?,
        RemoveOutcome::Decrement(remaining) => {
            state.db.carts().set_quantity(&line.id, remaining).await?
        }
    }

    info!(user_id = %auth.id(), product_id = %req.product_id, "Cart line removed/decremented");

    Ok(Json(summary(&state, auth.id()).await?))
}

/// GET /cart/my — cart lines joined with live product data, with total.
#[tracing::instrument(skip(state, auth))]
pub async fn my(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CartSummaryResponse>, ApiError> {
    Ok(Json(summary(&state, auth.id()).await?))
}

/// POST /cart/checkout — convert the cart into an order, all-or-nothing.
#[tracing::instrument(skip(state, auth))]
pub async fn checkout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let (order, items) = state.db.orders().checkout(auth.id()).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse::from_parts(order, items)),
    ))
}
