//! Admin endpoints for the seller approval workflow.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use bazaar_core::SellerAction;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::routes::profile::SellerProfileResponse;
use crate::AppState;

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSellerResponse {
    pub id: String,
    pub shop_name: String,
    pub description: String,
    pub user_email: String,
}

// -- Handlers --

/// GET /admin/pending-sellers — the review queue.
#[tracing::instrument(skip(state, auth))]
pub async fn pending_sellers(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<PendingSellerResponse>>, ApiError> {
    auth.require_admin()?;

    let pending = state.db.sellers().list_pending().await?;

    Ok(Json(
        pending
            .into_iter()
            .map(|s| PendingSellerResponse {
                id: s.id,
                shop_name: s.shop_name,
                description: s.description,
                user_email: s.user_email,
            })
            .collect(),
    ))
}

/// POST /admin/sellers/{id}/approve — Pending → Approved, grants the
/// Seller role in the same transaction.
#[tracing::instrument(skip(state, auth))]
pub async fn approve_seller(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SellerProfileResponse>, ApiError> {
    auth.require_admin()?;

    let profile = state
        .db
        .sellers()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Seller profile not found: {id}")))?;

    // Conflict unless the profile is Pending.
    let next = profile.status.apply(SellerAction::Approve)?;

    state.db.sellers().approve(&profile.id, &profile.user_id).await?;

    info!(profile_id = %profile.id, user_id = %profile.user_id, "Seller approved");

    Ok(Json(SellerProfileResponse {
        id: profile.id,
        shop_name: profile.shop_name,
        description: profile.description,
        status: next,
    }))
}

/// POST /admin/sellers/{id}/reject — Pending → Rejected.
#[tracing::instrument(skip(state, auth))]
pub async fn reject_seller(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SellerProfileResponse>, ApiError> {
    auth.require_admin()?;

    let profile = state
        .db
        .sellers()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Seller profile not found: {id}")))?;

    let next = profile.status.apply(SellerAction::Reject)?;

    state
        .db
        .sellers()
        .transition(&profile.id, profile.status, next)
        .await?;

    info!(profile_id = %profile.id, "Seller rejected");

    Ok(Json(SellerProfileResponse {
        id: profile.id,
        shop_name: profile.shop_name,
        description: profile.description,
        status: next,
    }))
}
