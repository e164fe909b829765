//! Profile endpoints: who am I, seller application, re-application.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use bazaar_core::validation::validate_shop_name;
use bazaar_core::{CoreError, Role, SellerAction, SellerProfile, SellerStatus};

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

// -- Request types --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerApplicationRequest {
    pub shop_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfileResponse {
    pub id: String,
    pub shop_name: String,
    pub description: String,
    pub status: SellerStatus,
}

impl From<SellerProfile> for SellerProfileResponse {
    fn from(profile: SellerProfile) -> Self {
        SellerProfileResponse {
            id: profile.id,
            shop_name: profile.shop_name,
            description: profile.description,
            status: profile.status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub full_name: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub seller_profile: Option<SellerProfileResponse>,
}

// -- Handlers --

/// GET /profile/me — account details plus seller profile, if any.
#[tracing::instrument(skip(state, auth))]
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let profile = state.db.sellers().get_by_user(auth.id()).await?;

    Ok(Json(MeResponse {
        full_name: auth.user.full_name.clone(),
        email: auth.user.email.clone(),
        roles: auth.roles.clone(),
        seller_profile: profile.map(Into::into),
    }))
}

/// POST /profile/become-seller — apply to sell; creates a Pending profile.
///
/// A second application in any state is a Conflict: the at-most-one-profile
/// invariant is checked here and backed by a unique index.
#[tracing::instrument(skip(state, auth, req))]
pub async fn become_seller(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SellerApplicationRequest>,
) -> Result<(StatusCode, Json<SellerProfileResponse>), ApiError> {
    validate_shop_name(&req.shop_name)?;

    if state.db.sellers().get_by_user(auth.id()).await?.is_some() {
        return Err(CoreError::DuplicateSellerProfile.into());
    }

    let now = Utc::now();
    let profile = SellerProfile {
        id: Uuid::new_v4().to_string(),
        user_id: auth.id().to_string(),
        shop_name: req.shop_name.trim().to_string(),
        description: req.description.unwrap_or_default(),
        status: SellerStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    state.db.sellers().insert(&profile).await?;

    info!(user_id = %auth.id(), profile_id = %profile.id, "Seller application submitted");

    Ok((StatusCode::CREATED, Json(profile.into())))
}

/// POST /profile/reapply — re-submit a Rejected application.
#[tracing::instrument(skip(state, auth, req))]
pub async fn reapply(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SellerApplicationRequest>,
) -> Result<Json<SellerProfileResponse>, ApiError> {
    validate_shop_name(&req.shop_name)?;

    let profile = state
        .db
        .sellers()
        .get_by_user(auth.id())
        .await?
        .ok_or_else(|| ApiError::NotFound("No seller application found".to_string()))?;

    // The state machine decides whether re-application is allowed; the
    // guarded update below enforces it against concurrent changes.
    profile.status.apply(SellerAction::Reapply)?;

    let shop_name = req.shop_name.trim().to_string();
    let description = req.description.unwrap_or_default();
    state
        .db
        .sellers()
        .reapply(&profile.id, &shop_name, &description)
        .await?;

    info!(user_id = %auth.id(), profile_id = %profile.id, "Seller re-application submitted");

    Ok(Json(SellerProfileResponse {
        id: profile.id,
        shop_name,
        description,
        status: SellerStatus::Pending,
    }))
}
