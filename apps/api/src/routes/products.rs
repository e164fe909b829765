//! Product endpoints: public storefront reads plus seller-gated writes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use bazaar_core::seller::approved_profile;
use bazaar_core::validation::{
    validate_price_cents, validate_product_name, validate_stock, validate_uuid,
};
use bazaar_core::{Product, Role};
use bazaar_db::ProductListing;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

// -- Request types --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub category_id: String,
    pub image_url: Option<String>,
    /// Only honored on update; new products are always published.
    #[serde(default)]
    pub is_published: Option<bool>,
}

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub category_name: String,
    pub shop_name: String,
}

impl From<ProductListing> for ProductResponse {
    fn from(listing: ProductListing) -> Self {
        ProductResponse {
            id: listing.id,
            name: listing.name,
            description: listing.description,
            price_cents: listing.price_cents,
            stock: listing.stock,
            image_url: listing.image_url,
            is_published: listing.is_published,
            category_name: listing.category_name,
            shop_name: listing.shop_name,
        }
    }
}

// -- Handlers --

/// GET /products — all published products. Public.
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.db.products().list_published().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /products/{id} — one published product. Public.
///
/// Absent and unpublished products are indistinguishable here.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .db
        .products()
        .get_published(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {id}")))?;

    Ok(Json(product.into()))
}

/// GET /products/my — the approved seller's own products, published or not.
#[tracing::instrument(skip(state, auth))]
pub async fn my(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let profile = state.db.sellers().get_by_user(auth.id()).await?;
    let profile = approved_profile(profile.as_ref())?;

    let products = state.db.products().list_by_seller(&profile.id).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// POST /products — create a product. Approved sellers only.
#[tracing::instrument(skip(state, auth, req))]
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let profile = state.db.sellers().get_by_user(auth.id()).await?;
    let profile = approved_profile(profile.as_ref())?;

    validate_product_name(&req.name)?;
    validate_price_cents(req.price_cents)?;
    validate_stock(req.stock)?;
    validate_uuid("categoryId", &req.category_id)?;

    let category = state
        .db
        .categories()
        .get_by_id(&req.category_id)
        .await?
        .ok_or_else(|| ApiError::Validation("Category not found".to_string()))?;

    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        category_id: category.id,
        seller_profile_id: profile.id.clone(),
        name: req.name.trim().to_string(),
        description: req.description,
        price_cents: req.price_cents,
        stock: req.stock,
        image_url: req.image_url,
        is_published: true,
        created_at: now,
        updated_at: now,
    };

    state.db.products().insert(&product).await?;

    info!(product_id = %product.id, seller = %profile.id, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            id: product.id,
            name: product.name,
            description: product.description,
            price_cents: product.price_cents,
            stock: product.stock,
            image_url: product.image_url,
            is_published: product.is_published,
            category_name: category.name,
            shop_name: profile.shop_name.clone(),
        }),
    ))
}

/// PUT /products/{id} — update an owned product. Approved sellers only.
#[tracing::instrument(skip(state, auth, req))]
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let profile = state.db.sellers().get_by_user(auth.id()).await?;
    let profile = approved_profile(profile.as_ref())?;

    let existing = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {id}")))?;

    if existing.seller_profile_id != profile.id {
        return Err(ApiError::Unauthorized(
            "You do not own this product".to_string(),
        ));
    }

    validate_product_name(&req.name)?;
    validate_price_cents(req.price_cents)?;
    validate_stock(req.stock)?;
    validate_uuid("categoryId", &req.category_id)?;

    let category = state
        .db
        .categories()
        .get_by_id(&req.category_id)
        .await?
        .ok_or_else(|| ApiError::Validation("Category not found".to_string()))?;

    let updated = Product {
        category_id: category.id,
        name: req.name.trim().to_string(),
        description: req.description,
        price_cents: req.price_cents,
        stock: req.stock,
        image_url: req.image_url.or_else(|| existing.image_url.clone()),
        is_published: req.is_published.unwrap_or(existing.is_published),
        updated_at: Utc::now(),
        ..existing
    };

    state.db.products().update(&updated).await?;

    info!(product_id = %updated.id, "Product updated");

    Ok(Json(ProductResponse {
        id: updated.id,
        name: updated.name,
        description: updated.description,
        price_cents: updated.price_cents,
        stock: updated.stock,
        image_url: updated.image_url,
        is_published: updated.is_published,
        category_name: category.name,
        shop_name: profile.shop_name.clone(),
    }))
}

/// DELETE /products/{id} — owner seller or admin.
#[tracing::instrument(skip(state, auth))]
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {id}")))?;

    let is_admin = auth.has_role(Role::Admin);
    let is_owner = match state.db.sellers().get_by_user(auth.id()).await? {
        Some(profile) => profile.id == product.seller_profile_id,
        None => false,
    };

    if !is_admin && !is_owner {
        return Err(ApiError::Unauthorized(
            "You are not allowed to delete this product".to_string(),
        ));
    }

    state.db.products().delete(&id).await?;

    info!(product_id = %id, "Product deleted");

    Ok(StatusCode::NO_CONTENT)
}
