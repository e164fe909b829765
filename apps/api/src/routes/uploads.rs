//! Product image upload endpoint.
//!
//! Multipart in, relative reference string out. The returned URL is what
//! product create/update accept as `imageUrl`, and the `/uploads/products`
//! static service resolves it back to the stored file.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;

use bazaar_core::seller::approved_profile;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
}

/// POST /uploads — store a product image. Approved sellers only.
#[tracing::instrument(skip(state, auth, multipart))]
pub async fn product_image(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let profile = state.db.sellers().get_by_user(auth.id()).await?;
    approved_profile(profile.as_ref())?;

    let field = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("Malformed multipart body".to_string()))?
        .ok_or_else(|| ApiError::Validation("No file provided".to_string()))?;

    let filename_hint = field.file_name().map(str::to_string);
    let bytes = field
        .bytes()
        .await
        .map_err(|_| ApiError::Validation("Malformed multipart body".to_string()))?;

    let url = state.files.save(filename_hint.as_deref(), &bytes).await?;

    info!(user_id = %auth.id(), url = %url, size = bytes.len(), "Image uploaded");

    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}
