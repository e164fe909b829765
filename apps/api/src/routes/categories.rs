//! Category listing endpoint. Public.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
}

/// GET /categories — all categories.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = state.db.categories().list().await?;

    Ok(Json(
        categories
            .into_iter()
            .map(|c| CategoryResponse {
                id: c.id,
                name: c.name,
            })
            .collect(),
    ))
}
