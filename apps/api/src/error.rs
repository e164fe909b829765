//! API error types with HTTP response mapping.
//!
//! ## Taxonomy
//! ```text
//! Unauthenticated  → 401   missing/invalid/expired credential
//! Unauthorized     → 403   authenticated but wrong role/ownership
//! NotFound         → 404   entity absence (incl. unpublished products)
//! Validation       → 400   bad quantity, missing category, empty cart
//! Conflict         → 409   duplicate seller application, bad transition
//! StockUnavailable → 409   insufficient inventory, names the product
//! Internal         → 500   logged, generic message to the client
//! ```
//!
//! Every response body is `{"error": "<message>"}` JSON.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use bazaar_core::{CoreError, ValidationError};
use bazaar_db::{CheckoutError, DbError};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or invalid credential.
    Unauthenticated(String),
    /// Authenticated but lacking the required role or ownership.
    Unauthorized(String),
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    Validation(String),
    /// State conflict (duplicate application, invalid transition).
    Conflict(String),
    /// Insufficient inventory.
    StockUnavailable(String),
    /// Internal server error.
    Internal(String),
}

impl ApiError {
    /// The uniform 401 used for every authentication failure mode, so the
    /// response does not reveal whether the header, token, or account was
    /// the problem.
    pub fn unauthenticated() -> Self {
        ApiError::Unauthenticated("Missing or invalid credentials".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Unauthorized(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::StockUnavailable(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

/// Converts domain errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::ProductNotFound(_) | CoreError::CartItemNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            CoreError::InsufficientStock { .. } => ApiError::StockUnavailable(err.to_string()),
            CoreError::ProductUnavailable { .. }
            | CoreError::EmptyCart
            | CoreError::Validation(_) => ApiError::Validation(err.to_string()),
            CoreError::DuplicateSellerProfile | CoreError::InvalidSellerTransition { .. } => {
                ApiError::Conflict(err.to_string())
            }
            CoreError::NotASeller | CoreError::SellerNotApproved => {
                ApiError::Unauthorized(err.to_string())
            }
        }
    }
}

/// Field-level validation failures map straight to 400.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::Conflict(err.to_string()),
            DbError::ForeignKeyViolation(_) => {
                ApiError::Validation("Invalid reference".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Converts checkout errors (domain or storage) to API errors.
impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Domain(e) => e.into(),
            CheckoutError::Db(e) => e.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (kind, msg) = match self {
            ApiError::Unauthenticated(m) => ("Unauthenticated", m),
            ApiError::Unauthorized(m) => ("Unauthorized", m),
            ApiError::NotFound(m) => ("NotFound", m),
            ApiError::Validation(m) => ("Validation", m),
            ApiError::Conflict(m) => ("Conflict", m),
            ApiError::StockUnavailable(m) => ("StockUnavailable", m),
            ApiError::Internal(m) => ("Internal", m),
        };
        write!(f, "[{kind}] {msg}")
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::EmptyCart.into();
        assert!(matches!(err, ApiError::Validation(_)));

        let err: ApiError = CoreError::InsufficientStock {
            name: "Lamp".to_string(),
            available: 1,
            requested: 2,
        }
        .into();
        assert!(matches!(err, ApiError::StockUnavailable(_)));

        let err: ApiError = CoreError::NotASeller.into();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err: ApiError = CoreError::DuplicateSellerProfile.into();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn test_db_error_mapping() {
        let err: ApiError = DbError::not_found("Product", "p-1").into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = DbError::duplicate("email", "a@b.com").into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = DbError::Internal("boom".to_string()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
