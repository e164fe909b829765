//! Domain error types.
//!
//! Two layers live here: [`ValidationError`] for field-level input problems
//! and [`CoreError`] for business-rule violations. The storage crate has
//! its own `DbError`, and the API server folds all three into its HTTP
//! taxonomy:
//!
//! ```text
//! ValidationError ──► CoreError ──┐
//!                                 ├──► ApiError ──► status + {"error": msg}
//! DbError ────────────────────────┘
//! ```
//!
//! Everything is a `thiserror` enum variant with a user-presentable
//! message. Strings-as-errors and panics are not used for expected
//! failures anywhere in the workspace.

use thiserror::Error;

use crate::seller::{SellerAction, SellerStatus};

// =============================================================================
// Core Error
// =============================================================================

/// Business-rule violations. The API layer maps each variant onto the
/// error taxonomy (NotFound, Validation, Conflict, StockUnavailable,
/// Unauthorized) and the matching HTTP status.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No purchasable product with this id. Buyers see absent and
    /// unpublished products the same way.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The product was unpublished after it entered a cart. Surfaced by
    /// checkout re-validation, naming the product.
    #[error("'{name}' is no longer available for purchase")]
    ProductUnavailable { name: String },

    /// Live stock does not cover the requested quantity. Raised on add
    /// (including cumulative top-ups) and again by checkout re-validation.
    #[error("Insufficient stock for '{name}': available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Checkout was attempted against an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The (user, product) cart line does not exist.
    #[error("Product {0} is not in the cart")]
    CartItemNotFound(String),

    /// The user already has a seller profile or a pending application.
    #[error("A seller profile or application already exists for this user")]
    DuplicateSellerProfile,

    /// The requested seller status change is not in the transition table.
    #[error("Seller profile is {from:?}, cannot {action:?}")]
    InvalidSellerTransition {
        from: SellerStatus,
        action: SellerAction,
    },

    /// Caller has no seller profile at all.
    #[error("Caller is not a seller")]
    NotASeller,

    /// Caller has a seller profile, but it is not Approved. Deliberately
    /// distinct from [`CoreError::NotASeller`].
    #[error("Seller profile is not approved yet")]
    SellerNotApproved,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level input problems, raised before any business logic runs.
/// The field name is part of the variant so the client can say which
/// input to fix.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
