//! Field-level input validation.
//!
//! Handlers call these before touching the store, so malformed input turns
//! into a 400 with a field-specific message instead of a constraint error
//! from SQLite. The database still carries its own NOT NULL / CHECK /
//! UNIQUE constraints as the last line of defense.

use crate::error::ValidationError;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Shared checks
// =============================================================================

/// Trims and requires a non-empty value, capped at `max` characters.
fn bounded_text<'a>(field: &str, value: &'a str, max: usize) -> ValidationResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if value.len() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(value)
}

/// Requires a non-negative amount of cents.
fn non_negative_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// Text fields
// =============================================================================

/// Product names: non-empty, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    bounded_text("name", name, 200).map(|_| ())
}

/// Shop names on seller applications: non-empty, at most 100 characters.
pub fn validate_shop_name(name: &str) -> ValidationResult<()> {
    bounded_text("shopName", name, 100).map(|_| ())
}

/// Email addresses.
///
/// Intentionally shallow: one `@` with something on both sides, a dotted
/// domain, and a sane length. Real deliverability is the mail system's
/// problem, not ours.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = bounded_text("email", email, 254)?;

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }

    Ok(())
}

/// Registration passwords: 8 to 128 characters, no other policy.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < 8 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        });
    }
    if password.len() > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }
    Ok(())
}

// =============================================================================
// Numbers
// =============================================================================

/// Cart quantities: strictly positive, capped at [`MAX_ITEM_QUANTITY`].
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Prices: zero is allowed (free items), negative is not.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    non_negative_cents("price", cents)
}

/// Stock levels: zero is allowed (sold out), negative is not.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Number of distinct cart lines, checked before inserting a new one.
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }
    Ok(())
}

// =============================================================================
// Identifiers
// =============================================================================

/// Entity ids arriving over the wire must parse as UUIDs; garbage ids get
/// a 400 here rather than a confusing 404 from a lookup that could never
/// match.
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    let id = bounded_text(field, id, 64)?;

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_and_shop_names() {
        assert!(validate_product_name("Walnut Desk Lamp").is_ok());
        assert!(validate_product_name("  ").is_err());
        assert!(validate_product_name(&"x".repeat(201)).is_err());

        assert!(validate_shop_name("Corner Shop").is_ok());
        assert!(validate_shop_name("").is_err());
        assert!(validate_shop_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("alex@example.com").is_ok());
        assert!(validate_email(" padded@example.com ").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alex@nodot").is_err());
        assert!(validate_email("alex@.com").is_err());
    }

    #[test]
    fn test_password_length_bounds() {
        assert!(validate_password("correct horse").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_quantity_bounds() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_price_and_stock_allow_zero() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-1).is_err());
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_cart_size_cap() {
        assert!(validate_cart_size(MAX_CART_ITEMS - 1).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS).is_err());
    }

    #[test]
    fn test_uuid_ids() {
        assert!(validate_uuid("productId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("productId", "").is_err());
        assert!(validate_uuid("productId", "not-a-uuid").is_err());
    }
}
