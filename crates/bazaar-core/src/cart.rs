//! # Cart Rules and Checkout Planning
//!
//! Pure decision logic for the cart subsystem. The database layer loads
//! state, these functions decide what should happen, and the database layer
//! applies the outcome. Nothing here touches I/O.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cart Decision Points                                │
//! │                                                                         │
//! │  add(user, product, qty)                                               │
//! │    ├── qty ≤ 0?                → ValidationError                       │
//! │    ├── product gone/hidden?    → ProductNotFound                       │
//! │    ├── existing + qty > stock? → InsufficientStock   (ensure_stock)    │
//! │    └── else upsert line, refresh price snapshot                        │
//! │                                                                         │
//! │  remove(user, product, qty?)                                           │
//! │    ├── no line?                            → CartItemNotFound          │
//! │    ├── qty absent / ≤0 / ≥ line quantity?  → delete   (remove_outcome) │
//! │    └── else                                → decrement                 │
//! │                                                                         │
//! │  checkout(user)                                                        │
//! │    └── plan_checkout: re-validate every line, freeze snapshots,        │
//! │        sum the total. All-or-nothing; first failure aborts.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartItem, Product};

// =============================================================================
// Stock Check
// =============================================================================

/// Verifies that the live stock covers the requested total quantity.
///
/// `requested_total` is the would-be line quantity after the add, i.e. the
/// existing line quantity plus the increment. Two adds of 2+2 against a
/// stock of 3 fail here on the second call.
pub fn ensure_stock(product: &Product, requested_total: i64) -> CoreResult<()> {
    if product.can_supply(requested_total) {
        Ok(())
    } else {
        Err(CoreError::InsufficientStock {
            name: product.name.clone(),
            available: product.stock,
            requested: requested_total,
        })
    }
}

// =============================================================================
// Remove Semantics
// =============================================================================

/// What a remove request should do to an existing cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Delete the whole line.
    Delete,
    /// Keep the line with this (still positive) quantity.
    Decrement(i64),
}

/// Decides the outcome of remove(user, product, quantity?).
///
/// A missing, zero, or negative quantity means "remove the line"; so does
/// any quantity at or above the current line quantity. Anything else is a
/// partial decrement.
pub fn remove_outcome(line_quantity: i64, requested: Option<i64>) -> RemoveOutcome {
    match requested {
        None => RemoveOutcome::Delete,
        Some(q) if q <= 0 || q >= line_quantity => RemoveOutcome::Delete,
        Some(q) => RemoveOutcome::Decrement(line_quantity - q),
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Cart total: Σ(snapshot unit price × quantity) over all lines.
pub fn cart_total(lines: &[CartItem]) -> Money {
    lines.iter().map(CartItem::line_total).sum()
}

// =============================================================================
// Checkout Planning
// =============================================================================

/// A frozen order line, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedOrderItem {
    pub product_id: String,
    pub name_snapshot: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
}

impl PlannedOrderItem {
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents) * self.quantity
    }
}

/// The outcome of a successful checkout validation: everything the storage
/// layer needs to create the order in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPlan {
    pub items: Vec<PlannedOrderItem>,
    pub total: Money,
}

/// Validates a cart against live product state and builds a checkout plan.
///
/// ## Rules
/// - Empty cart → [`CoreError::EmptyCart`]
/// - A line whose product row disappeared → [`CoreError::ProductNotFound`]
/// - A line whose product is unpublished → [`CoreError::ProductUnavailable`]
///   naming the product
/// - A line whose quantity exceeds live stock → [`CoreError::InsufficientStock`]
///   naming the product
///
/// The first failing line aborts the whole plan; the caller must not apply
/// any partial effect. Item prices come from the cart's snapshots, not the
/// live product price.
pub fn plan_checkout(lines: &[CartItem], products: &[Product]) -> CoreResult<CheckoutPlan> {
    if lines.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let mut items = Vec::with_capacity(lines.len());
    let mut total = Money::zero();

    for line in lines {
        let product = products
            .iter()
            .find(|p| p.id == line.product_id)
            .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

        if !product.is_published {
            return Err(CoreError::ProductUnavailable {
                name: product.name.clone(),
            });
        }

        ensure_stock(product, line.quantity)?;

        total += line.line_total();
        items.push(PlannedOrderItem {
            product_id: line.product_id.clone(),
            name_snapshot: product.name.clone(),
            unit_price_cents: line.unit_price_cents,
            quantity: line.quantity,
        });
    }

    Ok(CheckoutPlan { items, total })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, name: &str, price_cents: i64, stock: i64, published: bool) -> Product {
        Product {
            id: id.to_string(),
            category_id: "cat-1".to_string(),
            seller_profile_id: "sp-1".to_string(),
            name: name.to_string(),
            description: None,
            price_cents,
            stock,
            image_url: None,
            is_published: published,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(product_id: &str, quantity: i64, unit_price_cents: i64) -> CartItem {
        CartItem {
            id: format!("line-{product_id}"),
            user_id: "u-1".to_string(),
            product_id: product_id.to_string(),
            quantity,
            unit_price_cents,
            added_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_ensure_stock_within_limit() {
        let p = product("p1", "Lamp", 1000, 5, true);
        assert!(ensure_stock(&p, 5).is_ok());
        assert!(ensure_stock(&p, 1).is_ok());
    }

    #[test]
    fn test_ensure_stock_exceeded_names_product() {
        let p = product("p1", "Lamp", 1000, 3, true);
        let err = ensure_stock(&p, 4).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                name,
                available,
                requested,
            } => {
                assert_eq!(name, "Lamp");
                assert_eq!(available, 3);
                assert_eq!(requested, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cumulative_add_against_stock_three() {
        // Two sequential adds of 2 against stock 3: the second must fail.
        let p = product("p1", "Lamp", 1000, 3, true);
        assert!(ensure_stock(&p, 2).is_ok());
        assert!(ensure_stock(&p, 2 + 2).is_err());
    }

    #[test]
    fn test_remove_outcome_rules() {
        assert_eq!(remove_outcome(2, None), RemoveOutcome::Delete);
        assert_eq!(remove_outcome(2, Some(0)), RemoveOutcome::Delete);
        assert_eq!(remove_outcome(2, Some(-1)), RemoveOutcome::Delete);
        assert_eq!(remove_outcome(2, Some(2)), RemoveOutcome::Delete);
        assert_eq!(remove_outcome(2, Some(5)), RemoveOutcome::Delete);
        assert_eq!(remove_outcome(5, Some(2)), RemoveOutcome::Decrement(3));
    }

    #[test]
    fn test_cart_total() {
        let lines = vec![line("p1", 2, 500), line("p2", 1, 1099)];
        assert_eq!(cart_total(&lines), Money::from_cents(2099));
        assert!(cart_total(&[]).is_zero());
    }

    #[test]
    fn test_plan_checkout_empty_cart() {
        assert!(matches!(
            plan_checkout(&[], &[]),
            Err(CoreError::EmptyCart)
        ));
    }

    #[test]
    fn test_plan_checkout_success_totals_match() {
        let products = vec![
            product("p1", "Lamp", 1000, 5, true),
            product("p2", "Rug", 2500, 2, true),
        ];
        // Snapshots deliberately differ from live prices: the plan must use
        // the cart's snapshot values.
        let lines = vec![line("p1", 2, 900), line("p2", 1, 2500)];

        let plan = plan_checkout(&lines, &products).unwrap();
        assert_eq!(plan.items.len(), 2);
        assert_eq!(plan.total.cents(), 2 * 900 + 2500);
        assert_eq!(
            plan.total,
            plan.items.iter().map(PlannedOrderItem::line_total).sum::<Money>()
        );
        assert_eq!(plan.items[0].name_snapshot, "Lamp");
        assert_eq!(plan.items[0].unit_price_cents, 900);
    }

    #[test]
    fn test_plan_checkout_unpublished_product_aborts() {
        let products = vec![
            product("p1", "Lamp", 1000, 5, true),
            product("p2", "Rug", 2500, 2, false),
        ];
        let lines = vec![line("p1", 1, 1000), line("p2", 1, 2500)];

        match plan_checkout(&lines, &products).unwrap_err() {
            CoreError::ProductUnavailable { name } => assert_eq!(name, "Rug"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_plan_checkout_stock_shortfall_aborts() {
        let products = vec![product("p1", "Lamp", 1000, 1, true)];
        let lines = vec![line("p1", 2, 1000)];

        match plan_checkout(&lines, &products).unwrap_err() {
            CoreError::InsufficientStock { name, .. } => assert_eq!(name, "Lamp"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_plan_checkout_missing_product_row() {
        let lines = vec![line("p-gone", 1, 1000)];
        assert!(matches!(
            plan_checkout(&lines, &[]),
            Err(CoreError::ProductNotFound(_))
        ));
    }
}
