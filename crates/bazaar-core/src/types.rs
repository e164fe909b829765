//! # Domain Types
//!
//! Core domain types used throughout the Bazaar marketplace.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     User        │   │    Product      │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  email          │   │  price_cents    │   │  status         │       │
//! │  │  roles (table)  │   │  stock          │   │  total_cents    │       │
//! │  └─────────────────┘   │  is_published   │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │    CartItem     │   │   OrderItem     │       │
//! │  │  name           │   │  price snapshot │   │  frozen snapshot│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Seller profile types live in [`crate::seller`] next to the state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Roles
// =============================================================================

/// Role membership names.
///
/// Buyer is auto-assigned at registration; Seller is granted when an admin
/// approves the seller profile; Admin is assigned out of band (bootstrap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
    Admin,
}

impl Role {
    /// Stable lowercase name, as stored in `user_roles.role` and carried in
    /// token claims.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Role::Buyer),
            "seller" => Ok(Role::Seller),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered account.
///
/// Role memberships are stored in a separate `user_roles` table and loaded
/// alongside the user; the password hash never leaves the backend.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Login identity, unique.
    pub email: String,

    /// Display name.
    pub full_name: String,

    /// Argon2 password hash. Skipped during serialization.
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub password_hash: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Category
// =============================================================================

/// A product category. Immutable at the API surface; seeded by migration.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product listed by a seller.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Category this product belongs to.
    pub category_id: String,

    /// Owning seller profile.
    pub seller_profile_id: String,

    /// Display name shown in listings.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Current stock level, never negative.
    pub stock: i64,

    /// Relative reference into the file store.
    pub image_url: Option<String>,

    /// Unpublished products are invisible to buyers and unpurchasable.
    pub is_published: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks whether the live stock covers the requested quantity.
    pub fn can_supply(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A cart line: one (user, product) pair with a quantity and a price
/// snapshot taken when the line was created or last topped up.
///
/// The snapshot is refreshed to the product's current price on every add.
/// That matches the shipped behavior of the system this replaces; whether a
/// cart should instead keep its original snapshot is an open product
/// question tracked in DESIGN.md.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CartItem {
    pub id: String,
    pub user_id: String,
    pub product_id: String,

    /// Quantity in cart, always positive.
    pub quantity: i64,

    /// Unit price in cents at add/top-up time (snapshot).
    pub unit_price_cents: i64,

    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    /// Returns the snapshot unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total (snapshot unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price() * self.quantity
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// Checkout always creates Pending orders; payment and fulfillment flows
/// that would advance the status are out of scope, so only Pending is
/// reachable in this version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been placed, awaiting payment/fulfillment.
    Pending,
    /// Order has been fulfilled.
    Completed,
    /// Order was cancelled.
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// An immutable order created atomically from a cart at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub status: OrderStatus,

    /// Sum of item snapshot price × quantity, frozen at checkout.
    pub total_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in an order.
/// Uses the snapshot pattern to freeze product data at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,

    /// Product name at checkout time (frozen).
    pub name_snapshot: String,

    /// Unit price in cents at checkout time (frozen, from the cart snapshot).
    pub unit_price_cents: i64,

    /// Quantity purchased.
    pub quantity: i64,
}

impl OrderItem {
    /// Line total (frozen unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents) * self.quantity
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
