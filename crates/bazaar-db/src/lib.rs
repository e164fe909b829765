//! # bazaar-db: Database Layer for the Bazaar Marketplace
//!
//! All persistence lives here: the SQLite pool, embedded migrations, and
//! one repository per aggregate. Business rules live in bazaar-core; this
//! crate loads state, lets core decide, and applies the outcome.
//!
//! ## The One Transaction That Matters
//! Checkout ([`repository::order::OrderRepository::checkout`]) is the only
//! multi-row mutation in the system: order insert + per-item conditional
//! stock decrement + cart clear, all-or-nothing.
//!
//! ## Testing
//! `DbConfig::in_memory()` gives an isolated, fully migrated database per
//! test. See `tests/` for the cart and checkout integration suites.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::cart::{CartLineView, CartRepository};
pub use repository::category::CategoryRepository;
pub use repository::order::{CheckoutError, OrderRepository};
pub use repository::product::{ProductListing, ProductRepository};
pub use repository::seller::{PendingSeller, SellerRepository};
pub use repository::user::UserRepository;
