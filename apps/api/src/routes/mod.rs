//! REST route handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod profile;
pub mod uploads;
