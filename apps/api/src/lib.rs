//! # bazaar-api: REST surface of the Bazaar marketplace
//!
//! Thin orchestration over bazaar-core (rules) and bazaar-db (storage):
//! every handler is request → auth extractor → repository/core calls →
//! JSON DTO. Errors map onto the taxonomy in [`error::ApiError`].

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod files;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use bazaar_db::Database;

use crate::auth::JwtManager;
use crate::files::FileStore;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub files: Arc<FileStore>,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: AppState) -> Router {
    let uploads_dir = state.files.root().to_path_buf();

    Router::new()
        .route("/health", get(routes::health::check))
        // Auth
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        // Catalog
        .route("/categories", get(routes::categories::list))
        .route(
            "/products",
            get(routes::products::list).post(routes::products::create),
        )
        .route("/products/my", get(routes::products::my))
        .route(
            "/products/{id}",
            get(routes::products::get)
                .put(routes::products::update)
                .delete(routes::products::delete),
        )
        // Image upload (stored files are served below /uploads/products)
        .route("/uploads", post(routes::uploads::product_image))
        // Cart & checkout
        .route("/cart/add", post(routes::cart::add))
        .route("/cart/remove", post(routes::cart::remove))
        .route("/cart/my", get(routes::cart::my))
        .route("/cart/checkout", post(routes::cart::checkout))
        // Orders
        .route("/orders", get(routes::orders::list))
        .route("/orders/{id}", get(routes::orders::get))
        // Profile & seller application
        .route("/profile/me", get(routes::profile::me))
        .route("/profile/become-seller", post(routes::profile::become_seller))
        .route("/profile/reapply", post(routes::profile::reapply))
        // Admin
        .route("/admin/pending-sellers", get(routes::admin::pending_sellers))
        .route(
            "/admin/sellers/{id}/approve",
            post(routes::admin::approve_seller),
        )
        .route(
            "/admin/sellers/{id}/reject",
            post(routes::admin::reject_seller),
        )
        .nest_service("/uploads/products", ServeDir::new(uploads_dir))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
