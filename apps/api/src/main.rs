//! # Bazaar API Server
//!
//! Startup sequence: tracing → config → database (+migrations) → admin
//! bootstrap → router → serve with graceful shutdown.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use bazaar_api::auth::{hash_password, JwtManager};
use bazaar_api::config::ApiConfig;
use bazaar_api::files::FileStore;
use bazaar_api::{create_app, AppState};
use bazaar_core::{Role, User};
use bazaar_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bazaar API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        port = config.http_port,
        db_path = %config.database_path,
        "Configuration loaded"
    );

    // The SQLite driver creates the file, not its parent directories.
    if let Some(parent) = Path::new(&config.database_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Connect to the database (runs migrations)
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Database ready");

    // Bootstrap the admin account if absent
    bootstrap_admin(&db, &config).await?;

    // Build shared state
    let state = AppState {
        db,
        jwt: Arc::new(JwtManager::new(
            config.jwt_secret.clone(),
            config.jwt_lifetime_secs,
        )),
        files: Arc::new(FileStore::new(&config.upload_dir)),
    };

    // Build and serve the application
    let app = create_app(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Creates the admin account on first start.
async fn bootstrap_admin(
    db: &Database,
    config: &ApiConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if db.users().get_by_email(&config.admin_email).await?.is_some() {
        return Ok(());
    }

    let admin = User {
        id: Uuid::new_v4().to_string(),
        email: config.admin_email.clone(),
        full_name: "Administrator".to_string(),
        password_hash: hash_password(&config.admin_password)?,
        created_at: Utc::now(),
    };

    db.users().insert(&admin).await?;
    db.users().add_role(&admin.id, Role::Admin).await?;

    info!(email = %config.admin_email, "Bootstrapped admin account");
    Ok(())
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            info!("received SIGTERM, starting graceful shutdown");
        }
    }
}
