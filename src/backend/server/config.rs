/**
 * Server Configuration
 *
 * Chooses the store backing the server.
 *
 * With `database_url` set the server connects to PostgreSQL and runs the
 * embedded migrations. Without it, or when the connection fails, the server
 * keeps running on an in-memory store and says so in the log.
 */

use std::sync::Arc;

use sqlx::PgPool;

use crate::backend::store::{BlogStore, MemoryStore, PgStore};
use crate::shared::AppConfig;

/// Database configuration result
///
/// `None` if the database is not configured or not reachable.
pub type DatabaseConfig = Option<PgPool>;

/// Connect to PostgreSQL and run migrations
///
/// Errors are logged and turned into `None`.
pub async fn load_database(config: &AppConfig) -> DatabaseConfig {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Comments will be kept in memory only.");
        return None;
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing with the existing schema");
        }
    }

    Some(pool)
}

/// Build the store for this process
///
/// In production a missing database is fatal, since an in-memory store would
/// silently drop every comment on restart.
pub async fn load_store(config: &AppConfig) -> Result<Arc<dyn BlogStore>, String> {
    match load_database(config).await {
        Some(pool) => Ok(Arc::new(PgStore::new(pool))),
        None if config.is_production() => {
            Err("a reachable DATABASE_URL is required in production".to_string())
        }
        None => {
            tracing::warn!("Using the in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
