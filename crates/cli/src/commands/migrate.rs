//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! delivery migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Storefront migrations: `crates/storefront/migrations/`

use secrecy::ExposeSecret;
use sqlx::PgPool;

use delivery_cli::ClientError;
use delivery_cli::config::database_url_from_env;

/// Run storefront database migrations.
pub async fn storefront() -> Result<(), ClientError> {
    let database_url = database_url_from_env()?;

    tracing::info!("Connecting to storefront database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
