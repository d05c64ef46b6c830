//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! orderdesk-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `ORDERDESK_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Order migrations live in `crates/api/migrations/` and are embedded into
//! this binary at compile time via `sqlx::migrate!`.

use sqlx::PgPool;

/// Errors that can occur while running migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run order database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the connection
/// fails, or a migration cannot be applied.
pub async fn orders() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ORDERDESK_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrationError::MissingEnvVar("ORDERDESK_DATABASE_URL"))?;

    tracing::info!("Connecting to order database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running order migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Order migrations complete!");
    Ok(())
}
