//! Database migration command.
//!
//! Applies the migrations embedded from `crates/api/migrations/` to the CRM
//! database. The API binary never runs migrations itself; this command is
//! the only writer of schema changes.

use sqlx::PgPool;

use super::{CommandError, database_url};

/// Run the CRM database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration cannot be applied.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to CRM database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
