//! PedalPlan maintenance runner
//!
//! Entry point for the periodic maintenance job: loads configuration,
//! connects to the database, applies migrations and runs the reservation
//! expiration sweep once. An external scheduler (cron, systemd timer) is
//! expected to invoke this binary on its own cadence.

use tracing::info;

use PedalPlan::{
    config::Settings,
    database::{connection::create_pool, DatabaseService},
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard keeps the rolling-file writer alive
    // until the process exits
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting PedalPlan maintenance run...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = PedalPlan::database::connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        acquire_timeout: std::time::Duration::from_secs(30),
        idle_timeout: Some(std::time::Duration::from_secs(600)),
        max_lifetime: Some(std::time::Duration::from_secs(1800)),
    };
    let db_pool = create_pool(&db_config).await?;

    // Run database migrations
    PedalPlan::database::connection::run_migrations(&db_pool).await?;

    // Initialize services
    let database_service = DatabaseService::new(db_pool.clone());
    let services = ServiceFactory::new(db_pool, database_service, settings)?;

    // Expire overdue pending reservations
    let expired = services.expiration_service.run_once().await?;
    info!(expired = expired, "Maintenance run completed");

    Ok(())
}
