use dotenvy::dotenv;
use permit_desk::{
    config::{
        Settings,
        database::{create_connection, create_tables},
    },
    core::sweeper,
    errors::Result,
};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let settings = Settings::load()?;
    info!("Successfully processed application configuration.");

    // 4. Initialize the database
    let db = create_connection(&settings.database_url)
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    create_tables(&db)
        .await
        .inspect(|()| info!("Database tables initialized."))
        .inspect_err(|e| error!("Failed to initialize database tables: {e}"))?;

    // 5. Start the reservation expiry sweeper; it takes over the connection
    let sweep_interval = Duration::from_secs(settings.sweep_interval_secs);
    tokio::spawn(sweeper::run(db, sweep_interval));
    info!(
        interval_secs = settings.sweep_interval_secs,
        "Reservation sweeper started."
    );

    // 6. Run until interrupted
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting.");

    Ok(())
}
