use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing::{debug, error, info, trace};

use crate::cli::commands::serve;

pub async fn migrate_and_serve(database_url: &str, bind_address: &str) -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations and starting server");
    debug!("Database URL: {}", database_url);

    // Apply migrations
    trace!("Attempting to connect to database for migrations");
    let db = match Database::connect(database_url).await {
        Ok(connection) => {
            info!("Successfully connected to database");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    info!("Running database migrations");
    trace!("Executing migration up command");
    match Migrator::up(&db, None).await {
        Ok(_) => {
            info!("Database migrations completed successfully");
            debug!("All pending migrations have been applied");
        }
        Err(e) => {
            error!("Failed to run database migrations: {}", e);
            return Err(e.into());
        }
    }

    serve(database_url, bind_address).await
}
