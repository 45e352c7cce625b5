use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend};
use tracing::{debug, error, info, trace};

/// Connects to the database, enabling foreign keys on SQLite.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    trace!("Attempting to connect to database");
    debug!("Database URL: {}", database_url);

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

    if db.get_database_backend() == DbBackend::Sqlite {
        // Cascading deletes of adjustments, results and line items rely on it
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
    }

    Ok(db)
}

pub async fn init_database(db: &DatabaseConnection) -> Result<()> {
    trace!("Entering init_database function");
    info!("Running database migrations");

    match Migrator::up(db, None).await {
        Ok(_) => {
            info!("Database migrations completed successfully");
            debug!("All pending migrations have been applied");
        }
        Err(e) => {
            error!("Failed to run database migrations: {}", e);
            return Err(e.into());
        }
    }

    info!("Database initialization completed successfully!");
    Ok(())
}
