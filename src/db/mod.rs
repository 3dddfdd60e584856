//! Database module providing connection management and queries.

pub mod attachments;
pub mod test_phases;
pub mod test_runs;

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Database connection pool wrapper around a SeaORM connection.
#[derive(Clone)]
pub struct DbPool {
    conn: Arc<DatabaseConnection>,
}

impl DbPool {
    /// Connect to the database described by the configuration.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = ConnectOptions::new(&config.database_url);
        options
            .max_connections(20)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        Ok(DbPool {
            conn: Arc::new(conn),
        })
    }

    /// Wrap an existing connection (used by tests with a mock backend).
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        DbPool {
            conn: Arc::new(conn),
        }
    }

    /// Get access to the underlying connection for executing queries.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}
