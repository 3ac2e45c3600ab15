use crate::config::DatabaseConfig;
use crate::db::db_pool::DuckDBConnectionManager;
use crate::error::PipelineError;
use r2d2::{ManageConnection, Pool};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

// r2d2 needs some checkout deadline; this one is never reached in practice
const CHECKOUT_WAIT: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Holds one cached connection per configured database.
///
/// Connections are opened the first time a database is selected and live
/// until the registry is dropped. Each pool is capped at a single
/// connection, so requests against the same database take turns on it.
pub struct ConnectionRegistry {
    databases: Vec<DatabaseConfig>,
    pools: Mutex<HashMap<String, Pool<DuckDBConnectionManager>>>,
}

impl ConnectionRegistry {
    pub fn new(databases: Vec<DatabaseConfig>) -> Self {
        Self {
            databases,
            pools: Mutex::new(HashMap::new()),
        }
    }

    pub fn databases(&self) -> &[DatabaseConfig] {
        &self.databases
    }

    pub fn contains(&self, id: &str) -> bool {
        self.databases.iter().any(|db| db.id == id)
    }

    /// Returns the cached handle for `id`, connecting on first use.
    pub fn pool(&self, id: &str) -> Result<Pool<DuckDBConnectionManager>, PipelineError> {
        let mut pools = self.pools.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(pool) = pools.get(id) {
            debug!("Reusing cached connection for database '{}'", id);
            return Ok(pool.clone());
        }

        let database = self
            .databases
            .iter()
            .find(|db| db.id == id)
            .ok_or_else(|| PipelineError::Connection(format!("Unknown database: {}", id).into()))?;

        info!(
            "Opening database '{}' at {}{}",
            database.id,
            database.path,
            if database.read_only { " (read-only)" } else { "" }
        );
        let manager = DuckDBConnectionManager::new(database.path.clone(), database.read_only);
        let pool = single_connection_pool(manager).map_err(|e| PipelineError::Connection(Box::new(e)))?;

        pools.insert(id.to_string(), pool.clone());
        Ok(pool)
    }
}

/// One long-lived connection. Callers queue for it without a deadline and
/// get it back without a validity query.
fn single_connection_pool<M: ManageConnection>(manager: M) -> Result<Pool<M>, r2d2::Error> {
    Pool::builder()
        .max_size(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connection_timeout(CHECKOUT_WAIT)
        .test_on_check_out(false)
        .build(manager)
}
