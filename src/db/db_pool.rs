use duckdb::{AccessMode, Config, Connection};
use r2d2::ManageConnection;

/// Opens DuckDB connections for one configured database.
#[derive(Debug)]
pub struct DuckDBConnectionManager {
    path: String,
    read_only: bool,
}

impl DuckDBConnectionManager {
    pub fn new(path: String, read_only: bool) -> Self {
        Self { path, read_only }
    }
}

impl ManageConnection for DuckDBConnectionManager {
    type Connection = Connection;
    type Error = duckdb::Error;

    fn connect(&self) -> Result<Self::Connection, Self::Error> {
        if self.path == ":memory:" {
            return Connection::open_in_memory();
        }

        let mode = if self.read_only {
            AccessMode::ReadOnly
        } else {
            AccessMode::Automatic
        };
        Connection::open_with_flags(&self.path, Config::default().access_mode(mode)?)
    }

    fn is_valid(&self, conn: &mut Self::Connection) -> Result<(), Self::Error> {
        conn.execute("SELECT 1", [])?;
        Ok(())
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}
