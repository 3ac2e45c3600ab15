use crate::error::PipelineError;
use duckdb::Connection;
use serde::Serialize;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescription {
    pub name: String,
    pub data_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDescription {
    pub name: String,
    pub columns: Vec<ColumnDescription>,
}

/// Every table visible to a connection, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaDescription {
    pub tables: Vec<TableDescription>,
}

impl SchemaDescription {
    pub fn table(&self, name: &str) -> Option<&TableDescription> {
        self.tables.iter().find(|t| t.name == name)
    }
}

// Table: tracks
// Columns: id (INTEGER), artist (VARCHAR)
impl fmt::Display for SchemaDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, table) in self.tables.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "Table: {}", table.name)?;
            let columns: Vec<String> = table
                .columns
                .iter()
                .map(|c| format!("{} ({})", c.name, c.data_type))
                .collect();
            write!(f, "Columns: {}", columns.join(", "))?;
        }
        Ok(())
    }
}

/// Lists every table, then describes each one.
///
/// Any failing query fails the whole call; no partial schema is returned.
pub fn describe_schema(conn: &Connection) -> Result<SchemaDescription, PipelineError> {
    let table_names = list_tables(conn).map_err(|e| PipelineError::Schema(Box::new(e)))?;
    debug!("Found {} tables: {:?}", table_names.len(), table_names);

    let mut tables = Vec::with_capacity(table_names.len());
    for name in table_names {
        let columns = describe_table(conn, &name).map_err(|e| PipelineError::Schema(Box::new(e)))?;
        tables.push(TableDescription { name, columns });
    }

    Ok(SchemaDescription { tables })
}

fn list_tables(conn: &Connection) -> duckdb::Result<Vec<String>> {
    let mut stmt = conn.prepare("SHOW TABLES")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect()
}

fn describe_table(conn: &Connection, table: &str) -> duckdb::Result<Vec<ColumnDescription>> {
    let mut stmt = conn.prepare(&format!("DESCRIBE {}", quote_identifier(table)))?;
    let rows = stmt.query_map([], |row| {
        Ok(ColumnDescription {
            name: row.get(0)?,      // column_name
            data_type: row.get(1)?, // column_type
        })
    })?;
    rows.collect()
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
