//! The `GeometryTables` handle.
//!
//! Operations are grouped by concern in sibling modules, each adding an
//! `impl` block to this type.

use geotab_core::{Connection, Dialect, Result, Rows, SpatialTableConfig, TableLocation, Value};

/// Geometry table operations over a borrowed connection.
pub struct GeometryTables<'c, C: Connection + ?Sized> {
    conn: &'c C,
    config: SpatialTableConfig,
}

impl<'c, C: Connection + ?Sized> GeometryTables<'c, C> {
    /// Create a handle with the default configuration.
    pub fn new(conn: &'c C) -> Self {
        Self::with_config(conn, SpatialTableConfig::default())
    }

    pub fn with_config(conn: &'c C, config: SpatialTableConfig) -> Self {
        Self { conn, config }
    }

    pub fn config(&self) -> &SpatialTableConfig {
        &self.config
    }

    pub fn connection(&self) -> &'c C {
        self.conn
    }

    pub fn dialect(&self) -> Dialect {
        self.conn.dialect()
    }

    /// SQL reference to `location` in the connection's dialect.
    pub(crate) fn table_sql(&self, location: &TableLocation) -> String {
        location.to_sql(self.dialect())
    }

    pub(crate) fn quote(&self, identifier: &str) -> String {
        self.dialect().quote_identifier(identifier)
    }

    pub(crate) fn query(&self, sql: &str, params: &[Value]) -> Result<Box<dyn Rows + 'c>> {
        tracing::debug!(dialect = %self.dialect(), sql, params = params.len(), "query");
        let conn: &'c C = self.conn;
        conn.query(sql, params)
    }

    pub(crate) fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        tracing::debug!(dialect = %self.dialect(), sql, params = params.len(), "execute");
        self.conn.execute(sql, params)
    }

    /// First value of the first row, `Value::Null` when there is no row.
    pub(crate) fn query_scalar(&self, sql: &str, params: &[Value]) -> Result<Value> {
        let mut rows = self.query(sql, params)?;
        Ok(rows
            .next_row()?
            .and_then(|row| row.into_iter().next())
            .unwrap_or_default())
    }
}

impl<C: Connection + ?Sized> std::fmt::Debug for GeometryTables<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryTables")
            .field("dialect", &self.dialect())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotab_core::{ColumnInfo, MemoryConnection, MemoryRows};

    #[test]
    fn test_query_scalar() {
        let conn = MemoryConnection::new(Dialect::H2)
            .on_rows(
                "SELECT 1",
                MemoryRows::new(vec![ColumnInfo::new("X", "INTEGER")]).with_row(vec![Value::Int(1)]),
            )
            .on_rows("SELECT 2", MemoryRows::new(vec![ColumnInfo::new("X", "INTEGER")]));
        let tables = GeometryTables::new(&conn);
        assert_eq!(tables.query_scalar("SELECT 1", &[]).unwrap(), Value::Int(1));
        assert_eq!(tables.query_scalar("SELECT 2", &[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_table_sql_uses_dialect() {
        let conn = MemoryConnection::new(Dialect::PostGis);
        let tables = GeometryTables::new(&conn);
        assert_eq!(
            tables.table_sql(&TableLocation::with_schema("public", "roads")),
            "public.roads"
        );
        assert_eq!(tables.quote("Geom"), "\"Geom\"");
    }
}
