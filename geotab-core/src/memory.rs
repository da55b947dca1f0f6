//! In-memory scripted connection.
//!
//! `MemoryConnection` answers statements from registered handlers instead of
//! a database. A handler is chosen by case-insensitive substring match on the
//! SQL text; the most recently registered match wins, so tests can override
//! a general handler with a more specific one. Every statement is recorded.

use crate::connection::Connection;
use crate::dialect::Dialect;
use crate::error::{GeoTableError, Result};
use crate::rows::{MemoryRows, Rows};
use crate::value::Value;
use std::cell::RefCell;

type Responder = Box<dyn Fn(&str, &[Value]) -> Result<MemoryRows>>;

struct Handler {
    pattern: String,
    respond: Responder,
}

/// A statement seen by a [`MemoryConnection`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Scripted connection for tests and embedders without a database.
pub struct MemoryConnection {
    dialect: Dialect,
    handlers: Vec<Handler>,
    statements: RefCell<Vec<RecordedStatement>>,
}

impl MemoryConnection {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            handlers: Vec::new(),
            statements: RefCell::new(Vec::new()),
        }
    }

    /// Answer statements containing `pattern` with a fixed row set.
    pub fn on_rows(self, pattern: impl Into<String>, rows: MemoryRows) -> Self {
        self.on(pattern, move |_, _| Ok(rows.clone()))
    }

    /// Answer statements containing `pattern` with `respond`.
    pub fn on<F>(mut self, pattern: impl Into<String>, respond: F) -> Self
    where
        F: Fn(&str, &[Value]) -> Result<MemoryRows> + 'static,
    {
        self.handlers.push(Handler {
            pattern: pattern.into().to_uppercase(),
            respond: Box::new(respond),
        });
        self
    }

    /// Statements executed so far, oldest first.
    pub fn statements(&self) -> Vec<RecordedStatement> {
        self.statements.borrow().clone()
    }

    /// SQL text of every statement executed so far.
    pub fn sql_log(&self) -> Vec<String> {
        self.statements
            .borrow()
            .iter()
            .map(|s| s.sql.clone())
            .collect()
    }

    fn dispatch(&self, sql: &str, params: &[Value]) -> Result<MemoryRows> {
        self.statements.borrow_mut().push(RecordedStatement {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        let upper = sql.to_uppercase();
        let handler = self
            .handlers
            .iter()
            .rev()
            .find(|h| upper.contains(&h.pattern))
            .ok_or_else(|| GeoTableError::backend(format!("no handler for statement: {}", sql)))?;
        (handler.respond)(sql, params)
    }
}

impl Connection for MemoryConnection {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Box<dyn Rows + '_>> {
        Ok(Box::new(self.dispatch(sql, params)?))
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let rows = self.dispatch(sql, params)?;
        Ok(rows.remaining() as u64)
    }
}

impl std::fmt::Debug for MemoryConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryConnection")
            .field("dialect", &self.dialect)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::ColumnInfo;

    #[test]
    fn test_latest_matching_handler_wins() {
        let conn = MemoryConnection::new(Dialect::H2)
            .on_rows("select", MemoryRows::new(vec![ColumnInfo::new("A", "INTEGER")]))
            .on_rows(
                "from roads",
                MemoryRows::new(vec![ColumnInfo::new("B", "INTEGER")]),
            );

        let rows = conn.query("SELECT * FROM roads", &[]).unwrap();
        assert_eq!(rows.columns()[0].name, "B");

        let rows = conn.query("SELECT 1", &[]).unwrap();
        assert_eq!(rows.columns()[0].name, "A");
    }

    #[test]
    fn test_unmatched_statement_is_backend_error() {
        let conn = MemoryConnection::new(Dialect::PostGis);
        let err = conn.query("SELECT 1", &[]).err().unwrap();
        assert!(matches!(err, GeoTableError::Backend(_)));
    }

    #[test]
    fn test_statements_are_recorded() {
        let conn = MemoryConnection::new(Dialect::H2)
            .on_rows("ALTER", MemoryRows::default());
        conn.execute("ALTER TABLE t", &[Value::Int(1)]).unwrap();
        assert_eq!(
            conn.statements(),
            vec![RecordedStatement {
                sql: "ALTER TABLE t".into(),
                params: vec![Value::Int(1)],
            }]
        );
    }
}
