//! Query interface consumed by the spatial operations.
//!
//! Connection pooling, statement caching and placeholder translation are the
//! implementor's business. Statements use `?` placeholders bound positionally
//! from `params`.

use crate::dialect::Dialect;
use crate::error::Result;
use crate::rows::Rows;
use crate::value::Value;

/// Synchronous SQL connection, used by one caller at a time.
pub trait Connection {
    /// Backend dialect.
    fn dialect(&self) -> Dialect;

    /// Run a query and return a cursor over its rows.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Box<dyn Rows + '_>>;

    /// Run a statement that returns no rows. Returns the affected row count.
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64>;
}

impl<C: Connection + ?Sized> Connection for &C {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Box<dyn Rows + '_>> {
        (**self).query(sql, params)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        (**self).execute(sql, params)
    }
}
