//! Geometry columns view access.

use crate::metadata::{CatalogLayout, CatalogRow};
use crate::tables::GeometryTables;
use geotab_core::{Connection, Result, TableLocation, Value};

/// Filtered query on the geometry columns view.
///
/// Every filter compares upper-cased catalog values to upper-cased
/// parameters; empty catalog or schema parts are not filtered on.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CatalogQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl CatalogQuery {
    pub(crate) fn build(view: &str, location: &TableLocation, column: Option<&str>) -> Self {
        let mut filters = Vec::with_capacity(4);
        let mut params = Vec::with_capacity(4);
        let mut push = |field: &str, value: &str| {
            filters.push(format!("UPPER({}) = ?", field));
            params.push(Value::Text(value.to_uppercase()));
        };
        if !location.catalog.is_empty() {
            push("f_table_catalog", &location.catalog);
        }
        if !location.schema.is_empty() {
            push("f_table_schema", &location.schema);
        }
        push("f_table_name", &location.table);
        if let Some(column) = column.filter(|c| !c.is_empty()) {
            push("f_geometry_column", column);
        }
        Self {
            sql: format!("SELECT * FROM {} WHERE {}", view, filters.join(" AND ")),
            params,
        }
    }
}

impl<C: Connection + ?Sized> GeometryTables<'_, C> {
    /// Decoded catalog rows for `location`, optionally restricted to one column.
    ///
    /// The column restriction is also checked on the decoded rows, so a view
    /// ignoring the filter cannot hand back another column.
    pub(crate) fn catalog_rows(
        &self,
        location: &TableLocation,
        column: Option<&str>,
    ) -> Result<Vec<CatalogRow>> {
        let query = CatalogQuery::build(&self.config().geometry_columns_view, location, column);
        let mut rows = self.query(&query.sql, &query.params)?;
        let layout = CatalogLayout::locate(self.dialect(), rows.columns())?;
        let column = column.filter(|c| !c.is_empty());
        let mut decoded = Vec::new();
        while let Some(row) = rows.next_row()? {
            match layout.decode(&row) {
                Some(entry) if column.map_or(true, |c| entry.column().eq_ignore_ascii_case(c)) => {
                    decoded.push(entry)
                }
                _ => {}
            }
        }
        Ok(decoded)
    }
}
