//! Table location parsing and rendering.

use crate::dialect::Dialect;
use crate::error::{GeoTableError, Result};

/// Catalog/schema/table triple identifying a table.
///
/// `catalog` and `schema` may be empty. Names are stored as given; rendering
/// to SQL applies the dialect's quoting rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TableLocation {
    pub catalog: String,
    pub schema: String,
    pub table: String,
}

impl TableLocation {
    /// Create a location with catalog, schema and table.
    pub fn new(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Location of a table without catalog or schema.
    pub fn table(table: impl Into<String>) -> Self {
        Self::new("", "", table)
    }

    /// Location of a table inside a schema.
    pub fn with_schema(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self::new("", schema, table)
    }

    /// Parse `table`, `schema.table` or `catalog.schema.table`.
    ///
    /// Double-quoted parts may contain dots; quotes are removed and doubled
    /// quotes unescaped.
    ///
    /// # Examples
    ///
    /// ```
    /// use geotab_core::TableLocation;
    ///
    /// let loc = TableLocation::parse("gis.public.roads").unwrap();
    /// assert_eq!(loc.catalog, "gis");
    /// assert_eq!(loc.schema, "public");
    /// assert_eq!(loc.table, "roads");
    ///
    /// let quoted = TableLocation::parse("\"my.schema\".roads").unwrap();
    /// assert_eq!(quoted.schema, "my.schema");
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let parts = split_identifier(text)?;
        if parts.iter().any(|p| p.is_empty()) {
            return Err(GeoTableError::invalid_argument(format!(
                "Invalid table location '{}': empty component",
                text
            )));
        }
        match parts.as_slice() {
            [table] => Ok(Self::table(table.clone())),
            [schema, table] => Ok(Self::with_schema(schema.clone(), table.clone())),
            [catalog, schema, table] => Ok(Self::new(catalog.clone(), schema.clone(), table.clone())),
            _ => Err(GeoTableError::invalid_argument(format!(
                "Invalid table location '{}': expected at most catalog.schema.table",
                text
            ))),
        }
    }

    /// Render the location as a SQL table reference for `dialect`.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let mut out = String::new();
        if !self.catalog.is_empty() {
            out.push_str(&dialect.quote_identifier(&self.catalog));
            out.push('.');
        }
        if !self.schema.is_empty() {
            out.push_str(&dialect.quote_identifier(&self.schema));
            out.push('.');
        }
        out.push_str(&dialect.quote_identifier(&self.table));
        out
    }

    /// Case-insensitive comparison of all three parts.
    pub fn eq_ignore_case(&self, other: &TableLocation) -> bool {
        self.catalog.eq_ignore_ascii_case(&other.catalog)
            && self.schema.eq_ignore_ascii_case(&other.schema)
            && self.table.eq_ignore_ascii_case(&other.table)
    }
}

impl std::fmt::Display for TableLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.catalog.is_empty() {
            write!(f, "{}.", self.catalog)?;
        }
        if !self.schema.is_empty() {
            write!(f, "{}.", self.schema)?;
        }
        f.write_str(&self.table)
    }
}

fn split_identifier(text: &str) -> Result<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = text.trim().chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            '.' if !in_quotes => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if in_quotes {
        return Err(GeoTableError::invalid_argument(format!(
            "Invalid table location '{}': unterminated quote",
            text
        )));
    }
    parts.push(current);
    Ok(parts)
}
