//! Geometry column metadata resolution.
//!
//! Table variants read the dialect's geometry columns view and canonicalize
//! each row through [`CatalogRow`](crate::CatalogRow). Row-set variants only
//! see declared column types, so they report default metadata per geometry
//! column.

use crate::columns::geometry_column_indexes;
use crate::metadata::GeometryMetadata;
use crate::tables::GeometryTables;
use geotab_core::{Connection, GeoTableError, Result, Rows, TableLocation};
use indexmap::IndexMap;

impl<C: Connection + ?Sized> GeometryTables<'_, C> {
    /// Metadata of one geometry column. An empty `column` selects the first
    /// catalog entry of the table.
    pub fn column_metadata(&self, location: &TableLocation, column: &str) -> Result<GeometryMetadata> {
        let span = tracing::debug_span!(
            "resolve_metadata",
            table = %location,
            column,
            dialect = %self.dialect()
        );
        let _g = span.enter();

        let filter = (!column.is_empty()).then_some(column);
        let rows = self.catalog_rows(location, filter)?;
        rows.first().map(|row| row.canonicalize()).ok_or_else(|| {
            if column.is_empty() {
                GeoTableError::not_found(format!("no geometry column in table {}", location))
            } else {
                GeoTableError::not_found(format!(
                    "geometry column {} not found in table {}",
                    column, location
                ))
            }
        })
    }

    /// Name and metadata of the first geometry column.
    pub fn first_column_metadata(
        &self,
        location: &TableLocation,
    ) -> Result<(String, GeometryMetadata)> {
        let span = tracing::debug_span!("resolve_metadata", table = %location, first = true);
        let _g = span.enter();

        self.catalog_rows(location, None)?
            .into_iter()
            .next()
            .map(|row| row.into_entry())
            .ok_or_else(|| {
                GeoTableError::not_found(format!("no geometry column in table {}", location))
            })
    }

    /// Metadata of every geometry column, in catalog order. A table without
    /// geometry columns yields an empty map.
    pub fn all_metadata(
        &self,
        location: &TableLocation,
    ) -> Result<IndexMap<String, GeometryMetadata>> {
        let span = tracing::debug_span!(
            "resolve_metadata",
            table = %location,
            columns = tracing::field::Empty
        );
        let _g = span.enter();

        let map: IndexMap<_, _> = self
            .catalog_rows(location, None)?
            .into_iter()
            .map(|row| row.into_entry())
            .collect();
        span.record("columns", map.len());
        Ok(map)
    }

    /// Default metadata for every geometry-typed column of a row set.
    pub fn rows_metadata<R: Rows + ?Sized>(&self, rows: &R) -> IndexMap<String, GeometryMetadata> {
        geometry_column_indexes(rows.columns())
            .into_keys()
            .map(|name| (name, GeometryMetadata::default()))
            .collect()
    }

    /// Default metadata for the first geometry-typed column of a row set.
    pub fn first_rows_metadata<R: Rows + ?Sized>(
        &self,
        rows: &R,
    ) -> Result<(String, GeometryMetadata)> {
        self.rows_metadata(rows)
            .into_iter()
            .next()
            .ok_or_else(|| GeoTableError::not_found("the query doesn't contain any geometry column"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotab_core::{ColumnInfo, Dialect, MemoryConnection, MemoryRows, Value};

    fn h2_catalog() -> MemoryRows {
        MemoryRows::new(vec![
            ColumnInfo::new("F_TABLE_CATALOG", "VARCHAR"),
            ColumnInfo::new("F_TABLE_SCHEMA", "VARCHAR"),
            ColumnInfo::new("F_TABLE_NAME", "VARCHAR"),
            ColumnInfo::new("F_GEOMETRY_COLUMN", "VARCHAR"),
            ColumnInfo::new("COORD_DIMENSION", "INTEGER"),
            ColumnInfo::new("SRID", "INTEGER"),
            ColumnInfo::new("GEOMETRY_TYPE", "INTEGER"),
        ])
    }

    fn h2_row(column: &str, dimension: i64, srid: i64, code: i64) -> Vec<Value> {
        vec![
            Value::from("DB"),
            Value::from("PUBLIC"),
            Value::from("ROADS"),
            Value::from(column),
            Value::Int(dimension),
            Value::Int(srid),
            Value::Int(code),
        ]
    }

    #[test]
    fn test_column_metadata_not_found() {
        let conn = MemoryConnection::new(Dialect::H2).on_rows("geometry_columns", h2_catalog());
        let tables = GeometryTables::new(&conn);
        let err = tables
            .column_metadata(&TableLocation::table("ROADS"), "THE_GEOM")
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_empty_column_takes_first_row() {
        let catalog = h2_catalog()
            .with_row(h2_row("GEOM_A", 3, 4326, 1002))
            .with_row(h2_row("GEOM_B", 2, 2154, 3));
        let conn = MemoryConnection::new(Dialect::H2).on_rows("geometry_columns", catalog);
        let tables = GeometryTables::new(&conn);
        let meta = tables
            .column_metadata(&TableLocation::table("ROADS"), "")
            .unwrap();
        assert_eq!(meta.geometry_type(), "LINESTRINGZ");
        assert_eq!(meta.srid(), 4326);
    }

    #[test]
    fn test_named_column_ignores_other_catalog_rows() {
        // The handler ignores the column filter and returns every row.
        let catalog = h2_catalog()
            .with_row(h2_row("GEOM_A", 3, 4326, 1002))
            .with_row(h2_row("GEOM_B", 2, 2154, 3));
        let conn = MemoryConnection::new(Dialect::H2).on_rows("geometry_columns", catalog);
        let tables = GeometryTables::new(&conn);
        let roads = TableLocation::table("ROADS");

        let meta = tables.column_metadata(&roads, "geom_b").unwrap();
        assert_eq!(meta.geometry_type(), "POLYGON");
        assert_eq!(meta.srid(), 2154);
        assert_eq!(tables.srid(&roads, Some("GEOM_B")).unwrap(), 2154);
        assert_eq!(tables.srid(&roads, Some("MISSING")).unwrap(), 0);

        let err = tables.column_metadata(&roads, "MISSING").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_rows_metadata_defaults() {
        let conn = MemoryConnection::new(Dialect::H2);
        let tables = GeometryTables::new(&conn);
        let rows = MemoryRows::new(vec![
            ColumnInfo::new("ID", "INTEGER"),
            ColumnInfo::geometry("THE_GEOM"),
        ]);
        let map = tables.rows_metadata(&rows);
        assert_eq!(map.len(), 1);
        assert_eq!(map["THE_GEOM"], GeometryMetadata::default());
        assert!(conn.statements().is_empty());
    }
}
