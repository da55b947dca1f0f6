//! Geometry column discovery from declared column types.

use crate::tables::GeometryTables;
use geotab_core::{ColumnInfo, Connection, GeoTableError, Result, Rows, TableLocation};
use indexmap::IndexMap;

/// Geometry-typed columns mapped to their 1-based ordinal, in column order.
pub fn geometry_column_indexes(columns: &[ColumnInfo]) -> IndexMap<String, usize> {
    columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_geometry())
        .map(|(i, c)| (c.name.clone(), i + 1))
        .collect()
}

/// First geometry-typed column and its 1-based ordinal.
pub fn first_geometry_column(columns: &[ColumnInfo]) -> Option<(String, usize)> {
    columns
        .iter()
        .position(ColumnInfo::is_geometry)
        .map(|i| (columns[i].name.clone(), i + 1))
}

impl<C: Connection + ?Sized> GeometryTables<'_, C> {
    /// Columns of `location` without reading any row.
    pub fn table_columns(&self, location: &TableLocation) -> Result<Vec<ColumnInfo>> {
        let sql = format!("SELECT * FROM {} WHERE 1=0", self.table_sql(location));
        let rows = self.query(&sql, &[])?;
        Ok(rows.columns().to_vec())
    }

    pub fn geometry_column_names(&self, location: &TableLocation) -> Result<Vec<String>> {
        Ok(self.geometry_column_indexes(location)?.into_keys().collect())
    }

    /// Geometry column names mapped to 1-based ordinals.
    pub fn geometry_column_indexes(&self, location: &TableLocation) -> Result<IndexMap<String, usize>> {
        Ok(geometry_column_indexes(&self.table_columns(location)?))
    }

    /// First geometry column of `location`. NotFound when there is none.
    pub fn first_geometry_column(&self, location: &TableLocation) -> Result<(String, usize)> {
        first_geometry_column(&self.table_columns(location)?).ok_or_else(|| {
            GeoTableError::not_found(format!("table {} has no geometry column", location))
        })
    }

    pub fn has_geometry_column(&self, location: &TableLocation) -> Result<bool> {
        Ok(first_geometry_column(&self.table_columns(location)?).is_some())
    }

    pub fn rows_geometry_column_names<R: Rows + ?Sized>(&self, rows: &R) -> Vec<String> {
        geometry_column_indexes(rows.columns()).into_keys().collect()
    }

    pub fn rows_geometry_column_indexes<R: Rows + ?Sized>(&self, rows: &R) -> IndexMap<String, usize> {
        geometry_column_indexes(rows.columns())
    }

    pub fn first_rows_geometry_column<R: Rows + ?Sized>(&self, rows: &R) -> Result<(String, usize)> {
        first_geometry_column(rows.columns())
            .ok_or_else(|| GeoTableError::not_found("the query doesn't contain any geometry column"))
    }

    pub fn rows_have_geometry_column<R: Rows + ?Sized>(&self, rows: &R) -> bool {
        first_geometry_column(rows.columns()).is_some()
    }
}
