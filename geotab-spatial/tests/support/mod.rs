//! Shared harness for geotab-spatial integration tests.
//!
//! Catalog fixtures for both dialects, a scripted table store that answers
//! `ALTER TABLE` by updating the catalog, and a span capture layer.

// Each integration test crate uses a different subset of these helpers.
#![allow(dead_code)]

pub mod span_capture;

use geotab_core::{
    ColumnInfo, Dialect, MemoryConnection, MemoryRows, SpatialValue, TableLocation, Value,
};
use std::cell::RefCell;
use std::rc::Rc;

/// One geometry column entry of a catalog fixture.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub table: String,
    pub column: String,
    pub dimension: i64,
    pub srid: i64,
    /// H2: integer code as text (e.g. "1001"); PostGIS: base type name.
    pub type_info: String,
}

impl CatalogEntry {
    pub fn new(table: &str, column: &str, dimension: i64, srid: i64, type_info: &str) -> Self {
        Self {
            table: table.to_string(),
            column: column.to_string(),
            dimension,
            srid,
            type_info: type_info.to_string(),
        }
    }
}

/// Geometry columns view rows in the shape `dialect` reports them.
pub fn catalog_rows(dialect: Dialect, entries: &[CatalogEntry]) -> MemoryRows {
    let (names, type_column, type_name): (&[&str; 6], &str, &str) = match dialect {
        Dialect::H2 => (
            &[
                "F_TABLE_CATALOG",
                "F_TABLE_SCHEMA",
                "F_TABLE_NAME",
                "F_GEOMETRY_COLUMN",
                "COORD_DIMENSION",
                "SRID",
            ],
            "GEOMETRY_TYPE",
            "INTEGER",
        ),
        Dialect::PostGis => (
            &[
                "f_table_catalog",
                "f_table_schema",
                "f_table_name",
                "f_geometry_column",
                "coord_dimension",
                "srid",
            ],
            "type",
            "varchar",
        ),
    };
    let mut columns: Vec<ColumnInfo> = names
        .iter()
        .map(|n| ColumnInfo::new(*n, "VARCHAR"))
        .collect();
    columns.push(ColumnInfo::new(type_column, type_name));

    let mut rows = MemoryRows::new(columns);
    for entry in entries {
        let type_value = match dialect {
            Dialect::H2 => Value::Int(entry.type_info.parse().unwrap_or(0)),
            Dialect::PostGis => Value::from(entry.type_info.as_str()),
        };
        rows.push(vec![
            Value::from("DB"),
            Value::from(dialect.fold_case("public")),
            Value::from(entry.table.as_str()),
            Value::from(entry.column.as_str()),
            Value::Int(entry.dimension),
            Value::Int(entry.srid),
            type_value,
        ]);
    }
    rows
}

/// Catalog view answering by the bound table and column parameters.
pub fn catalog_connection(dialect: Dialect, entries: Vec<CatalogEntry>) -> MemoryConnection {
    let entries = Rc::new(RefCell::new(entries));
    scripted_catalog(MemoryConnection::new(dialect), dialect, entries)
}

/// Register a geometry columns handler filtering `entries` on the bound
/// table name and, when present, column name.
pub fn scripted_catalog(
    conn: MemoryConnection,
    dialect: Dialect,
    entries: Rc<RefCell<Vec<CatalogEntry>>>,
) -> MemoryConnection {
    conn.on("geometry_columns", move |sql, params| {
        let upper = |v: &Value| v.as_str().map(str::to_uppercase).unwrap_or_default();
        let mut params = params.iter();
        if sql.contains("f_table_catalog") {
            params.next();
        }
        if sql.contains("f_table_schema") {
            params.next();
        }
        let table = params.next().map(upper).unwrap_or_default();
        let column = params.next().map(upper);
        let matching: Vec<CatalogEntry> = entries
            .borrow()
            .iter()
            .filter(|e| e.table.to_uppercase() == table)
            .filter(|e| column.as_ref().map_or(true, |c| e.column.to_uppercase() == *c))
            .cloned()
            .collect();
        Ok(catalog_rows(dialect, &matching))
    })
}

/// A point value.
pub fn point(x: f64, y: f64, srid: i32) -> Value {
    SpatialValue::from_wkt(&format!("POINT({} {})", x, y), srid)
        .unwrap()
        .into()
}

/// A geometry parsed from WKT.
pub fn geom(wkt: &str, srid: i32) -> Value {
    SpatialValue::from_wkt(wkt, srid).unwrap().into()
}

pub fn roads() -> TableLocation {
    TableLocation::table("ROADS")
}
