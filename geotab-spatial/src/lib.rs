//! Geometry column metadata, extents and collection explode.
//!
//! Everything is reached through [`GeometryTables`], a handle over a
//! [`Connection`](geotab_core::Connection):
//!
//! - metadata resolution against the H2GIS or PostGIS geometry columns view,
//!   canonicalized into [`GeometryMetadata`]
//! - geometry column discovery from declared column types
//! - extent aggregation with SRID consistency ([`Envelope`])
//! - SRID lookup and rewriting, spatial index detection
//! - [`ExplodeCursor`], flattening collections into one row per member
//!
//! # Example
//!
//! ```
//! use geotab_core::{ColumnInfo, Dialect, MemoryConnection, MemoryRows, TableLocation, Value};
//! use geotab_spatial::GeometryTables;
//!
//! let catalog = MemoryRows::new(vec![
//!     ColumnInfo::new("f_geometry_column", "name"),
//!     ColumnInfo::new("coord_dimension", "int4"),
//!     ColumnInfo::new("srid", "int4"),
//!     ColumnInfo::new("type", "varchar"),
//! ])
//! .with_row(vec![Value::from("geom"), Value::Int(3), Value::Int(4326), Value::from("POINT")]);
//! let conn = MemoryConnection::new(Dialect::PostGis).on_rows("geometry_columns", catalog);
//!
//! let tables = GeometryTables::new(&conn);
//! let meta = tables.column_metadata(&TableLocation::table("roads"), "geom").unwrap();
//! assert_eq!(meta.sql_signature(), "GEOMETRY(POINTZ,4326)");
//! ```

mod catalog;
pub mod columns;
pub mod envelope;
pub mod explode;
mod extent;
pub mod geometry_type;
mod index;
pub mod metadata;
mod resolver;
mod srid;
mod tables;

pub use envelope::{Envelope, EnvelopeAccumulator};
pub use explode::{flatten, CursorState, ExplodeCursor};
pub use geometry_type::{DimensionVariant, GeometryKind, GeometryTypeCode, SfsTypeEntry, SFS_TYPES};
pub use metadata::{CatalogRow, GeometryMetadata};
pub use tables::GeometryTables;
