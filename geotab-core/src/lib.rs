//! Shared substrate for geotab.
//!
//! This crate holds everything the spatial operations need from the outside
//! world, expressed as plain Rust types:
//!
//! - [`connection`]: the [`Connection`] trait (parameterized query execution)
//! - [`rows`]: row cursors ([`Rows`]) and column descriptions
//! - [`value`]: cell values, including SRID-tagged geometries
//! - [`location`]: catalog/schema/table locations
//! - [`dialect`]: the backend flag and identifier rules
//! - [`config`]: catalog object names and output column names
//! - [`memory`]: a scripted in-memory [`Connection`]
//! - [`error`]: error types

pub mod config;
pub mod connection;
pub mod dialect;
pub mod error;
pub mod location;
pub mod memory;
pub mod rows;
pub mod value;

pub use config::SpatialTableConfig;
pub use connection::Connection;
pub use dialect::Dialect;
pub use error::{GeoTableError, Result};
pub use location::TableLocation;
pub use memory::{MemoryConnection, RecordedStatement};
pub use rows::{ColumnInfo, MemoryRows, Rows, GEOMETRY_TYPE_NAME};
pub use value::{parse_wkt, SpatialValue, Value};
