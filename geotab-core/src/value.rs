//! Row values returned by the query interface.
//!
//! Geometry values are held as `geo_types::Geometry<f64>` tagged with the
//! SRID the backend reported. WKT/EWKT parsing goes through the `wkt` crate.

use crate::error::{GeoTableError, Result};
use geo_types::Geometry;

/// A geometry together with its spatial reference id.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialValue {
    pub geometry: Geometry<f64>,
    pub srid: i32,
}

impl SpatialValue {
    pub fn new(geometry: impl Into<Geometry<f64>>, srid: i32) -> Self {
        Self {
            geometry: geometry.into(),
            srid,
        }
    }

    /// Parse plain WKT and attach `srid`.
    pub fn from_wkt(wkt: &str, srid: i32) -> Result<Self> {
        Ok(Self::new(parse_wkt(wkt)?, srid))
    }

    /// Parse EWKT (`SRID=4326;POINT(1 2)`). Plain WKT yields SRID 0.
    pub fn from_ewkt(ewkt: &str) -> Result<Self> {
        let text = ewkt.trim();
        let Some((prefix, wkt)) = text.split_once(';') else {
            return Self::from_wkt(text, 0);
        };
        let srid = prefix
            .trim()
            .strip_prefix("SRID=")
            .or_else(|| prefix.trim().strip_prefix("srid="))
            .and_then(|s| s.trim().parse::<i32>().ok())
            .ok_or_else(|| GeoTableError::WktParse(format!("invalid EWKT prefix: {}", prefix)))?;
        Self::from_wkt(wkt, srid)
    }

    /// Same geometry, different SRID.
    pub fn with_srid(mut self, srid: i32) -> Self {
        self.srid = srid;
        self
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
    Geometry(SpatialValue),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer view; doubles are truncated, numeric text is parsed.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Double(v) => Some(*v as i64),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_geometry(&self) -> Option<&SpatialValue> {
        match self {
            Value::Geometry(g) => Some(g),
            _ => None,
        }
    }
}

impl From<SpatialValue> for Value {
    fn from(value: SpatialValue) -> Self {
        Value::Geometry(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Parse WKT string to geo-types Geometry.
pub fn parse_wkt(wkt: &str) -> Result<Geometry<f64>> {
    use wkt::TryFromWkt;
    Geometry::<f64>::try_from_wkt_str(wkt).map_err(|e| GeoTableError::WktParse(format!("{:?}", e)))
}
