//! Bounding envelopes with SRID tracking.

use geo::BoundingRect;
use geo_types::{coord, Polygon, Rect};
use geotab_core::{GeoTableError, Result, SpatialValue, Value};

/// Axis-aligned bounding box tagged with an SRID.
///
/// There is no "null" envelope: absence is `Option<Envelope>::None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    srid: i32,
}

impl Envelope {
    /// Corners may be given in any order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, srid: i32) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
            srid,
        }
    }

    pub fn from_rect(rect: Rect<f64>, srid: i32) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y, srid)
    }

    /// Envelope of a geometry value. Empty geometries have none.
    pub fn of(value: &SpatialValue) -> Option<Self> {
        value
            .geometry
            .bounding_rect()
            .map(|rect| Self::from_rect(rect, value.srid))
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn srid(&self) -> i32 {
        self.srid
    }

    /// Smallest envelope covering both. Keeps this envelope's SRID.
    pub fn union(&self, other: &Envelope) -> Envelope {
        Envelope {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
            srid: self.srid,
        }
    }

    pub fn with_srid(self, srid: i32) -> Self {
        Self { srid, ..self }
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_x, y: self.min_y },
            coord! { x: self.max_x, y: self.max_y },
        )
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        self.to_rect().to_polygon()
    }

    /// The envelope as a polygon value carrying its SRID.
    pub fn to_spatial_value(&self) -> SpatialValue {
        SpatialValue::new(self.to_polygon(), self.srid)
    }
}

/// Running union of envelopes that must all share one SRID.
///
/// The first geometry seen fixes the expected SRID, SRID 0 included.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeAccumulator {
    srid: Option<i32>,
    envelope: Option<Envelope>,
}

impl EnvelopeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_srid(&mut self, srid: i32) -> Result<()> {
        match self.srid {
            Some(expected) if expected != srid => Err(GeoTableError::InconsistentSrid {
                expected,
                found: srid,
            }),
            Some(_) => Ok(()),
            None => {
                self.srid = Some(srid);
                Ok(())
            }
        }
    }

    /// Add a geometry's bounding box.
    pub fn add(&mut self, value: &SpatialValue) -> Result<()> {
        self.check_srid(value.srid)?;
        if let Some(env) = Envelope::of(value) {
            self.extend(env);
        }
        Ok(())
    }

    /// Add a cell. Non-geometry values, nulls included, are ignored.
    pub fn add_value(&mut self, value: &Value) -> Result<()> {
        match value.as_geometry() {
            Some(geometry) => self.add(geometry),
            None => Ok(()),
        }
    }

    /// Merge an already computed envelope.
    pub fn merge(&mut self, envelope: Envelope) -> Result<()> {
        self.check_srid(envelope.srid)?;
        self.extend(envelope);
        Ok(())
    }

    fn extend(&mut self, env: Envelope) {
        self.envelope = Some(match self.envelope {
            Some(current) => current.union(&env),
            None => env,
        });
    }

    /// SRID fixed by the first geometry, if any was seen.
    pub fn srid(&self) -> Option<i32> {
        self.srid
    }

    pub fn is_empty(&self) -> bool {
        self.envelope.is_none()
    }

    pub fn finish(self) -> Option<Envelope> {
        self.envelope
    }
}
