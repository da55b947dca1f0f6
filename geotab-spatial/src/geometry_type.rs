//! Geometry type taxonomy.
//!
//! Integer codes follow ISO SQL/MM numbering: the seven base kinds are 1..=7
//! (0 is the generic GEOMETRY), and Z, M and ZM variants add 1000, 2000 and
//! 3000 respectively.
//!
//! The canonical SFS names are kept in one static table so that the name →
//! code mapping is expressed once and shared by both catalog dialects.

use std::fmt;

/// Base geometry kind, without coordinate dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum GeometryKind {
    Geometry = 0,
    Point = 1,
    LineString = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
}

impl GeometryKind {
    /// Canonical SFS name of the bare kind.
    pub fn sfs_name(&self) -> &'static str {
        match self {
            GeometryKind::Geometry => "GEOMETRY",
            GeometryKind::Point => "POINT",
            GeometryKind::LineString => "LINESTRING",
            GeometryKind::Polygon => "POLYGON",
            GeometryKind::MultiPoint => "MULTIPOINT",
            GeometryKind::MultiLineString => "MULTILINESTRING",
            GeometryKind::MultiPolygon => "MULTIPOLYGON",
            GeometryKind::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }

    fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            0 => GeometryKind::Geometry,
            1 => GeometryKind::Point,
            2 => GeometryKind::LineString,
            3 => GeometryKind::Polygon,
            4 => GeometryKind::MultiPoint,
            5 => GeometryKind::MultiLineString,
            6 => GeometryKind::MultiPolygon,
            7 => GeometryKind::GeometryCollection,
            _ => return None,
        })
    }
}

/// Coordinate dimension variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionVariant {
    Xy,
    Z,
    M,
    Zm,
}

impl DimensionVariant {
    pub fn from_flags(has_z: bool, has_m: bool) -> Self {
        match (has_z, has_m) {
            (false, false) => DimensionVariant::Xy,
            (true, false) => DimensionVariant::Z,
            (false, true) => DimensionVariant::M,
            (true, true) => DimensionVariant::Zm,
        }
    }

    pub fn has_z(&self) -> bool {
        matches!(self, DimensionVariant::Z | DimensionVariant::Zm)
    }

    pub fn has_m(&self) -> bool {
        matches!(self, DimensionVariant::M | DimensionVariant::Zm)
    }

    /// Suffix appended to the SFS name ("", "Z", "M", "ZM").
    pub fn suffix(&self) -> &'static str {
        match self {
            DimensionVariant::Xy => "",
            DimensionVariant::Z => "Z",
            DimensionVariant::M => "M",
            DimensionVariant::Zm => "ZM",
        }
    }

    /// Number of coordinate components.
    pub fn coord_dimension(&self) -> u8 {
        match self {
            DimensionVariant::Xy => 2,
            DimensionVariant::Z | DimensionVariant::M => 3,
            DimensionVariant::Zm => 4,
        }
    }

    fn offset(&self) -> u16 {
        match self {
            DimensionVariant::Xy => 0,
            DimensionVariant::Z => 1000,
            DimensionVariant::M => 2000,
            DimensionVariant::Zm => 3000,
        }
    }
}

/// Geometry type code: a base kind plus a dimension variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryTypeCode {
    kind: GeometryKind,
    variant: DimensionVariant,
}

impl GeometryTypeCode {
    /// Generic GEOMETRY (code 0).
    pub const GEOMETRY: GeometryTypeCode = GeometryTypeCode {
        kind: GeometryKind::Geometry,
        variant: DimensionVariant::Xy,
    };

    pub fn new(kind: GeometryKind, variant: DimensionVariant) -> Self {
        Self { kind, variant }
    }

    /// Decode an integer code. Unknown codes return `None`.
    ///
    /// ```
    /// use geotab_spatial::{DimensionVariant, GeometryKind, GeometryTypeCode};
    ///
    /// let code = GeometryTypeCode::from_code(3003).unwrap();
    /// assert_eq!(code.kind(), GeometryKind::Polygon);
    /// assert_eq!(code.variant(), DimensionVariant::Zm);
    /// assert_eq!(code.sfs_name(), "POLYGONZM");
    /// ```
    pub fn from_code(code: i32) -> Option<Self> {
        let code = u16::try_from(code).ok()?;
        let variant = match code / 1000 {
            0 => DimensionVariant::Xy,
            1 => DimensionVariant::Z,
            2 => DimensionVariant::M,
            3 => DimensionVariant::Zm,
            _ => return None,
        };
        let kind = GeometryKind::from_code(code % 1000)?;
        Some(Self { kind, variant })
    }

    /// Look up a canonical SFS name such as `MULTIPOLYGONZ`.
    ///
    /// Whitespace and double quotes are ignored and matching is
    /// case-insensitive. `GEOMETRY` and unknown names return `None`.
    pub fn from_sfs_name(name: &str) -> Option<Self> {
        let cleaned: String = name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '"')
            .collect::<String>()
            .to_ascii_uppercase();
        SFS_TYPES
            .iter()
            .find(|entry| entry.name == cleaned)
            .map(|entry| entry.code)
    }

    pub fn code(&self) -> i32 {
        i32::from(self.kind as u16 + self.variant.offset())
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn variant(&self) -> DimensionVariant {
        self.variant
    }

    /// Same kind with another dimension variant.
    pub fn with_variant(&self, variant: DimensionVariant) -> Self {
        Self {
            kind: self.kind,
            variant,
        }
    }

    /// Canonical SFS name including the Z/M suffix.
    pub fn sfs_name(&self) -> String {
        format!("{}{}", self.kind.sfs_name(), self.variant.suffix())
    }

    pub fn is_generic(&self) -> bool {
        self.kind == GeometryKind::Geometry
    }
}

impl Default for GeometryTypeCode {
    fn default() -> Self {
        Self::GEOMETRY
    }
}

impl fmt::Display for GeometryTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.sfs_name())?;
        f.write_str(self.variant.suffix())
    }
}

/// One row of the canonical name table.
#[derive(Debug, Clone, Copy)]
pub struct SfsTypeEntry {
    pub name: &'static str,
    pub code: GeometryTypeCode,
}

const fn entry(name: &'static str, kind: GeometryKind, variant: DimensionVariant) -> SfsTypeEntry {
    SfsTypeEntry {
        name,
        code: GeometryTypeCode { kind, variant },
    }
}

use DimensionVariant::{Xy, Zm, M, Z};
use GeometryKind::{
    GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};

/// Every base kind in every dimension variant.
pub static SFS_TYPES: [SfsTypeEntry; 28] = [
    entry("POINT", Point, Xy),
    entry("LINESTRING", LineString, Xy),
    entry("POLYGON", Polygon, Xy),
    entry("MULTIPOINT", MultiPoint, Xy),
    entry("MULTILINESTRING", MultiLineString, Xy),
    entry("MULTIPOLYGON", MultiPolygon, Xy),
    entry("GEOMETRYCOLLECTION", GeometryCollection, Xy),
    entry("POINTZ", Point, Z),
    entry("LINESTRINGZ", LineString, Z),
    entry("POLYGONZ", Polygon, Z),
    entry("MULTIPOINTZ", MultiPoint, Z),
    entry("MULTILINESTRINGZ", MultiLineString, Z),
    entry("MULTIPOLYGONZ", MultiPolygon, Z),
    entry("GEOMETRYCOLLECTIONZ", GeometryCollection, Z),
    entry("POINTM", Point, M),
    entry("LINESTRINGM", LineString, M),
    entry("POLYGONM", Polygon, M),
    entry("MULTIPOINTM", MultiPoint, M),
    entry("MULTILINESTRINGM", MultiLineString, M),
    entry("MULTIPOLYGONM", MultiPolygon, M),
    entry("GEOMETRYCOLLECTIONM", GeometryCollection, M),
    entry("POINTZM", Point, Zm),
    entry("LINESTRINGZM", LineString, Zm),
    entry("POLYGONZM", Polygon, Zm),
    entry("MULTIPOINTZM", MultiPoint, Zm),
    entry("MULTILINESTRINGZM", MultiLineString, Zm),
    entry("MULTIPOLYGONZM", MultiPolygon, Zm),
    entry("GEOMETRYCOLLECTIONZM", GeometryCollection, Zm),
];
