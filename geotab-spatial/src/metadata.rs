//! Canonical geometry column metadata.
//!
//! The two catalog dialects describe a geometry column differently:
//!
//! - H2GIS stores an integer type code (`GEOMETRY_TYPE`) next to
//!   `COORD_DIMENSION` and `SRID`. The code already names the Z/M variant.
//! - PostGIS stores a textual base type (`type`) and `coord_dimension`. A
//!   3D point is `POINT` with dimension 3; a measured point is `POINTM` with
//!   dimension 3; `POINT` with dimension 4 is XYZM.
//!
//! Catalog rows are decoded once into [`CatalogRow`] and turned into a
//! [`GeometryMetadata`] by a single canonicalization step.

use crate::geometry_type::{DimensionVariant, GeometryTypeCode};
use geotab_core::{ColumnInfo, Dialect, GeoTableError, Result, Value};

/// Canonical metadata of one geometry column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryMetadata {
    dimension: u8,
    type_code: GeometryTypeCode,
    sfs_type: String,
    geometry_type: String,
    has_z: bool,
    has_m: bool,
    srid: i32,
}

impl Default for GeometryMetadata {
    fn default() -> Self {
        Self {
            dimension: 2,
            type_code: GeometryTypeCode::GEOMETRY,
            sfs_type: "GEOMETRY".to_string(),
            geometry_type: "GEOMETRY".to_string(),
            has_z: false,
            has_m: false,
            srid: 0,
        }
    }
}

impl GeometryMetadata {
    /// Build from an explicit integer type code.
    ///
    /// Z/M flags come from the code alone. An unknown code resolves to the
    /// generic GEOMETRY type and keeps the reported dimension.
    pub fn from_type_code(code: i32, dimension: i32, srid: i32) -> Self {
        match GeometryTypeCode::from_code(code) {
            Some(type_code) if !type_code.is_generic() => Self::from_code(type_code, srid),
            _ => Self {
                dimension: clamp_dimension(dimension),
                srid,
                ..Self::default()
            },
        }
    }

    /// Build from a textual base type name and a coordinate dimension.
    ///
    /// Bare names infer Z (dimension > 2) or ZM (dimension > 3). Names that
    /// already carry a Z/M/ZM suffix keep their suffix and ignore the
    /// dimension. Unknown or missing names resolve to GEOMETRY without Z/M.
    ///
    /// ```
    /// use geotab_spatial::GeometryMetadata;
    ///
    /// let meta = GeometryMetadata::from_type_name(Some("POINT"), 3, 4326);
    /// assert_eq!(meta.geometry_type(), "POINTZ");
    /// assert!(meta.has_z() && !meta.has_m());
    ///
    /// let measured = GeometryMetadata::from_type_name(Some("POINTM"), 3, 4326);
    /// assert_eq!(measured.geometry_type(), "POINTM");
    /// assert!(measured.has_m() && !measured.has_z());
    /// ```
    pub fn from_type_name(type_name: Option<&str>, dimension: i32, srid: i32) -> Self {
        let Some(base) = type_name.and_then(GeometryTypeCode::from_sfs_name) else {
            return Self {
                dimension: clamp_dimension(dimension),
                srid,
                ..Self::default()
            };
        };

        let variant = match base.variant() {
            DimensionVariant::Xy if dimension > 3 => DimensionVariant::Zm,
            DimensionVariant::Xy if dimension > 2 => DimensionVariant::Z,
            declared => declared,
        };
        Self::from_code(base.with_variant(variant), srid)
    }

    fn from_code(type_code: GeometryTypeCode, srid: i32) -> Self {
        let variant = type_code.variant();
        let name = type_code.sfs_name();
        Self {
            dimension: variant.coord_dimension(),
            type_code,
            sfs_type: name.clone(),
            geometry_type: name,
            has_z: variant.has_z(),
            has_m: variant.has_m(),
            srid,
        }
    }

    /// Coordinate dimension (2, 3 or 4).
    pub fn dimension(&self) -> u8 {
        self.dimension
    }

    pub fn type_code(&self) -> GeometryTypeCode {
        self.type_code
    }

    /// OGC SFS type name.
    pub fn sfs_type(&self) -> &str {
        &self.sfs_type
    }

    /// Canonical type name including the dimension suffix, e.g. `POINTZM`.
    pub fn geometry_type(&self) -> &str {
        &self.geometry_type
    }

    pub fn has_z(&self) -> bool {
        self.has_z
    }

    pub fn has_m(&self) -> bool {
        self.has_m
    }

    pub fn srid(&self) -> i32 {
        self.srid
    }

    /// Column type declaration, e.g. `GEOMETRY(POINTZ,4326)`.
    pub fn sql_signature(&self) -> String {
        format!("GEOMETRY({},{})", self.geometry_type, self.srid)
    }

    /// Same metadata with another SRID.
    pub fn with_srid(&self, srid: i32) -> Self {
        Self {
            srid,
            ..self.clone()
        }
    }
}

fn clamp_dimension(dimension: i32) -> u8 {
    dimension.clamp(2, 4) as u8
}

/// A row of the geometry columns view, decoded per dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogRow {
    /// H2GIS: explicit integer type code.
    ExplicitType {
        column: String,
        type_code: i32,
        dimension: i32,
        srid: i32,
    },
    /// PostGIS: base type name, Z/M implied by the dimension.
    ImplicitDimension {
        column: String,
        type_name: Option<String>,
        dimension: i32,
        srid: i32,
    },
}

/// Catalog view column names.
const COL_GEOMETRY_COLUMN: &str = "F_GEOMETRY_COLUMN";
const COL_COORD_DIMENSION: &str = "COORD_DIMENSION";
const COL_SRID: &str = "SRID";
const COL_GEOMETRY_TYPE: &str = "GEOMETRY_TYPE";
const COL_TYPE: &str = "TYPE";

/// Positions of the catalog columns a dialect needs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CatalogLayout {
    dialect: Dialect,
    column: usize,
    dimension: usize,
    srid: usize,
    type_info: usize,
}

impl CatalogLayout {
    /// Locate the catalog columns for `dialect`. Missing columns are a backend problem.
    pub(crate) fn locate(dialect: Dialect, columns: &[ColumnInfo]) -> Result<Self> {
        let find = |name: &str| {
            columns
                .iter()
                .position(|c| c.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    GeoTableError::backend(format!(
                        "geometry columns view has no {} column",
                        name
                    ))
                })
        };
        let type_column = match dialect {
            Dialect::H2 => COL_GEOMETRY_TYPE,
            Dialect::PostGis => COL_TYPE,
        };
        Ok(Self {
            dialect,
            column: find(COL_GEOMETRY_COLUMN)?,
            dimension: find(COL_COORD_DIMENSION)?,
            srid: find(COL_SRID)?,
            type_info: find(type_column)?,
        })
    }

    /// Decode one row. Rows without a column name yield `None`.
    pub(crate) fn decode(&self, row: &[Value]) -> Option<CatalogRow> {
        let column = row.get(self.column)?.as_str()?;
        if column.is_empty() {
            return None;
        }
        let int_at = |idx: usize| {
            row.get(idx)
                .and_then(Value::as_i64)
                .and_then(|v| i32::try_from(v).ok())
                .unwrap_or(0)
        };
        let dimension = int_at(self.dimension);
        let srid = int_at(self.srid);
        Some(match self.dialect {
            Dialect::H2 => CatalogRow::ExplicitType {
                column: column.to_string(),
                type_code: int_at(self.type_info),
                dimension,
                srid,
            },
            Dialect::PostGis => CatalogRow::ImplicitDimension {
                column: column.to_string(),
                type_name: row
                    .get(self.type_info)
                    .and_then(Value::as_str)
                    .map(str::to_string),
                dimension,
                srid,
            },
        })
    }
}

impl CatalogRow {
    /// Column name of this row.
    pub fn column(&self) -> &str {
        match self {
            CatalogRow::ExplicitType { column, .. } | CatalogRow::ImplicitDimension { column, .. } => {
                column
            }
        }
    }

    /// Declared SRID of this row.
    pub fn srid(&self) -> i32 {
        match self {
            CatalogRow::ExplicitType { srid, .. } | CatalogRow::ImplicitDimension { srid, .. } => {
                *srid
            }
        }
    }

    /// Canonical metadata for this row.
    pub fn canonicalize(&self) -> GeometryMetadata {
        match self {
            CatalogRow::ExplicitType {
                type_code,
                dimension,
                srid,
                ..
            } => GeometryMetadata::from_type_code(*type_code, *dimension, *srid),
            CatalogRow::ImplicitDimension {
                type_name,
                dimension,
                srid,
                ..
            } => GeometryMetadata::from_type_name(type_name.as_deref(), *dimension, *srid),
        }
    }

    /// Consume the row into `(column, metadata)`.
    pub fn into_entry(self) -> (String, GeometryMetadata) {
        let metadata = self.canonicalize();
        let column = match self {
            CatalogRow::ExplicitType { column, .. } | CatalogRow::ImplicitDimension { column, .. } => {
                column
            }
        };
        (column, metadata)
    }
}
