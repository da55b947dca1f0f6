//! Configuration for geometry table operations.
//!
//! Names of the catalog objects consulted and of the synthetic columns
//! produced. Every field has a default matching the stock H2GIS/PostGIS
//! installations, so an empty JSON object is a valid configuration.

use crate::dialect::Dialect;
use crate::error::{GeoTableError, Result};
use serde::{Deserialize, Serialize};

/// Geometry table configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialTableConfig {
    /// Catalog view listing geometry columns.
    /// Default: "geometry_columns"
    pub geometry_columns_view: String,

    /// Table holding SRID authority definitions.
    /// Default: "PUBLIC.SPATIAL_REF_SYS"
    pub spatial_ref_sys_table: String,

    /// Name of the sequence column appended by explode.
    /// Default: "EXPLOD_ID"
    pub explode_id_column: String,

    /// Schema assumed for H2 tables without one.
    /// Default: "PUBLIC"
    pub h2_default_schema: String,

    /// Schema assumed for PostGIS tables without one.
    /// Default: "public"
    pub postgis_default_schema: String,
}

impl Default for SpatialTableConfig {
    fn default() -> Self {
        Self {
            geometry_columns_view: "geometry_columns".to_string(),
            spatial_ref_sys_table: "PUBLIC.SPATIAL_REF_SYS".to_string(),
            explode_id_column: "EXPLOD_ID".to_string(),
            h2_default_schema: "PUBLIC".to_string(),
            postgis_default_schema: "public".to_string(),
        }
    }
}

impl SpatialTableConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use geotab_core::SpatialTableConfig;
    ///
    /// let config = SpatialTableConfig::from_json(r#"{"explode_id_column": "PART_ID"}"#).unwrap();
    /// assert_eq!(config.explode_id_column, "PART_ID");
    /// assert_eq!(config.geometry_columns_view, "geometry_columns");
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| GeoTableError::config(format!("invalid spatial table config: {}", e)))
    }

    /// Set the geometry columns view.
    pub fn with_geometry_columns_view(mut self, view: impl Into<String>) -> Self {
        self.geometry_columns_view = view.into();
        self
    }

    /// Set the spatial reference table.
    pub fn with_spatial_ref_sys_table(mut self, table: impl Into<String>) -> Self {
        self.spatial_ref_sys_table = table.into();
        self
    }

    /// Set the explode sequence column name.
    pub fn with_explode_id_column(mut self, column: impl Into<String>) -> Self {
        self.explode_id_column = column.into();
        self
    }

    /// Default schema for `dialect`.
    pub fn default_schema(&self, dialect: Dialect) -> &str {
        match dialect {
            Dialect::H2 => &self.h2_default_schema,
            Dialect::PostGis => &self.postgis_default_schema,
        }
    }
}
