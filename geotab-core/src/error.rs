//! Error types for geometry table operations.

use thiserror::Error;

/// Geometry table errors.
#[derive(Error, Debug)]
pub enum GeoTableError {
    /// A geometry column (or the table holding it) could not be found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Two geometries merged into one envelope carry different SRIDs.
    #[error("The envelope cannot be computed on mixed SRID: expected {expected}, found {found}")]
    InconsistentSrid { expected: i32, found: i32 },

    /// Caller supplied an unusable argument (empty table, negative SRID, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Every extent strategy ran without producing a value.
    #[error("Computation failed: {0}")]
    ComputationFailed(String),

    /// The backend failed to execute a statement. Message is passed through as-is.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Geometry text could not be parsed.
    #[error("WKT parse error: {0}")]
    WktParse(String),
}

impl GeoTableError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn computation_failed(msg: impl Into<String>) -> Self {
        Self::ComputationFailed(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for [`GeoTableError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for geometry table operations.
pub type Result<T> = std::result::Result<T, GeoTableError>;
