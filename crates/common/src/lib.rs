use std::{fmt, io};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier for a logical field within a table schema.
/// Examples:
/// - `let id_field: FieldId = 1; // maps to "id"`
/// - `let ts_field: FieldId = 12; // maps to "event_time"`
pub type FieldId = u32;

/// Path addressing a column in the physical column tree.
///
/// Flat files use single-segment paths; nested columns chain segments.
/// Examples:
/// - `ColumnPath::from_dotted("id")`
/// - `ColumnPath::from_dotted("address.zip")`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnPath(Vec<String>);

impl ColumnPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn from_dotted(path: &str) -> Self {
        Self(path.split('.').map(str::to_string).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for ColumnPath {
    fn from(path: &str) -> Self {
        ColumnPath::from_dotted(path)
    }
}

/// Canonical error type shared across the filter subsystems.
///
/// Missing *information* (no dictionary, absent column) is never an error;
/// only caller contract violations and store I/O failures surface here.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("missing field: '{0}'")]
    MissingField(String),
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    #[error("invalid literal: {0}")]
    InvalidLiteral(String),
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result alias that carries a `FilterError`.
pub type FilterResult<T> = Result<T, FilterError>;

/// Runtime configuration for row-group filtering.
///
/// # Example
/// ```
/// use common::FilterConfig;
///
/// let config = FilterConfig::builder().not_eq_reads_nulls(true).build();
/// assert!(config.not_eq_reads_nulls);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, bon::Builder)]
pub struct FilterConfig {
    /// When set, `notEq` on an optional column whose dictionary holds only
    /// the compared value still reads the group, for consumers that treat
    /// `null != v` as satisfied. The default follows SQL three-valued
    /// semantics and skips.
    #[builder(default = false)]
    pub not_eq_reads_nulls: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            not_eq_reads_nulls: false,
        }
    }
}

/// Convenient re-exports for downstream crates.
pub mod prelude {
    pub use crate::{ColumnPath, FieldId, FilterConfig, FilterError, FilterResult};
    pub use types::{LogicalType, Value};
}
