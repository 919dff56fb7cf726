//! Test support utilities for the row-group filter workspace.
//!
//! This crate provides the in-memory stand-ins for the file reader's
//! collaborator seams, common fixtures and value builders, property-based
//! generators, a row-scan reference evaluator for soundness checks, and
//! custom assertion helpers.
//!
//! # Example Usage
//!
//! ```
//! use testsupport::prelude::*;
//! use rowgroup::{PhysicalType, PhysicalValue};
//!
//! let file = TestFile::new()
//!     .with_dict_column("id", PhysicalType::Int64, vec![PhysicalValue::Int64(30)]);
//! assert!(file.dictionary_reads() == 0);
//! ```

pub mod assertions;
pub mod fixtures;
pub mod proptest_generators;
pub mod scan;

/// Convenient re-exports for common testing patterns.
pub mod prelude {
    pub use crate::assertions::*;
    pub use crate::fixtures::*;
    pub use crate::scan::*;
}
