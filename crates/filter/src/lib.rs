//! Dictionary-based row-group pruning.
//!
//! A [`RowGroupFilter`] decides, per row group, whether any row could
//! satisfy a predicate, using dictionary pages as a complete index of each
//! column's non-null values. `false` is authoritative (skip the group);
//! `true` is conservative (scan it). Uncertainty of any kind, a missing
//! dictionary, a fallback encoding, an absent column, always reads.
//!
//! # Example
//!
//! ```
//! use filter::RowGroupFilter;
//! use predicate::lt;
//! use rowgroup::{PhysicalType, PhysicalValue};
//! use schema::{Field, Schema};
//! use testsupport::prelude::TestFile;
//! use types::{LogicalType, Value};
//!
//! # fn main() -> common::FilterResult<()> {
//! let schema = Schema::try_new(vec![Field::required(1, "id", LogicalType::Int64)])?;
//! let filter = RowGroupFilter::new(schema, lt("id", Value::Int64(30))?);
//!
//! // A group whose `id` dictionary holds only 30..=79 can never match
//! let group = TestFile::new().with_dict_column(
//!     "id",
//!     PhysicalType::Int64,
//!     (30..80).map(PhysicalValue::Int64).collect(),
//! );
//! assert!(!filter.should_read(&group, &group, &group)?);
//! # Ok(())
//! # }
//! ```

mod eval;
mod materialize;
mod ternary;

pub use materialize::{ColumnStatus, DictionaryCache};
pub use ternary::Ternary;

use common::{FilterConfig, FilterResult};
use eval::Evaluator;
use predicate::Predicate;
use rowgroup::{DictionaryStore, PhysicalSchema, RowGroupMetadata};
use schema::Schema;

/// Reusable dictionary filter for one `(schema, predicate)` pair.
///
/// The facade holds no mutable state: binding, materialization, and
/// evaluation all live inside a single `should_read` call, so one instance
/// may serve many row groups, concurrently, as long as each call gets its
/// own inputs.
#[derive(Clone, Debug)]
pub struct RowGroupFilter {
    schema: Schema,
    predicate: Predicate,
    config: FilterConfig,
}

impl RowGroupFilter {
    pub fn new(schema: Schema, predicate: Predicate) -> Self {
        Self::with_config(schema, predicate, FilterConfig::default())
    }

    pub fn with_config(schema: Schema, predicate: Predicate, config: FilterConfig) -> Self {
        Self {
            schema,
            predicate,
            config,
        }
    }

    /// Decide whether the row group behind `row_group`/`store` could hold a
    /// matching row.
    ///
    /// The predicate is re-bound against `physical` on every call since
    /// column layouts differ per file; dictionaries are read lazily, at
    /// most once per referenced column, and released on return.
    ///
    /// # Errors
    ///
    /// Binding failures (`MissingField`, `TypeMismatch`) and dictionary
    /// store I/O errors propagate; missing information never errors, it
    /// reads.
    pub fn should_read(
        &self,
        physical: &dyn PhysicalSchema,
        row_group: &dyn RowGroupMetadata,
        store: &dyn DictionaryStore,
    ) -> FilterResult<bool> {
        let bound = predicate::bind(&self.predicate, &self.schema, physical)?;
        let mut evaluator = Evaluator::new(DictionaryCache::new(row_group, store), &self.config);
        Ok(evaluator.eval(&bound)?.should_read())
    }
}
