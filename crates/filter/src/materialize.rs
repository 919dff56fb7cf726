//! Dictionary materializer: turns a column's dictionary page into the set
//! of candidate values the row group could contain.

use ahash::RandomState;
use common::{ColumnPath, FilterResult};
use hashbrown::HashMap;
use predicate::BoundReference;
use rowgroup::{ColumnChunk, DictionaryStore, Encoding, RowGroupMetadata};
use types::Value;

type Map<K, V> = HashMap<K, V, RandomState>;

/// What the dictionary reveals about one referenced column in this group.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnStatus {
    /// The complete set of distinct non-null values in the group. Empty
    /// when the column holds nothing but nulls. Nulls are never recorded;
    /// the required/optional distinction covers them.
    Dictionary(Vec<Value>),
    /// No usable dictionary: fallback or mixed encodings, or no chunk for
    /// the column in this group.
    NoDictionary,
    /// Column absent from the physical schema.
    Missing,
}

/// Per-call cache of column statuses, keyed by physical path.
///
/// Owned by one `should_read` invocation and dropped on return, so nothing
/// is shared across row groups.
pub struct DictionaryCache<'a> {
    row_group: &'a dyn RowGroupMetadata,
    store: &'a dyn DictionaryStore,
    statuses: Map<ColumnPath, ColumnStatus>,
}

impl<'a> DictionaryCache<'a> {
    pub fn new(row_group: &'a dyn RowGroupMetadata, store: &'a dyn DictionaryStore) -> Self {
        Self {
            row_group,
            store,
            statuses: Map::default(),
        }
    }

    /// Resolve the status for a bound reference, reading the dictionary
    /// page at most once per column per cache lifetime.
    pub fn status(&mut self, reference: &BoundReference) -> FilterResult<&ColumnStatus> {
        static MISSING: ColumnStatus = ColumnStatus::Missing;
        let Some(path) = &reference.column else {
            return Ok(&MISSING);
        };
        if !self.statuses.contains_key(path) {
            let status = self.load(path, reference)?;
            self.statuses.insert(path.clone(), status);
        }
        Ok(&self.statuses[path])
    }

    fn load(&self, path: &ColumnPath, reference: &BoundReference) -> FilterResult<ColumnStatus> {
        let Some(chunk) = self.row_group.column(path) else {
            // The file schema knows the column but this group has no chunk
            // for it; nothing can be concluded.
            return Ok(ColumnStatus::NoDictionary);
        };
        if !chunk.has_only_dictionary_pages() || has_fallback_pages(chunk) {
            return Ok(ColumnStatus::NoDictionary);
        }

        // An entirely-null column may carry an empty page or none at all;
        // either way its non-null value universe is the empty set.
        let entries = match self.store.read(chunk.descriptor())? {
            Some(page) => page.into_entries(),
            None => Vec::new(),
        };

        let mut values: Vec<Value> = Vec::with_capacity(entries.len());
        for entry in entries {
            let value = entry.into_logical(&reference.logical_type)?;
            if !values.iter().any(|v| v.eq_same_type(&value) == Some(true)) {
                values.push(value);
            }
        }
        Ok(ColumnStatus::Dictionary(values))
    }
}

/// True when any page encoding falls outside the dictionary family.
///
/// `Rle` alone does not disqualify a chunk; it encodes levels, not values.
fn has_fallback_pages(chunk: &ColumnChunk) -> bool {
    chunk
        .encodings()
        .iter()
        .any(|e| !e.is_dictionary() && *e != Encoding::Rle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rowgroup::{PhysicalType, PhysicalValue};
    use testsupport::prelude::*;
    use types::LogicalType;

    fn reference(name: &str, logical_type: LogicalType) -> BoundReference {
        BoundReference {
            field_id: 1,
            name: name.to_string(),
            logical_type,
            required: false,
            column: Some(ColumnPath::from_dotted(name)),
        }
    }

    #[test]
    fn dictionary_values_are_decoded_and_deduplicated() {
        let file = TestFile::new().with_dict_column(
            "id",
            PhysicalType::Int32,
            vec![
                PhysicalValue::Int32(3),
                PhysicalValue::Int32(1),
                PhysicalValue::Int32(3),
            ],
        );
        let mut cache = DictionaryCache::new(&file, &file);

        let status = cache.status(&reference("id", LogicalType::Int64)).unwrap();
        assert_eq!(
            *status,
            ColumnStatus::Dictionary(vec![Value::Int64(3), Value::Int64(1)])
        );
    }

    #[test]
    fn fallback_encoding_yields_no_dictionary() {
        let file = TestFile::new().with_plain_column("raw", PhysicalType::ByteArray);
        let mut cache = DictionaryCache::new(&file, &file);

        let status = cache.status(&reference("raw", LogicalType::String)).unwrap();
        assert_eq!(*status, ColumnStatus::NoDictionary);
    }

    #[test]
    fn absent_reference_is_missing() {
        let file = TestFile::new();
        let mut cache = DictionaryCache::new(&file, &file);
        let mut absent = reference("ghost", LogicalType::Int64);
        absent.column = None;

        let status = cache.status(&absent).unwrap();
        assert_eq!(*status, ColumnStatus::Missing);
    }

    #[test]
    fn missing_dictionary_page_reads_as_empty_set() {
        let file = TestFile::new().with_dict_column_no_page("all_nulls", PhysicalType::Int64);
        let mut cache = DictionaryCache::new(&file, &file);

        let status = cache
            .status(&reference("all_nulls", LogicalType::Int64))
            .unwrap();
        assert_eq!(*status, ColumnStatus::Dictionary(Vec::new()));
    }

    #[test]
    fn status_is_memoized_per_column() {
        let file = TestFile::new().with_dict_column(
            "id",
            PhysicalType::Int64,
            vec![PhysicalValue::Int64(7)],
        );
        let mut cache = DictionaryCache::new(&file, &file);
        let r = reference("id", LogicalType::Int64);

        cache.status(&r).unwrap();
        cache.status(&r).unwrap();
        cache.status(&r).unwrap();
        assert_eq!(file.dictionary_reads(), 1);
    }

    #[test]
    fn store_errors_propagate() {
        let file = TestFile::new().with_failing_column("bad", PhysicalType::Int64);
        let mut cache = DictionaryCache::new(&file, &file);

        let err = cache.status(&reference("bad", LogicalType::Int64)).unwrap_err();
        assert!(matches!(err, common::FilterError::Io(_)));
    }
}
