//! In-memory stand-ins for the file reader's collaborator seams.
//!
//! A [`TestFile`] plays physical schema, row-group metadata, and
//! dictionary store at once, so a test passes one value as every argument
//! of `should_read`.

use std::cell::Cell;
use std::io;

use ahash::RandomState;
use common::ColumnPath;
use hashbrown::{HashMap, HashSet};
use rowgroup::{
    ColumnChunk, ColumnDescriptor, DictionaryPage, DictionaryStore, Encoding, PhysicalSchema,
    PhysicalType, PhysicalValue, RowGroupMetadata,
};
use schema::Schema;
use types::{LogicalType, Value};

type Map<K, V> = HashMap<K, V, RandomState>;

/// One synthetic row group with per-column dictionary layout under test
/// control.
#[derive(Default)]
pub struct TestFile {
    chunks: Vec<ColumnChunk>,
    dictionaries: Map<ColumnPath, DictionaryPage>,
    failing: HashSet<ColumnPath, RandomState>,
    reads: Cell<usize>,
}

impl TestFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fully dictionary-encoded column with the given dictionary page.
    pub fn with_dict_column(
        mut self,
        name: &str,
        physical_type: PhysicalType,
        entries: Vec<PhysicalValue>,
    ) -> Self {
        let path = ColumnPath::from_dotted(name);
        let descriptor = ColumnDescriptor::new(path.clone(), physical_type);
        self.chunks.push(ColumnChunk::new(
            descriptor,
            vec![Encoding::RleDictionary, Encoding::Rle],
            true,
        ));
        self.dictionaries.insert(path, DictionaryPage::new(entries));
        self
    }

    /// A dictionary-encoded column for which the store has no page, the
    /// shape an entirely-null column takes.
    pub fn with_dict_column_no_page(mut self, name: &str, physical_type: PhysicalType) -> Self {
        let path = ColumnPath::from_dotted(name);
        let descriptor = ColumnDescriptor::new(path, physical_type);
        self.chunks.push(ColumnChunk::new(
            descriptor,
            vec![Encoding::RleDictionary, Encoding::Rle],
            true,
        ));
        self
    }

    /// A column written without any dictionary.
    pub fn with_plain_column(mut self, name: &str, physical_type: PhysicalType) -> Self {
        let path = ColumnPath::from_dotted(name);
        let descriptor = ColumnDescriptor::new(path, physical_type);
        self.chunks.push(ColumnChunk::new(
            descriptor,
            vec![Encoding::Plain, Encoding::Rle],
            false,
        ));
        self
    }

    /// A column that started dictionary-encoded and fell back to plain
    /// pages midway; its dictionary page exists but is incomplete.
    pub fn with_mixed_column(
        mut self,
        name: &str,
        physical_type: PhysicalType,
        entries: Vec<PhysicalValue>,
    ) -> Self {
        let path = ColumnPath::from_dotted(name);
        let descriptor = ColumnDescriptor::new(path.clone(), physical_type);
        self.chunks.push(ColumnChunk::new(
            descriptor,
            vec![Encoding::RleDictionary, Encoding::Plain, Encoding::Rle],
            false,
        ));
        self.dictionaries.insert(path, DictionaryPage::new(entries));
        self
    }

    /// A dictionary-encoded column whose page read fails with an I/O error.
    pub fn with_failing_column(mut self, name: &str, physical_type: PhysicalType) -> Self {
        let path = ColumnPath::from_dotted(name);
        self = self.with_dict_column_no_page(name, physical_type);
        self.failing.insert(path);
        self
    }

    /// Number of dictionary pages handed out so far, for memoization tests.
    pub fn dictionary_reads(&self) -> usize {
        self.reads.get()
    }
}

impl PhysicalSchema for TestFile {
    fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        let path = ColumnPath::from_dotted(name);
        self.chunks
            .iter()
            .map(|c| c.descriptor())
            .find(|d| *d.path() == path)
    }
}

impl RowGroupMetadata for TestFile {
    fn columns(&self) -> &[ColumnChunk] {
        &self.chunks
    }
}

impl DictionaryStore for TestFile {
    fn read(&self, column: &ColumnDescriptor) -> io::Result<Option<DictionaryPage>> {
        if self.failing.contains(column.path()) {
            return Err(io::Error::other(format!(
                "dictionary page read failed for {}",
                column.path()
            )));
        }
        self.reads.set(self.reads.get() + 1);
        Ok(self.dictionaries.get(column.path()).cloned())
    }
}

/// The physical type a writer would pick for a logical column type.
pub fn physical_type_for(logical: &LogicalType) -> PhysicalType {
    match logical {
        LogicalType::Boolean => PhysicalType::Boolean,
        LogicalType::Int32 | LogicalType::Date => PhysicalType::Int32,
        LogicalType::Int64 | LogicalType::Timestamp => PhysicalType::Int64,
        LogicalType::Float32 => PhysicalType::Float,
        LogicalType::Float64 => PhysicalType::Double,
        LogicalType::String | LogicalType::Binary => PhysicalType::ByteArray,
        LogicalType::Decimal { .. } => PhysicalType::FixedLenByteArray(16),
        LogicalType::Uuid => PhysicalType::FixedLenByteArray(16),
    }
}

/// Encode a non-null logical value the way a writer would store it.
///
/// # Panics
///
/// Panics on `Value::Null`; dictionaries never hold nulls.
pub fn to_physical(value: &Value) -> PhysicalValue {
    match value {
        Value::Boolean(v) => PhysicalValue::Boolean(*v),
        Value::Int32(v) => PhysicalValue::Int32(*v),
        Value::Int64(v) => PhysicalValue::Int64(*v),
        Value::Float32(v) => PhysicalValue::Float(*v),
        Value::Float64(v) => PhysicalValue::Double(*v),
        Value::String(v) => PhysicalValue::Bytes(v.as_bytes().to_vec()),
        Value::Binary(v) => PhysicalValue::Bytes(v.clone()),
        Value::Date(v) => PhysicalValue::Int32(*v),
        Value::Timestamp(v) => PhysicalValue::Int64(*v),
        Value::Decimal { unscaled, .. } => PhysicalValue::Bytes(unscaled.to_be_bytes().to_vec()),
        Value::Uuid(v) => PhysicalValue::Bytes(v.as_bytes().to_vec()),
        Value::Null => panic!("dictionaries never hold nulls"),
    }
}

/// Build a fully dictionary-encoded row group from in-memory rows.
///
/// Each row is a `Vec<Value>` aligned with the schema's field order; the
/// per-column dictionary is the set of distinct non-null values, exactly
/// what a writer would have produced.
pub fn dictionary_file(schema: &Schema, rows: &[Vec<Value>]) -> TestFile {
    let mut file = TestFile::new();
    for (idx, field) in schema.fields().iter().enumerate() {
        let mut distinct: Vec<Value> = Vec::new();
        for row in rows {
            let value = &row[idx];
            if value.is_null() {
                continue;
            }
            if !distinct.iter().any(|v| v.eq_same_type(value) == Some(true)) {
                distinct.push(value.clone());
            }
        }
        let entries = distinct.iter().map(to_physical).collect();
        file = file.with_dict_column(&field.name, physical_type_for(&field.logical_type), entries);
    }
    file
}
