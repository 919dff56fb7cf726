//! Physical-side interfaces supplied by the columnar file reader.
//!
//! The filter never opens files itself. It sees a row group through three
//! seams: a [`PhysicalSchema`] resolving field names to column descriptors,
//! [`RowGroupMetadata`] describing per-column encodings, and a
//! [`DictionaryStore`] yielding decoded dictionary pages on demand.

use std::io;

use common::{ColumnPath, FilterError, FilterResult};
use serde::{Deserialize, Serialize};
use types::{LogicalType, Value};
use uuid::Uuid;

/// Storage types as written in the file footer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhysicalType {
    Boolean,
    Int32,
    Int64,
    Float,
    Double,
    ByteArray,
    FixedLenByteArray(usize),
}

impl PhysicalType {
    /// Whether entries of this physical type can convert into the logical
    /// type, per the promotion table in [`PhysicalValue::into_logical`].
    pub fn can_decode_as(self, logical: &LogicalType) -> bool {
        use LogicalType as L;
        use PhysicalType as P;
        matches!(
            (self, logical),
            (P::Boolean, L::Boolean)
                | (P::Int32, L::Int32 | L::Int64 | L::Date | L::Decimal { .. })
                | (P::Int64, L::Int64 | L::Timestamp | L::Decimal { .. })
                | (P::Float, L::Float32 | L::Float64)
                | (P::Double, L::Float64)
                | (
                    P::ByteArray | P::FixedLenByteArray(_),
                    L::String | L::Binary | L::Decimal { .. } | L::Uuid
                )
        )
    }
}

/// Data-page encodings. Any non-dictionary encoding on a data page is a
/// fallback that invalidates dictionary pruning for the column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    Plain,
    PlainDictionary,
    RleDictionary,
    Rle,
    DeltaBinaryPacked,
    DeltaByteArray,
    ByteStreamSplit,
}

impl Encoding {
    pub fn is_dictionary(self) -> bool {
        matches!(self, Encoding::PlainDictionary | Encoding::RleDictionary)
    }
}

/// A physical column as addressed by the reader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    path: ColumnPath,
    physical_type: PhysicalType,
}

impl ColumnDescriptor {
    pub fn new(path: ColumnPath, physical_type: PhysicalType) -> Self {
        Self {
            path,
            physical_type,
        }
    }

    pub fn path(&self) -> &ColumnPath {
        &self.path
    }

    pub fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }
}

/// Per-row-group metadata for one column chunk.
#[derive(Clone, Debug)]
pub struct ColumnChunk {
    descriptor: ColumnDescriptor,
    encodings: Vec<Encoding>,
    dictionary_pages_only: bool,
}

impl ColumnChunk {
    pub fn new(
        descriptor: ColumnDescriptor,
        encodings: Vec<Encoding>,
        dictionary_pages_only: bool,
    ) -> Self {
        Self {
            descriptor,
            encodings,
            dictionary_pages_only,
        }
    }

    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }

    /// Encodings observed across the chunk's pages.
    pub fn encodings(&self) -> &[Encoding] {
        &self.encodings
    }

    /// True iff every data page of the chunk references the dictionary.
    pub fn has_only_dictionary_pages(&self) -> bool {
        self.dictionary_pages_only
    }
}

/// The reader's column tree for one physical file.
///
/// The name-matching rule that maps logical field names onto physical
/// paths is pre-arranged by the reader and lives behind `column`.
pub trait PhysicalSchema {
    fn column(&self, name: &str) -> Option<&ColumnDescriptor>;
}

/// Metadata for one row group, columns in file order.
pub trait RowGroupMetadata {
    fn columns(&self) -> &[ColumnChunk];

    fn column(&self, path: &ColumnPath) -> Option<&ColumnChunk> {
        self.columns().iter().find(|c| c.descriptor.path() == path)
    }
}

/// Read access to a row group's dictionary pages.
pub trait DictionaryStore {
    /// Read and decode the dictionary page for a column. `Ok(None)` means
    /// no dictionary page was written for the column in this group.
    fn read(&self, column: &ColumnDescriptor) -> io::Result<Option<DictionaryPage>>;
}

/// A decoded dictionary page: every distinct non-null value the column's
/// data pages can reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DictionaryPage {
    entries: Vec<PhysicalValue>,
}

impl DictionaryPage {
    pub fn new(entries: Vec<PhysicalValue>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PhysicalValue] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<PhysicalValue> {
        self.entries
    }
}

/// One decoded dictionary entry, still in physical terms.
#[derive(Clone, Debug, PartialEq)]
pub enum PhysicalValue {
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    /// Both `ByteArray` and `FixedLenByteArray` columns decode to this.
    Bytes(Vec<u8>),
}

impl PhysicalValue {
    /// Convert a physical entry into the logical value space of a column.
    ///
    /// Covers the standard promotions: integer and float widening, epoch
    /// ints to date/timestamp, unscaled ints and big-endian byte arrays to
    /// decimal, UTF-8 byte arrays to strings, 16-byte arrays to UUIDs.
    pub fn into_logical(self, target: &LogicalType) -> FilterResult<Value> {
        match (self, target) {
            (PhysicalValue::Boolean(v), LogicalType::Boolean) => Ok(Value::Boolean(v)),
            (PhysicalValue::Int32(v), LogicalType::Int32) => Ok(Value::Int32(v)),
            (PhysicalValue::Int32(v), LogicalType::Int64) => Ok(Value::Int64(i64::from(v))),
            (PhysicalValue::Int32(v), LogicalType::Date) => Ok(Value::Date(v)),
            (PhysicalValue::Int32(v), LogicalType::Decimal { scale, .. }) => Ok(Value::Decimal {
                unscaled: i128::from(v),
                scale: *scale,
            }),
            (PhysicalValue::Int64(v), LogicalType::Int64) => Ok(Value::Int64(v)),
            (PhysicalValue::Int64(v), LogicalType::Timestamp) => Ok(Value::Timestamp(v)),
            (PhysicalValue::Int64(v), LogicalType::Decimal { scale, .. }) => Ok(Value::Decimal {
                unscaled: i128::from(v),
                scale: *scale,
            }),
            (PhysicalValue::Float(v), LogicalType::Float32) => Ok(Value::Float32(v)),
            (PhysicalValue::Float(v), LogicalType::Float64) => Ok(Value::Float64(f64::from(v))),
            (PhysicalValue::Double(v), LogicalType::Float64) => Ok(Value::Float64(v)),
            (PhysicalValue::Bytes(v), LogicalType::String) => match String::from_utf8(v) {
                Ok(s) => Ok(Value::String(s)),
                Err(_) => Err(FilterError::TypeMismatch(
                    "string column holds non-UTF-8 bytes".into(),
                )),
            },
            (PhysicalValue::Bytes(v), LogicalType::Binary) => Ok(Value::Binary(v)),
            (PhysicalValue::Bytes(v), LogicalType::Decimal { scale, .. }) => {
                let unscaled = i128_from_be(&v).ok_or_else(|| {
                    FilterError::TypeMismatch(format!(
                        "decimal column holds {}-byte value, want at most 16",
                        v.len()
                    ))
                })?;
                Ok(Value::Decimal {
                    unscaled,
                    scale: *scale,
                })
            }
            (PhysicalValue::Bytes(v), LogicalType::Uuid) => {
                let bytes: [u8; 16] = v.as_slice().try_into().map_err(|_| {
                    FilterError::TypeMismatch(format!(
                        "uuid column holds {}-byte value, want exactly 16",
                        v.len()
                    ))
                })?;
                Ok(Value::Uuid(Uuid::from_bytes(bytes)))
            }
            (value, target) => Err(FilterError::TypeMismatch(format!(
                "cannot read {value:?} as {target:?}"
            ))),
        }
    }
}

/// Sign-extend a big-endian two's-complement byte slice into an i128.
fn i128_from_be(bytes: &[u8]) -> Option<i128> {
    if bytes.is_empty() || bytes.len() > 16 {
        return None;
    }
    let fill = if bytes[0] & 0x80 != 0 { 0xff } else { 0x00 };
    let mut buf = [fill; 16];
    buf[16 - bytes.len()..].copy_from_slice(bytes);
    Some(i128::from_be_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dictionary_encodings_are_recognized() {
        assert!(Encoding::PlainDictionary.is_dictionary());
        assert!(Encoding::RleDictionary.is_dictionary());
        assert!(!Encoding::Plain.is_dictionary());
        assert!(!Encoding::DeltaByteArray.is_dictionary());
    }

    #[test]
    fn int32_widens_to_int64_logical() {
        assert_eq!(
            PhysicalValue::Int32(-7).into_logical(&LogicalType::Int64).unwrap(),
            Value::Int64(-7)
        );
    }

    #[test]
    fn float_widens_to_float64_logical() {
        assert_eq!(
            PhysicalValue::Float(1.5).into_logical(&LogicalType::Float64).unwrap(),
            Value::Float64(1.5)
        );
    }

    #[test]
    fn bytes_decode_to_string_or_fail_on_bad_utf8() {
        assert_eq!(
            PhysicalValue::Bytes(b"abc".to_vec())
                .into_logical(&LogicalType::String)
                .unwrap(),
            Value::String("abc".into())
        );
        let err = PhysicalValue::Bytes(vec![0xff, 0xfe])
            .into_logical(&LogicalType::String)
            .unwrap_err();
        assert!(err.to_string().contains("non-UTF-8"));
    }

    #[test]
    fn decimal_bytes_are_sign_extended() {
        let dec = LogicalType::Decimal {
            precision: 9,
            scale: 2,
        };
        assert_eq!(
            PhysicalValue::Bytes(vec![0x01, 0x00]).into_logical(&dec).unwrap(),
            Value::Decimal {
                unscaled: 256,
                scale: 2
            }
        );
        // 0xFF sign-extends to -1
        assert_eq!(
            PhysicalValue::Bytes(vec![0xff]).into_logical(&dec).unwrap(),
            Value::Decimal {
                unscaled: -1,
                scale: 2
            }
        );
        let too_wide = PhysicalValue::Bytes(vec![0; 17]).into_logical(&dec);
        assert!(too_wide.is_err());
    }

    #[test]
    fn uuid_requires_sixteen_bytes() {
        let bytes = [0x11u8; 16];
        assert_eq!(
            PhysicalValue::Bytes(bytes.to_vec())
                .into_logical(&LogicalType::Uuid)
                .unwrap(),
            Value::Uuid(Uuid::from_bytes(bytes))
        );
        assert!(
            PhysicalValue::Bytes(vec![0; 4])
                .into_logical(&LogicalType::Uuid)
                .is_err()
        );
    }

    #[test]
    fn cross_kind_conversion_is_a_type_mismatch() {
        let err = PhysicalValue::Boolean(true)
            .into_logical(&LogicalType::Int64)
            .unwrap_err();
        assert!(matches!(err, FilterError::TypeMismatch(_)));
    }
}
