use std::cmp::Ordering;

use uuid::Uuid;

/// Logical column types as declared by the table schema.
///
/// Decimal carries its precision and scale; all other types are nullary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LogicalType {
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Binary,
    /// Days since the Unix epoch.
    Date,
    /// Microseconds since the Unix epoch.
    Timestamp,
    Decimal {
        precision: u8,
        scale: u8,
    },
    Uuid,
    Boolean,
}

/// A single typed datum.
///
/// `Null` exists so predicate constructors can reject null comparison
/// literals at runtime; it never appears inside a candidate value set.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Binary(Vec<u8>),
    Date(i32),
    Timestamp(i64),
    Decimal { unscaled: i128, scale: u8 },
    Uuid(Uuid),
    Boolean(bool),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Compare two values of the same logical type.
    ///
    /// Cross-type pairs (and decimals of different scale) are incomparable
    /// and return `None`. Floats follow IEEE-754: NaN is incomparable to
    /// everything including itself. Strings order by their UTF-8 bytes.
    pub fn cmp_same_type(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int32(a), Value::Int32(b)) => Some(a.cmp(b)),
            (Value::Int64(a), Value::Int64(b)) => Some(a.cmp(b)),
            (Value::Float32(a), Value::Float32(b)) => a.partial_cmp(b),
            (Value::Float64(a), Value::Float64(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            (Value::Binary(a), Value::Binary(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (
                Value::Decimal {
                    unscaled: a,
                    scale: sa,
                },
                Value::Decimal {
                    unscaled: b,
                    scale: sb,
                },
            ) if sa == sb => Some(a.cmp(b)),
            (Value::Uuid(a), Value::Uuid(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Equality under the same-type rule; NaN is never equal to anything.
    pub fn eq_same_type(&self, other: &Value) -> Option<bool> {
        match (self, other) {
            (Value::Float32(a), Value::Float32(b)) => Some(a == b),
            (Value::Float64(a), Value::Float64(b)) => Some(a == b),
            _ => self.cmp_same_type(other).map(|ord| ord == Ordering::Equal),
        }
    }

    /// Coerce a literal to the given logical type.
    ///
    /// Identity coercions and safe widenings succeed; anything lossy or
    /// cross-kind returns `None`. Integer literals scale up into decimals
    /// and stand in for epoch-based date/timestamp literals.
    pub fn coerce_to(&self, target: &LogicalType) -> Option<Value> {
        match (self, target) {
            (Value::Int32(v), LogicalType::Int32) => Some(Value::Int32(*v)),
            (Value::Int32(v), LogicalType::Int64) => Some(Value::Int64(i64::from(*v))),
            (Value::Int64(v), LogicalType::Int64) => Some(Value::Int64(*v)),
            (Value::Int64(v), LogicalType::Int32) => i32::try_from(*v).ok().map(Value::Int32),
            (Value::Int32(v), LogicalType::Date) => Some(Value::Date(*v)),
            (Value::Int64(v), LogicalType::Date) => i32::try_from(*v).ok().map(Value::Date),
            (Value::Int32(v), LogicalType::Timestamp) => Some(Value::Timestamp(i64::from(*v))),
            (Value::Int64(v), LogicalType::Timestamp) => Some(Value::Timestamp(*v)),
            (Value::Int32(v), LogicalType::Decimal { scale, .. }) => {
                rescale(i128::from(*v), 0, *scale)
            }
            (Value::Int64(v), LogicalType::Decimal { scale, .. }) => {
                rescale(i128::from(*v), 0, *scale)
            }
            (Value::Float32(v), LogicalType::Float32) => Some(Value::Float32(*v)),
            (Value::Float32(v), LogicalType::Float64) => Some(Value::Float64(f64::from(*v))),
            (Value::Float64(v), LogicalType::Float64) => Some(Value::Float64(*v)),
            (Value::String(v), LogicalType::String) => Some(Value::String(v.clone())),
            (Value::String(v), LogicalType::Uuid) => Uuid::parse_str(v).ok().map(Value::Uuid),
            (Value::Binary(v), LogicalType::Binary) => Some(Value::Binary(v.clone())),
            (Value::Date(v), LogicalType::Date) => Some(Value::Date(*v)),
            (Value::Timestamp(v), LogicalType::Timestamp) => Some(Value::Timestamp(*v)),
            (
                Value::Decimal { unscaled, scale },
                LogicalType::Decimal {
                    scale: target_scale, ..
                },
            ) => rescale(*unscaled, *scale, *target_scale),
            (Value::Uuid(v), LogicalType::Uuid) => Some(Value::Uuid(*v)),
            (Value::Boolean(v), LogicalType::Boolean) => Some(Value::Boolean(*v)),
            _ => None,
        }
    }

    /// The logical type this value inhabits, if it is not null.
    ///
    /// Decimal values report the widest precision since a bare literal
    /// does not carry one.
    pub fn logical_type(&self) -> Option<LogicalType> {
        match self {
            Value::Int32(_) => Some(LogicalType::Int32),
            Value::Int64(_) => Some(LogicalType::Int64),
            Value::Float32(_) => Some(LogicalType::Float32),
            Value::Float64(_) => Some(LogicalType::Float64),
            Value::String(_) => Some(LogicalType::String),
            Value::Binary(_) => Some(LogicalType::Binary),
            Value::Date(_) => Some(LogicalType::Date),
            Value::Timestamp(_) => Some(LogicalType::Timestamp),
            Value::Decimal { scale, .. } => Some(LogicalType::Decimal {
                precision: 38,
                scale: *scale,
            }),
            Value::Uuid(_) => Some(LogicalType::Uuid),
            Value::Boolean(_) => Some(LogicalType::Boolean),
            Value::Null => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v:?}"),
            Value::Binary(v) => write!(f, "0x{}", hex(v)),
            Value::Date(v) => write!(f, "date({v})"),
            Value::Timestamp(v) => write!(f, "timestamp({v})"),
            Value::Decimal { unscaled, scale } => write!(f, "decimal({unscaled}e-{scale})"),
            Value::Uuid(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Null => write!(f, "null"),
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Re-scale a decimal's unscaled representation, refusing to drop digits.
fn rescale(unscaled: i128, from: u8, to: u8) -> Option<Value> {
    if to < from {
        return None;
    }
    let factor = 10i128.checked_pow(u32::from(to - from))?;
    let unscaled = unscaled.checked_mul(factor)?;
    Some(Value::Decimal { unscaled, scale: to })
}
