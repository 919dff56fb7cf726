//! Schema binder: resolves an unbound predicate against the logical schema
//! and one physical file's column tree.
//!
//! Binding folds negation down the tree as it goes (De Morgan over
//! composites, operator complements at leaves), so the bound form has no
//! `Not` node and downstream evaluation never sees negated composites.

use std::fmt;

use common::{ColumnPath, FieldId, FilterError, FilterResult};
use rowgroup::PhysicalSchema;
use schema::Schema;
use types::{LogicalType, Value};

use crate::{CompareOp, Predicate};

/// A reference resolved to its logical field and, when the file carries
/// the column, a physical path.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundReference {
    pub field_id: FieldId,
    pub name: String,
    pub logical_type: LogicalType,
    pub required: bool,
    /// `None` when the column is absent from the physical schema; every
    /// leaf over such a reference evaluates to unknown.
    pub column: Option<ColumnPath>,
}

/// Predicate tree after binding and negation rewrite.
#[derive(Clone, Debug, PartialEq)]
pub enum BoundPredicate {
    And(Box<BoundPredicate>, Box<BoundPredicate>),
    Or(Box<BoundPredicate>, Box<BoundPredicate>),
    Compare {
        op: CompareOp,
        reference: BoundReference,
        literal: Value,
    },
    IsNull(BoundReference),
    NotNull(BoundReference),
}

/// Bind `predicate` against the logical schema and one physical file.
///
/// # Errors
///
/// - `MissingField` when a referenced name is not in the logical schema
/// - `TypeMismatch` when a literal cannot coerce to the field's logical
///   type, or the physical column cannot decode as it
pub fn bind(
    predicate: &Predicate,
    schema: &Schema,
    physical: &dyn PhysicalSchema,
) -> FilterResult<BoundPredicate> {
    bind_inner(predicate, schema, physical, false)
}

fn bind_inner(
    predicate: &Predicate,
    schema: &Schema,
    physical: &dyn PhysicalSchema,
    negated: bool,
) -> FilterResult<BoundPredicate> {
    match predicate {
        Predicate::Not(inner) => bind_inner(inner, schema, physical, !negated),
        Predicate::And(left, right) => {
            let left = Box::new(bind_inner(left, schema, physical, negated)?);
            let right = Box::new(bind_inner(right, schema, physical, negated)?);
            Ok(if negated {
                BoundPredicate::Or(left, right)
            } else {
                BoundPredicate::And(left, right)
            })
        }
        Predicate::Or(left, right) => {
            let left = Box::new(bind_inner(left, schema, physical, negated)?);
            let right = Box::new(bind_inner(right, schema, physical, negated)?);
            Ok(if negated {
                BoundPredicate::And(left, right)
            } else {
                BoundPredicate::Or(left, right)
            })
        }
        Predicate::Compare {
            op,
            column,
            literal,
        } => {
            let reference = bind_reference(column, schema, physical)?;
            let literal = literal.coerce_to(&reference.logical_type).ok_or_else(|| {
                FilterError::TypeMismatch(format!(
                    "literal {} does not fit column '{}' of type {:?}",
                    literal, column, reference.logical_type
                ))
            })?;
            let op = if negated { op.negated() } else { *op };
            Ok(BoundPredicate::Compare {
                op,
                reference,
                literal,
            })
        }
        Predicate::IsNull(column) => {
            let reference = bind_reference(column, schema, physical)?;
            Ok(if negated {
                BoundPredicate::NotNull(reference)
            } else {
                BoundPredicate::IsNull(reference)
            })
        }
        Predicate::NotNull(column) => {
            let reference = bind_reference(column, schema, physical)?;
            Ok(if negated {
                BoundPredicate::IsNull(reference)
            } else {
                BoundPredicate::NotNull(reference)
            })
        }
    }
}

fn bind_reference(
    name: &str,
    schema: &Schema,
    physical: &dyn PhysicalSchema,
) -> FilterResult<BoundReference> {
    let field = schema
        .field_by_name(name)
        .ok_or_else(|| FilterError::MissingField(name.to_string()))?;

    let column = match physical.column(name) {
        Some(descriptor) => {
            if !descriptor.physical_type().can_decode_as(&field.logical_type) {
                return Err(FilterError::TypeMismatch(format!(
                    "column '{}' is {:?} in the file but {:?} in the schema",
                    name,
                    descriptor.physical_type(),
                    field.logical_type
                )));
            }
            Some(descriptor.path().clone())
        }
        None => None,
    };

    Ok(BoundReference {
        field_id: field.id,
        name: name.to_string(),
        logical_type: field.logical_type,
        required: field.required,
        column,
    })
}

impl fmt::Display for BoundPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundPredicate::And(l, r) => write!(f, "({l} AND {r})"),
            BoundPredicate::Or(l, r) => write!(f, "({l} OR {r})"),
            BoundPredicate::Compare {
                op,
                reference,
                literal,
            } => write!(f, "{} {} {}", reference.name, op.symbol(), literal),
            BoundPredicate::IsNull(reference) => write!(f, "{} IS NULL", reference.name),
            BoundPredicate::NotNull(reference) => write!(f, "{} IS NOT NULL", reference.name),
        }
    }
}
