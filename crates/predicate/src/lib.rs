#[cfg(test)]
mod tests;

mod bind;

pub use bind::{BoundPredicate, BoundReference, bind};

use std::fmt;

use common::{FilterError, FilterResult};
use types::Value;

/// Comparison operators over a column and a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    /// The operator satisfied exactly when this one is not.
    pub fn negated(self) -> CompareOp {
        match self {
            CompareOp::Eq => CompareOp::NotEq,
            CompareOp::NotEq => CompareOp::Eq,
            CompareOp::Lt => CompareOp::GtEq,
            CompareOp::LtEq => CompareOp::Gt,
            CompareOp::Gt => CompareOp::LtEq,
            CompareOp::GtEq => CompareOp::Lt,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
        }
    }
}

/// Unbound predicate tree over references-by-name and typed literals.
///
/// Built through the constructor functions below; the comparison
/// constructors refuse null literals up front, so a well-formed tree never
/// compares against null.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Predicate {
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
    Compare {
        op: CompareOp,
        column: String,
        literal: Value,
    },
    IsNull(String),
    NotNull(String),
}

pub fn and(left: Predicate, right: Predicate) -> Predicate {
    Predicate::And(Box::new(left), Box::new(right))
}

pub fn or(left: Predicate, right: Predicate) -> Predicate {
    Predicate::Or(Box::new(left), Box::new(right))
}

pub fn not(inner: Predicate) -> Predicate {
    Predicate::Not(Box::new(inner))
}

pub fn is_null(column: &str) -> Predicate {
    Predicate::IsNull(column.to_string())
}

pub fn not_null(column: &str) -> Predicate {
    Predicate::NotNull(column.to_string())
}

pub fn eq(column: &str, literal: Value) -> FilterResult<Predicate> {
    compare(CompareOp::Eq, column, literal)
}

pub fn not_eq(column: &str, literal: Value) -> FilterResult<Predicate> {
    compare(CompareOp::NotEq, column, literal)
}

pub fn lt(column: &str, literal: Value) -> FilterResult<Predicate> {
    compare(CompareOp::Lt, column, literal)
}

pub fn lt_eq(column: &str, literal: Value) -> FilterResult<Predicate> {
    compare(CompareOp::LtEq, column, literal)
}

pub fn gt(column: &str, literal: Value) -> FilterResult<Predicate> {
    compare(CompareOp::Gt, column, literal)
}

pub fn gt_eq(column: &str, literal: Value) -> FilterResult<Predicate> {
    compare(CompareOp::GtEq, column, literal)
}

/// Shared constructor for all comparison operators.
///
/// Comparing against null is never satisfiable under SQL semantics, so it
/// is rejected here rather than silently pruning everything.
pub fn compare(op: CompareOp, column: &str, literal: Value) -> FilterResult<Predicate> {
    if literal.is_null() {
        return Err(FilterError::InvalidLiteral(format!(
            "null literal in '{}' {} comparison",
            column,
            op.symbol()
        )));
    }
    Ok(Predicate::Compare {
        op,
        column: column.to_string(),
        literal,
    })
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::And(l, r) => write!(f, "({l} AND {r})"),
            Predicate::Or(l, r) => write!(f, "({l} OR {r})"),
            Predicate::Not(p) => write!(f, "NOT {p}"),
            Predicate::Compare {
                op,
                column,
                literal,
            } => write!(f, "{} {} {}", column, op.symbol(), literal),
            Predicate::IsNull(column) => write!(f, "{column} IS NULL"),
            Predicate::NotNull(column) => write!(f, "{column} IS NOT NULL"),
        }
    }
}
