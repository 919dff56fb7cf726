//! Three-valued evaluation of a bound predicate against one row group's
//! dictionaries.

use std::cmp::Ordering;

use common::{FilterConfig, FilterResult};
use predicate::{BoundPredicate, BoundReference, CompareOp};
use types::Value;

use crate::materialize::{ColumnStatus, DictionaryCache};
use crate::ternary::Ternary;

pub struct Evaluator<'a> {
    dictionaries: DictionaryCache<'a>,
    config: &'a FilterConfig,
}

impl<'a> Evaluator<'a> {
    pub fn new(dictionaries: DictionaryCache<'a>, config: &'a FilterConfig) -> Self {
        Self {
            dictionaries,
            config,
        }
    }

    /// Evaluate the tree. `False` short-circuits `And` and `True`
    /// short-circuits `Or`, so the skipped child touches no dictionary.
    pub fn eval(&mut self, predicate: &BoundPredicate) -> FilterResult<Ternary> {
        match predicate {
            BoundPredicate::And(left, right) => {
                let left = self.eval(left)?;
                if left == Ternary::False {
                    return Ok(Ternary::False);
                }
                Ok(left.and(self.eval(right)?))
            }
            BoundPredicate::Or(left, right) => {
                let left = self.eval(left)?;
                if left == Ternary::True {
                    return Ok(Ternary::True);
                }
                Ok(left.or(self.eval(right)?))
            }
            BoundPredicate::Compare {
                op,
                reference,
                literal,
            } => self.eval_compare(*op, reference, literal),
            BoundPredicate::IsNull(reference) => self.eval_is_null(reference),
            BoundPredicate::NotNull(reference) => self.eval_not_null(reference),
        }
    }

    fn eval_compare(
        &mut self,
        op: CompareOp,
        reference: &BoundReference,
        literal: &Value,
    ) -> FilterResult<Ternary> {
        let ColumnStatus::Dictionary(values) = self.dictionaries.status(reference)? else {
            return Ok(Ternary::Unknown);
        };

        let matches = match op {
            CompareOp::Eq => contains(values, literal),
            CompareOp::NotEq => {
                // Skippable only when every non-null value equals the
                // literal: a null row satisfies `c != v` no more than an
                // equal one does under SQL three-valued semantics.
                let has_other = values
                    .iter()
                    .any(|v| v.eq_same_type(literal) != Some(true));
                has_other || (self.config.not_eq_reads_nulls && !reference.required)
            }
            CompareOp::Lt => any_ordering(values, literal, |ord| ord == Ordering::Less),
            CompareOp::LtEq => any_ordering(values, literal, |ord| ord != Ordering::Greater),
            CompareOp::Gt => any_ordering(values, literal, |ord| ord == Ordering::Greater),
            CompareOp::GtEq => any_ordering(values, literal, |ord| ord != Ordering::Less),
        };
        Ok(matches.into())
    }

    /// The dictionary never records nulls, so only a required field rules
    /// them out.
    fn eval_is_null(&mut self, reference: &BoundReference) -> FilterResult<Ternary> {
        let ColumnStatus::Dictionary(_) = self.dictionaries.status(reference)? else {
            return Ok(Ternary::Unknown);
        };
        Ok(if reference.required {
            Ternary::False
        } else {
            Ternary::Unknown
        })
    }

    fn eval_not_null(&mut self, reference: &BoundReference) -> FilterResult<Ternary> {
        let ColumnStatus::Dictionary(_) = self.dictionaries.status(reference)? else {
            return Ok(Ternary::Unknown);
        };
        Ok(if reference.required {
            Ternary::True
        } else {
            Ternary::Unknown
        })
    }
}

fn contains(values: &[Value], literal: &Value) -> bool {
    values.iter().any(|v| v.eq_same_type(literal) == Some(true))
}

/// True when some candidate orders against the literal as `accept` allows.
/// Incomparable pairs (NaN) satisfy no ordering operator.
fn any_ordering(values: &[Value], literal: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    values
        .iter()
        .any(|v| v.cmp_same_type(literal).is_some_and(&accept))
}
