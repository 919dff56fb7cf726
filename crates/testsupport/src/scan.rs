//! Reference row-scan evaluator.
//!
//! Evaluates a predicate over actual rows under SQL three-valued
//! semantics. Property tests compare the filter's verdict against this:
//! whenever the filter skips, no row here may match.

use filter::Ternary;
use predicate::{CompareOp, Predicate};
use schema::Schema;
use types::Value;

/// True when at least one row satisfies the predicate.
pub fn any_row_matches(predicate: &Predicate, schema: &Schema, rows: &[Vec<Value>]) -> bool {
    rows.iter()
        .any(|row| eval_row(predicate, schema, row) == Ternary::True)
}

fn eval_row(predicate: &Predicate, schema: &Schema, row: &[Value]) -> Ternary {
    match predicate {
        Predicate::And(l, r) => eval_row(l, schema, row).and(eval_row(r, schema, row)),
        Predicate::Or(l, r) => eval_row(l, schema, row).or(eval_row(r, schema, row)),
        Predicate::Not(p) => eval_row(p, schema, row).negate(),
        Predicate::Compare {
            op,
            column,
            literal,
        } => {
            let (idx, field) = lookup(schema, column);
            let value = &row[idx];
            if value.is_null() {
                // A null operand makes any comparison unknown
                return Ternary::Unknown;
            }
            let literal = literal
                .coerce_to(&field.logical_type)
                .expect("reference rows use coercible literals");
            compare(*op, value, &literal).into()
        }
        Predicate::IsNull(column) => {
            let (idx, _) = lookup(schema, column);
            row[idx].is_null().into()
        }
        Predicate::NotNull(column) => {
            let (idx, _) = lookup(schema, column);
            (!row[idx].is_null()).into()
        }
    }
}

fn lookup<'s>(schema: &'s Schema, column: &str) -> (usize, &'s schema::Field) {
    schema
        .fields()
        .iter()
        .enumerate()
        .find(|(_, f)| f.name == column)
        .expect("reference rows cover every referenced column")
}

fn compare(op: CompareOp, value: &Value, literal: &Value) -> bool {
    match op {
        CompareOp::Eq => value.eq_same_type(literal) == Some(true),
        CompareOp::NotEq => value.eq_same_type(literal) == Some(false),
        CompareOp::Lt => value.cmp_same_type(literal) == Some(std::cmp::Ordering::Less),
        CompareOp::LtEq => matches!(
            value.cmp_same_type(literal),
            Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
        ),
        CompareOp::Gt => value.cmp_same_type(literal) == Some(std::cmp::Ordering::Greater),
        CompareOp::GtEq => matches!(
            value.cmp_same_type(literal),
            Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
        ),
    }
}
