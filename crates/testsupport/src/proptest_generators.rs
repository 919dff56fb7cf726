//! Property-based test generators using proptest.
//!
//! The generators share one fixed three-column schema so that predicates,
//! rows, and row groups line up: `a` (optional int), `b` (optional
//! string), `c` (required int). Literal and value domains are deliberately
//! small so dictionary hits and misses both occur often.

use predicate::{CompareOp, Predicate};
use proptest::prelude::*;
use schema::{Field, Schema};
use types::{LogicalType, Value};

/// The schema all generated predicates and rows conform to.
pub fn property_schema() -> Schema {
    Schema::try_new(vec![
        Field::optional(1, "a", LogicalType::Int64),
        Field::optional(2, "b", LogicalType::String),
        Field::required(3, "c", LogicalType::Int64),
    ])
    .unwrap()
}

/// Strategy for one row of the property schema.
pub fn arb_row() -> impl Strategy<Value = Vec<Value>> {
    (
        proptest::option::of(0i64..6),
        proptest::option::of(prop_oneof![Just("x"), Just("y"), Just("z")]),
        0i64..6,
    )
        .prop_map(|(a, b, c)| {
            vec![
                a.map(Value::Int64).unwrap_or(Value::Null),
                b.map(|s| Value::String(s.into())).unwrap_or(Value::Null),
                Value::Int64(c),
            ]
        })
}

/// Strategy for a whole row population, possibly empty.
pub fn arb_rows() -> impl Strategy<Value = Vec<Vec<Value>>> {
    proptest::collection::vec(arb_row(), 0..16)
}

fn arb_compare_op() -> impl Strategy<Value = CompareOp> {
    prop_oneof![
        Just(CompareOp::Eq),
        Just(CompareOp::NotEq),
        Just(CompareOp::Lt),
        Just(CompareOp::LtEq),
        Just(CompareOp::Gt),
        Just(CompareOp::GtEq),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Predicate> {
    let int_compare = (
        prop_oneof![Just("a"), Just("c")],
        arb_compare_op(),
        -1i64..7,
    )
        .prop_map(|(col, op, lit)| {
            predicate::compare(op, col, Value::Int64(lit)).expect("non-null literal")
        });
    let string_compare = (
        arb_compare_op(),
        prop_oneof![Just("w"), Just("x"), Just("y"), Just("z")],
    )
        .prop_map(|(op, lit)| {
            predicate::compare(op, "b", Value::String(lit.into())).expect("non-null literal")
        });
    let null_check = (
        prop_oneof![Just("a"), Just("b"), Just("c")],
        any::<bool>(),
    )
        .prop_map(|(col, negated)| {
            if negated {
                predicate::not_null(col)
            } else {
                predicate::is_null(col)
            }
        });
    prop_oneof![int_compare, string_compare, null_check]
}

/// Strategy for predicate trees over the property schema.
pub fn arb_predicate() -> impl Strategy<Value = Predicate> {
    arb_leaf().prop_recursive(3, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| predicate::and(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| predicate::or(l, r)),
            inner.prop_map(predicate::not),
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        // Generated rows always line up with the property schema
        #[test]
        fn rows_match_schema_arity(rows in arb_rows()) {
            let schema = property_schema();
            for row in &rows {
                prop_assert_eq!(row.len(), schema.fields().len());
                // the required column never generates null
                prop_assert!(!row[2].is_null());
            }
        }

        // Generated predicates only reference schema columns
        #[test]
        fn predicates_bind_against_dictionaries(pred in arb_predicate(), rows in arb_rows()) {
            let schema = property_schema();
            let file = crate::fixtures::dictionary_file(&schema, &rows);
            let filter = filter::RowGroupFilter::new(schema, pred);
            prop_assert!(filter.should_read(&file, &file, &file).is_ok());
        }
    }
}
