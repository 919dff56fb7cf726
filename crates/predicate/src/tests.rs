use super::*;
use common::FilterError;
use pretty_assertions::assert_eq;
use rowgroup::{PhysicalType, PhysicalValue};
use schema::{Field, Schema};
use testsupport::prelude::*;
use types::{LogicalType, Value};

fn sample_schema() -> Schema {
    Schema::try_new(vec![
        Field::required(1, "id", LogicalType::Int64),
        Field::optional(2, "name", LogicalType::String),
        Field::optional(3, "score", LogicalType::Float64),
    ])
    .unwrap()
}

fn sample_file() -> TestFile {
    TestFile::new()
        .with_dict_column("id", PhysicalType::Int64, vec![PhysicalValue::Int64(1)])
        .with_dict_column(
            "name",
            PhysicalType::ByteArray,
            vec![PhysicalValue::Bytes(b"ada".to_vec())],
        )
}

#[test]
fn null_comparison_literals_are_rejected_at_construction() {
    let err = eq("col", Value::Null).unwrap_err();
    assert!(matches!(err, FilterError::InvalidLiteral(_)));

    let err = lt("col", Value::Null).unwrap_err();
    assert!(err.to_string().contains("null literal"));
}

#[test]
fn unknown_column_fails_missing_field() {
    let schema = sample_schema();
    let file = sample_file();
    let pred = lt("missing", Value::Int64(5)).unwrap();

    let err = bind(&pred, &schema, &file).unwrap_err();
    match err {
        FilterError::MissingField(name) => assert_eq!(name, "missing"),
        other => panic!("expected MissingField, got {other:?}"),
    }
}

#[test]
fn integer_literals_widen_to_the_column_type() {
    let schema = sample_schema();
    let file = sample_file();
    let pred = eq("id", Value::Int32(5)).unwrap();

    let bound = bind(&pred, &schema, &file).unwrap();
    match bound {
        BoundPredicate::Compare { literal, .. } => assert_eq!(literal, Value::Int64(5)),
        other => panic!("expected comparison, got {other:?}"),
    }
}

#[test]
fn uncoercible_literal_fails_type_mismatch() {
    let schema = sample_schema();
    let file = sample_file();
    let pred = eq("id", Value::String("five".into())).unwrap();

    let err = bind(&pred, &schema, &file).unwrap_err();
    assert!(matches!(err, FilterError::TypeMismatch(_)));
}

#[test]
fn physical_logical_conflict_fails_type_mismatch() {
    let schema = sample_schema();
    // The file stores `id` as byte arrays, the schema says Int64
    let file = TestFile::new().with_dict_column(
        "id",
        PhysicalType::ByteArray,
        vec![PhysicalValue::Bytes(b"1".to_vec())],
    );
    let pred = eq("id", Value::Int64(1)).unwrap();

    let err = bind(&pred, &schema, &file).unwrap_err();
    assert!(matches!(err, FilterError::TypeMismatch(_)));
}

#[test]
fn missing_physical_column_binds_as_absent() {
    let schema = sample_schema();
    let file = sample_file(); // no "score" column
    let pred = gt("score", Value::Float64(0.5)).unwrap();

    let bound = bind(&pred, &schema, &file).unwrap();
    match bound {
        BoundPredicate::Compare { reference, .. } => {
            assert_eq!(reference.field_id, 3);
            assert!(reference.column.is_none());
        }
        other => panic!("expected comparison, got {other:?}"),
    }
}

#[test]
fn bound_reference_carries_field_identity() {
    let schema = sample_schema();
    let file = sample_file();
    let pred = is_null("name");

    let bound = bind(&pred, &schema, &file).unwrap();
    match bound {
        BoundPredicate::IsNull(reference) => {
            assert_eq!(reference.field_id, 2);
            assert_eq!(reference.logical_type, LogicalType::String);
            assert!(!reference.required);
            assert!(reference.column.is_some());
        }
        other => panic!("expected IsNull, got {other:?}"),
    }
}

#[test]
fn negation_distributes_over_composites() {
    let schema = sample_schema();
    let file = sample_file();

    let pred = not(and(
        lt("id", Value::Int64(5)).unwrap(),
        is_null("name"),
    ));
    let bound = bind(&pred, &schema, &file).unwrap();
    insta::assert_snapshot!(bound.to_string(), @"(id >= 5 OR name IS NOT NULL)");

    let pred = not(or(
        eq("id", Value::Int64(5)).unwrap(),
        not_null("name"),
    ));
    let bound = bind(&pred, &schema, &file).unwrap();
    insta::assert_snapshot!(bound.to_string(), @"(id != 5 AND name IS NULL)");
}

#[test]
fn negated_comparisons_flip_to_complement_operators() {
    let schema = sample_schema();
    let file = sample_file();

    for (pred, expected) in [
        (not(lt("id", Value::Int64(5)).unwrap()), "id >= 5"),
        (not(lt_eq("id", Value::Int64(5)).unwrap()), "id > 5"),
        (not(gt("id", Value::Int64(5)).unwrap()), "id <= 5"),
        (not(gt_eq("id", Value::Int64(5)).unwrap()), "id < 5"),
        (not(eq("id", Value::Int64(5)).unwrap()), "id != 5"),
        (not(not_eq("id", Value::Int64(5)).unwrap()), "id = 5"),
    ] {
        let bound = bind(&pred, &schema, &file).unwrap();
        assert_eq!(bound.to_string(), expected);
    }
}

#[test]
fn double_negation_cancels() {
    let schema = sample_schema();
    let file = sample_file();
    let pred = lt("id", Value::Int64(30)).unwrap();

    let plain = bind(&pred, &schema, &file).unwrap();
    let doubled = bind(&not(not(pred)), &schema, &file).unwrap();
    assert_eq!(plain, doubled);
}

#[test]
fn display_renders_the_unbound_tree() {
    let pred = and(
        or(
            lt("id", Value::Int64(5)).unwrap(),
            gt_eq("id", Value::Int64(60)).unwrap(),
        ),
        not(is_null("name")),
    );
    insta::assert_snapshot!(pred.to_string(), @"((id < 5 OR id >= 60) AND NOT name IS NULL)");
}

#[test]
fn predicates_round_trip_through_serde() {
    let pred = and(
        eq("name", Value::String("ada".into())).unwrap(),
        not(lt("id", Value::Int64(10)).unwrap()),
    );
    let json = serde_json::to_string(&pred).unwrap();
    let back: Predicate = serde_json::from_str(&json).unwrap();
    assert_eq!(pred, back);
}
