//! Property tests tying the filter's verdicts to a row-scan reference.

use filter::RowGroupFilter;
use predicate::{and, is_null, not, not_null};
use proptest::prelude::*;
use testsupport::prelude::*;
use testsupport::proptest_generators::{arb_predicate, arb_rows, property_schema};

proptest! {
    // Soundness: a skipped group provably holds no matching row.
    #[test]
    fn skip_implies_no_row_matches(pred in arb_predicate(), rows in arb_rows()) {
        let schema = property_schema();
        let file = dictionary_file(&schema, &rows);
        let filter = RowGroupFilter::new(schema.clone(), pred.clone());

        if !filter.should_read(&file, &file, &file).unwrap() {
            prop_assert!(
                !any_row_matches(&pred, &schema, &rows),
                "filter skipped a group containing a matching row for {pred}"
            );
        }
    }

    // Monotonicity: weakening `and(p, q)` to `p` can only read more.
    #[test]
    fn weakening_never_turns_read_into_skip(
        p in arb_predicate(),
        q in arb_predicate(),
        rows in arb_rows(),
    ) {
        let schema = property_schema();
        let file = dictionary_file(&schema, &rows);

        let strong = RowGroupFilter::new(schema.clone(), and(p.clone(), q));
        let weak = RowGroupFilter::new(schema, p);

        if strong.should_read(&file, &file, &file).unwrap() {
            prop_assert!(weak.should_read(&file, &file, &file).unwrap());
        }
    }

    // Idempotence: the decision is a pure function of its inputs.
    #[test]
    fn repeated_evaluation_is_stable(pred in arb_predicate(), rows in arb_rows()) {
        let schema = property_schema();
        let file = dictionary_file(&schema, &rows);
        let filter = RowGroupFilter::new(schema, pred);

        let first = filter.should_read(&file, &file, &file).unwrap();
        let second = filter.should_read(&file, &file, &file).unwrap();
        prop_assert_eq!(first, second);
    }

    // Double negation is erased by the binder's rewrite.
    #[test]
    fn double_negation_preserves_the_decision(pred in arb_predicate(), rows in arb_rows()) {
        let schema = property_schema();
        let file = dictionary_file(&schema, &rows);

        let plain = RowGroupFilter::new(schema.clone(), pred.clone());
        let doubled = RowGroupFilter::new(schema, not(not(pred)));

        prop_assert_eq!(
            plain.should_read(&file, &file, &file).unwrap(),
            doubled.should_read(&file, &file, &file).unwrap()
        );
    }

    // A required column can never be null wherever a dictionary exists.
    #[test]
    fn required_null_checks_are_decided(rows in arb_rows()) {
        let schema = property_schema();
        let file = dictionary_file(&schema, &rows);

        let skip = RowGroupFilter::new(schema.clone(), is_null("c"));
        prop_assert!(!skip.should_read(&file, &file, &file).unwrap());

        let read = RowGroupFilter::new(schema, not_null("c"));
        prop_assert!(read.should_read(&file, &file, &file).unwrap());
    }
}
