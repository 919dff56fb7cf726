//! Custom assertion helpers for filter tests.

use common::FilterResult;
use filter::RowGroupFilter;

use crate::fixtures::TestFile;

/// Assert that the filter keeps the group for scanning.
pub fn assert_reads(filter: &RowGroupFilter, file: &TestFile) {
    let decision = filter
        .should_read(file, file, file)
        .expect("filter evaluation failed");
    assert!(decision, "expected the group to be read, but it was skipped");
}

/// Assert that the filter proves the group empty.
pub fn assert_skips(filter: &RowGroupFilter, file: &TestFile) {
    let decision = filter
        .should_read(file, file, file)
        .expect("filter evaluation failed");
    assert!(!decision, "expected the group to be skipped, but it was read");
}

/// Assert that an operation returns an error containing a specific
/// substring.
pub fn assert_error_contains<T>(result: FilterResult<T>, expected_msg: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}', but got Ok", expected_msg),
        Err(e) => {
            let error_string = e.to_string();
            assert!(
                error_string.contains(expected_msg),
                "Expected error to contain '{}', but got: {}",
                expected_msg,
                error_string
            );
        }
    }
}
