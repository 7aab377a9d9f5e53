//! Property tests for range checks.

use inquest::{ErrorKind, Processor, Schema};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn int_range_fails_iff_outside(v in -1000i64..1000, lo in -500i64..0, hi in 0i64..500) {
        let schema = Schema::int().min(lo).max(hi);
        let result = Processor::new().validate(&schema, json!(v)).unwrap();
        let outside = v < lo || v > hi;
        prop_assert_eq!(result.is_failure(), outside);
        if let Err(errors) = result.into_result() {
            prop_assert_eq!(errors.len(), 1);
            prop_assert_eq!(errors.first().kind, ErrorKind::ValueOutOfRange);
        }
    }

    #[test]
    fn string_length_fails_iff_outside(s in "[a-z]{0,12}", lo in 0usize..4, hi in 4usize..10) {
        let schema = Schema::string().min(lo).max(hi);
        let result = Processor::new().validate(&schema, json!(s.clone())).unwrap();
        let outside = s.len() < lo || s.len() > hi;
        prop_assert_eq!(result.is_failure(), outside);
        if let Err(errors) = result.into_result() {
            prop_assert_eq!(errors.first().kind, ErrorKind::LengthOutOfRange);
        }
    }

    #[test]
    fn unicode_counts_code_points(s in "[αβγδ]{0,8}") {
        let schema = Schema::unicode().max(4);
        let result = Processor::new().validate(&schema, json!(s.clone())).unwrap();
        prop_assert_eq!(result.is_failure(), s.chars().count() > 4);
    }

    #[test]
    fn list_length_fails_iff_outside(items in prop::collection::vec(0i64..10, 0..8), hi in 0usize..8) {
        let schema = Schema::list_of(Schema::int()).max(hi);
        let result = Processor::new().validate(&schema, json!(items.clone())).unwrap();
        prop_assert_eq!(result.is_failure(), items.len() > hi);
    }
}
