use crate::GroupByOptions;

#[test]
fn options_round_trip_through_json() {
    let options = GroupByOptions {
        expected_keys: 16,
        buffer_capacity: 4,
    };

    let json = serde_json::to_string(&options).unwrap();
    assert_eq!(json, r#"{"expected_keys":16,"buffer_capacity":4}"#);

    let back: GroupByOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);
}
