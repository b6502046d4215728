use proptest::prelude::*;
use weather_summary::{
    aggregate::aggregate,
    coerce::{coerce, coerce_cell},
    record::Cell,
};

#[test]
fn coerce_handles_blank_missing_and_thousands() {
    assert_eq!(coerce(Some("1,234.5")), Some(1234.5));
    assert_eq!(coerce(Some("  42 ")), Some(42.0));
    assert_eq!(coerce(Some("-7")), Some(-7.0));
    assert_eq!(coerce(Some("NaN")), None);
    assert_eq!(coerce(Some("Null")), None);
    assert_eq!(coerce(Some("NA")), None);
    assert_eq!(coerce(Some("")), None);
    assert_eq!(coerce(Some("   ")), None);
    assert_eq!(coerce(Some("pomegranate")), None);
    assert_eq!(coerce(None), None);
}

#[test]
fn numeric_cells_pass_through() {
    assert_eq!(coerce_cell(Cell::Number(3.5)), Some(3.5));
    assert!(coerce_cell(Cell::Number(f64::NAN)).is_some_and(f64::is_nan));
    assert_eq!(coerce_cell(Cell::Text("1,000")), Some(1000.0));
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::new();
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn cell_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (-1.0e5f64..1.0e5).prop_map(|value| format!("{value}")),
        (0u32..10_000_000).prop_map(group_thousands),
        Just(String::new()),
        Just(" ".to_string()),
        Just("NULL".to_string()),
        "[a-z]{1,6}",
    ]
}

proptest! {
    #[test]
    fn aggregate_count_matches_coercible_cells(
        cells in proptest::collection::vec(cell_strategy(), 0..80)
    ) {
        let expected = cells.iter().filter(|cell| coerce(Some(cell.as_str())).is_some()).count();
        let stats = aggregate(cells.iter().filter_map(|cell| coerce(Some(cell.as_str()))));
        prop_assert_eq!(stats.count(), expected as u64);
    }

    #[test]
    fn grouped_thousands_parse_as_plain_integers(value in 0u32..10_000_000) {
        let grouped = group_thousands(value);
        prop_assert_eq!(coerce(Some(grouped.as_str())), Some(f64::from(value)));
    }
}
