//! Property-based tests for the pipeline building blocks.
//!
//! These tests use proptest to generate random tables and verify that the
//! cleaning, filtering, joining and aggregation invariants hold for all of them.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p olympics --test property_tests
//!
//! # More cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p olympics --test property_tests
//! ```

use proptest::prelude::*;

use olympics::clean::normalize_column_names;
use olympics::{left_join, Aggregator, Cleaner, Cohort, CohortFilter, Table, Value};

// =============================================================================
// Test Strategies
// =============================================================================

/// Medal cells: valid labels in any casing, sentinels, missing markers and garbage.
fn medal_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Gold".to_string()),
        Just("Silver".to_string()),
        Just("Bronze".to_string()),
        Just("None".to_string()),
        Just("NA".to_string()),
        Just(String::new()),
        "(?i)(gold|silver|bronze)",
        "[a-zA-Z ]{0,10}",
    ]
}

/// Age cells: numbers, numbers with decimals, missing markers and text.
fn age_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        (10u32..80).prop_map(|n| n.to_string()),
        (10u32..80).prop_map(|n| format!("{}.0", n)),
        Just("NA".to_string()),
        Just(String::new()),
        "[a-z\\-]{1,12}",
    ]
}

fn noc_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("USA".to_string()),
        Just("usa".to_string()),
        Just("GBR".to_string()),
        Just("CHN".to_string()),
        Just(String::new()),
        "[A-Z]{3}",
    ]
}

fn year_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["1992", "1996", "2000", "2004"]).prop_map(String::from),
        Just("NA".to_string()),
    ]
}

fn sport_cell() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Swimming", "Rowing", "Judo", " Archery "]).prop_map(String::from)
}

/// Generate a raw athlete-event table with 0..40 rows.
fn raw_table() -> impl Strategy<Value = Table> {
    prop::collection::vec(
        (
            "[A-Z][a-z]{1,6}",
            age_cell(),
            noc_cell(),
            year_cell(),
            sport_cell(),
            medal_cell(),
        ),
        0..40,
    )
    .prop_map(|rows| {
        Table::new(
            ["Name", "Age", "NOC", "Year", "Sport", "Medal"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            rows.into_iter()
                .map(|(name, age, noc, year, sport, medal)| {
                    [name, age, noc, year, sport, medal]
                        .iter()
                        .map(|cell| Value::from_cell(cell))
                        .collect()
                })
                .collect(),
        )
    })
}

/// Generate header names with mixed case and stray whitespace.
fn messy_headers() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[ \\t]{0,2}[A-Za-z]{1,6}([ \\t]{1,3}[A-Za-z]{1,6})?[ \\t]{0,2}", 1..8)
}

fn reference_table(codes: Vec<String>) -> Table {
    Table::new(
        vec!["noc".to_string(), "region".to_string()],
        codes
            .into_iter()
            .enumerate()
            .map(|(i, code)| vec![Value::from(code), Value::from(format!("Region {}", i))])
            .collect(),
    )
}

// =============================================================================
// Cleaner Properties
// =============================================================================

mod cleaner_tests {
    use super::*;

    proptest! {
        /// Cleaning never adds or drops rows.
        #[test]
        fn clean_preserves_row_count(table in raw_table()) {
            let cleaned = Cleaner::new().clean(&table);
            prop_assert_eq!(cleaned.row_count(), table.row_count());
        }

        /// Cleaning leaves its input untouched.
        #[test]
        fn clean_is_pure(table in raw_table()) {
            let before = table.clone();
            let _ = Cleaner::new().clean(&table);
            prop_assert_eq!(table, before);
        }

        /// Cleaning an already-clean table changes nothing.
        #[test]
        fn clean_is_idempotent(table in raw_table()) {
            let cleaner = Cleaner::new();
            let once = cleaner.clean(&table);
            prop_assert_eq!(cleaner.clean(&once), once);
        }

        /// Column-name normalization is idempotent.
        #[test]
        fn normalize_names_is_idempotent(headers in messy_headers()) {
            let table = Table::empty(headers);
            let once = normalize_column_names(&table);
            prop_assert_eq!(normalize_column_names(&once), once.clone());
            for h in &once.headers {
                prop_assert!(!h.chars().any(char::is_whitespace));
                prop_assert_eq!(h.to_lowercase(), h.clone());
            }
        }

        /// Medals always land in the closed set.
        #[test]
        fn medals_in_closed_set(table in raw_table()) {
            let cleaned = Cleaner::new().clean(&table);
            let medals = cleaned.column_by_name("medal").unwrap();
            for medal in medals {
                let label = medal.as_str().unwrap_or("<null>");
                prop_assert!(
                    matches!(label, "Gold" | "Silver" | "Bronze" | "None"),
                    "unexpected medal {:?}", medal
                );
            }
        }

        /// Cleaned ages are numbers or missing, never text.
        #[test]
        fn ages_are_numeric_or_null(table in raw_table()) {
            let cleaned = Cleaner::new().clean(&table);
            for age in cleaned.column_by_name("age").unwrap() {
                prop_assert!(matches!(age, Value::Int(_) | Value::Float(_) | Value::Null));
            }
        }
    }
}

// =============================================================================
// Filter Properties
// =============================================================================

mod filter_tests {
    use super::*;

    proptest! {
        /// Every filtered row exists unchanged in the input, in order, and matches.
        #[test]
        fn filter_is_ordered_subset(table in raw_table()) {
            let cleaned = Cleaner::new().clean(&table);
            let filtered = CohortFilter::new(Cohort::new("USA")).apply(&cleaned).unwrap();

            let noc = cleaned.column_index("noc").unwrap();
            let expected: Vec<_> = cleaned
                .rows
                .iter()
                .filter(|row| row[noc] == Value::from("USA"))
                .cloned()
                .collect();
            prop_assert_eq!(filtered.rows, expected);
            prop_assert_eq!(filtered.headers, cleaned.headers);
        }
    }
}

// =============================================================================
// Join Properties
// =============================================================================

mod join_tests {
    use super::*;

    proptest! {
        /// Joining never drops primary rows; unique keys keep the count exact.
        #[test]
        fn join_never_drops_rows(
            table in raw_table(),
            codes in prop::collection::vec("[A-Z]{3}", 0..6),
        ) {
            let cleaned = Cleaner::new().clean(&table);

            let reference = reference_table(codes.clone());
            let joined = left_join(&cleaned, &reference, "noc").unwrap();
            prop_assert!(joined.row_count() >= cleaned.row_count());

            let mut unique = codes;
            unique.sort();
            unique.dedup();
            let joined = left_join(&cleaned, &reference_table(unique), "noc").unwrap();
            prop_assert_eq!(joined.row_count(), cleaned.row_count());
        }
    }
}

// =============================================================================
// Aggregator Properties
// =============================================================================

mod aggregate_tests {
    use super::*;

    proptest! {
        /// Medal parts always sum to the total, and output is sorted.
        #[test]
        fn medal_parts_sum_to_total(table in raw_table()) {
            let cleaned = Cleaner::new().clean(&table);
            let summaries = Aggregator::new().summarize(&cleaned).unwrap();

            for s in &summaries {
                prop_assert_eq!(s.gold_count + s.silver_count + s.bronze_count, s.medal_count);
                prop_assert!(!s.primary.is_null() && !s.secondary.is_null());
            }
            for pair in summaries.windows(2) {
                let order = pair[0]
                    .primary
                    .sort_cmp(&pair[1].primary)
                    .then_with(|| pair[0].secondary.sort_cmp(&pair[1].secondary));
                prop_assert_eq!(order, std::cmp::Ordering::Less);
            }
        }

        /// Total medals across groups equals awarded medals in keyed rows.
        #[test]
        fn medal_totals_match_rows(table in raw_table()) {
            let cleaned = Cleaner::new().clean(&table);
            let summaries = Aggregator::new().summarize(&cleaned).unwrap();

            let year = cleaned.column_index("year").unwrap();
            let medal = cleaned.column_index("medal").unwrap();
            let expected = cleaned
                .rows
                .iter()
                .filter(|row| !row[year].is_null())
                .filter(|row| matches!(row[medal].as_str(), Some("Gold" | "Silver" | "Bronze")))
                .count();

            let total: usize = summaries.iter().map(|s| s.medal_count).sum();
            prop_assert_eq!(total, expected);
        }
    }
}
