//! Grouped medal summaries.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clean::Medal;
use crate::error::{PipelineError, Result};
use crate::table::{Table, Value};

/// Metric columns written after the two group columns.
pub const METRIC_COLUMNS: &[&str] = &[
    "total_athletes",
    "gold_count",
    "silver_count",
    "bronze_count",
    "medal_count",
    "avg_age",
];

/// What to group by and which columns feed the metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateSpec {
    /// Primary and secondary grouping columns.
    pub group_by: [String; 2],
    /// Column whose distinct values are counted as athletes.
    pub identity_column: String,
    /// Column holding cleaned medal labels.
    pub medal_column: String,
    /// Numeric column averaged per group.
    pub mean_column: String,
    /// Keep groups whose key contains a null.
    pub keep_null_keys: bool,
}

impl Default for AggregateSpec {
    fn default() -> Self {
        Self {
            group_by: ["year".to_string(), "sport".to_string()],
            identity_column: "name".to_string(),
            medal_column: "medal".to_string(),
            mean_column: "age".to_string(),
            keep_null_keys: false,
        }
    }
}

/// Summary metrics for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    /// Primary group key.
    pub primary: Value,
    /// Secondary group key.
    pub secondary: Value,
    /// Distinct non-null identity values. Athletes sharing a name count once.
    pub total_athletes: usize,
    pub gold_count: usize,
    pub silver_count: usize,
    pub bronze_count: usize,
    /// Rows with any awarded medal.
    pub medal_count: usize,
    /// Mean of the numeric column, or `None` when the group has no values.
    pub avg_age: Option<f64>,
}

#[derive(Default)]
struct GroupAccumulator {
    identities: HashSet<Value>,
    gold: usize,
    silver: usize,
    bronze: usize,
    sum: f64,
    n: usize,
}

impl GroupAccumulator {
    fn finish(self, primary: Value, secondary: Value) -> GroupSummary {
        GroupSummary {
            primary,
            secondary,
            total_athletes: self.identities.len(),
            gold_count: self.gold,
            silver_count: self.silver,
            bronze_count: self.bronze,
            medal_count: self.gold + self.silver + self.bronze,
            avg_age: (self.n > 0).then(|| self.sum / self.n as f64),
        }
    }
}

/// Groups a cleaned table and computes per-group metrics.
pub struct Aggregator {
    spec: AggregateSpec,
}

impl Aggregator {
    /// Create an aggregator grouping by year and sport.
    pub fn new() -> Self {
        Self::with_spec(AggregateSpec::default())
    }

    /// Create an aggregator with a custom spec.
    pub fn with_spec(spec: AggregateSpec) -> Self {
        Self { spec }
    }

    /// Compute one summary per group, sorted by primary then secondary key.
    pub fn summarize(&self, table: &Table) -> Result<Vec<GroupSummary>> {
        let [primary_name, secondary_name] = &self.spec.group_by;
        let primary_idx = required_column(table, primary_name)?;
        let secondary_idx = required_column(table, secondary_name)?;
        let medal_idx = required_column(table, &self.spec.medal_column)?;

        let identity_idx = table.column_index(&self.spec.identity_column);
        if identity_idx.is_none() {
            warn!(column = %self.spec.identity_column, "identity column missing, athlete counts will be zero");
        }
        let mean_idx = table.column_index(&self.spec.mean_column);
        if mean_idx.is_none() {
            warn!(column = %self.spec.mean_column, "mean column missing, averages will be null");
        }

        let mut groups: IndexMap<(Value, Value), GroupAccumulator> = IndexMap::new();
        let mut skipped = 0;

        for row in &table.rows {
            let key = (
                Table::cell(row, primary_idx).clone(),
                Table::cell(row, secondary_idx).clone(),
            );
            if !self.spec.keep_null_keys && (key.0.is_null() || key.1.is_null()) {
                skipped += 1;
                continue;
            }

            let acc = groups.entry(key).or_default();

            if let Some(idx) = identity_idx {
                let identity = Table::cell(row, idx);
                if !identity.is_null() {
                    acc.identities.insert(identity.clone());
                }
            }

            match Medal::from_label(Table::cell(row, medal_idx)) {
                Medal::Gold => acc.gold += 1,
                Medal::Silver => acc.silver += 1,
                Medal::Bronze => acc.bronze += 1,
                Medal::None => {}
            }

            if let Some(x) = mean_idx.and_then(|idx| Table::cell(row, idx).as_f64()) {
                acc.sum += x;
                acc.n += 1;
            }
        }

        let mut summaries: Vec<GroupSummary> = groups
            .into_iter()
            .map(|((p, s), acc)| acc.finish(p, s))
            .collect();
        summaries.sort_by(|a, b| {
            a.primary
                .sort_cmp(&b.primary)
                .then_with(|| a.secondary.sort_cmp(&b.secondary))
        });

        debug!(
            groups = summaries.len(),
            skipped_null_keys = skipped,
            "aggregated table"
        );

        Ok(summaries)
    }

    /// Compute the summaries as a table: the two group columns followed by
    /// [`METRIC_COLUMNS`].
    pub fn aggregate(&self, table: &Table) -> Result<Table> {
        let summaries = self.summarize(table)?;

        let mut headers: Vec<String> = self.spec.group_by.to_vec();
        headers.extend(METRIC_COLUMNS.iter().map(|c| c.to_string()));

        let rows = summaries
            .into_iter()
            .map(|s| {
                vec![
                    s.primary,
                    s.secondary,
                    Value::Int(s.total_athletes as i64),
                    Value::Int(s.gold_count as i64),
                    Value::Int(s.silver_count as i64),
                    Value::Int(s.bronze_count as i64),
                    Value::Int(s.medal_count as i64),
                    s.avg_age.into(),
                ]
            })
            .collect();

        Ok(Table { headers, rows })
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn required_column(table: &Table, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| PipelineError::MissingColumn(format!("aggregation needs '{}'", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::Cleaner;

    fn events() -> Table {
        Cleaner::new().clean(&Table::from_strings(
            &["name", "age", "year", "sport", "medal"],
            &[
                &["Alice", "20", "2000", "Swimming", "Gold"],
                &["Bob", "24", "2000", "Swimming", "Silver"],
                &["Alice", "20", "2000", "Swimming", ""],
                &["Carol", "", "1996", "Rowing", "Bronze"],
                &["Dan", "30", "2000", "Archery", "NA"],
            ],
        ))
    }

    #[test]
    fn test_two_medals_one_group() {
        let table = Cleaner::new().clean(&Table::from_strings(
            &["year", "sport", "medal"],
            &[&["2000", "Swimming", "Gold"], &["2000", "Swimming", "Silver"]],
        ));
        let summaries = Aggregator::new().summarize(&table).unwrap();

        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.primary, Value::Int(2000));
        assert_eq!(s.secondary, Value::from("Swimming"));
        assert_eq!((s.gold_count, s.silver_count, s.bronze_count), (1, 1, 0));
        assert_eq!(s.medal_count, 2);
        assert_eq!(s.total_athletes, 0);
        assert_eq!(s.avg_age, None);
    }

    #[test]
    fn test_summaries_sorted_and_counted() {
        let summaries = Aggregator::new().summarize(&events()).unwrap();

        let keys: Vec<(Value, Value)> = summaries
            .iter()
            .map(|s| (s.primary.clone(), s.secondary.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Value::Int(1996), Value::from("Rowing")),
                (Value::Int(2000), Value::from("Archery")),
                (Value::Int(2000), Value::from("Swimming")),
            ]
        );

        let rowing = &summaries[0];
        assert_eq!(rowing.total_athletes, 1);
        assert_eq!(rowing.avg_age, None);
        assert_eq!(rowing.medal_count, 1);

        let archery = &summaries[1];
        assert_eq!(archery.medal_count, 0);
        assert_eq!(archery.avg_age, Some(30.0));

        let swimming = &summaries[2];
        assert_eq!(swimming.total_athletes, 2);
        assert_eq!(swimming.medal_count, 2);
        assert_eq!(swimming.avg_age, Some(64.0 / 3.0));
    }

    #[test]
    fn test_medal_totals_match_parts() {
        for s in Aggregator::new().summarize(&events()).unwrap() {
            assert_eq!(s.gold_count + s.silver_count + s.bronze_count, s.medal_count);
        }
    }

    #[test]
    fn test_null_keys_dropped_unless_kept() {
        let table = Cleaner::new().clean(&Table::from_strings(
            &["year", "sport", "medal"],
            &[&["NA", "Judo", "Gold"], &["2004", "Judo", "Gold"]],
        ));

        let dropped = Aggregator::new().summarize(&table).unwrap();
        assert_eq!(dropped.len(), 1);

        let kept = Aggregator::with_spec(AggregateSpec {
            keep_null_keys: true,
            ..AggregateSpec::default()
        })
        .summarize(&table)
        .unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].primary, Value::Null);
    }

    #[test]
    fn test_aggregate_table_layout() {
        let table = Aggregator::new().aggregate(&events()).unwrap();

        assert_eq!(
            table.headers,
            vec![
                "year",
                "sport",
                "total_athletes",
                "gold_count",
                "silver_count",
                "bronze_count",
                "medal_count",
                "avg_age"
            ]
        );
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.value(0, "avg_age"), Some(&Value::Null));
        assert_eq!(table.value(1, "avg_age"), Some(&Value::Float(30.0)));
    }

    #[test]
    fn test_missing_group_column_is_error() {
        let table = Table::from_strings(&["year", "medal"], &[&["2000", "Gold"]]);
        assert!(matches!(
            Aggregator::new().summarize(&table),
            Err(PipelineError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_empty_table_has_no_groups() {
        let table = Table::empty(vec!["year".into(), "sport".into(), "medal".into()]);
        let out = Aggregator::new().aggregate(&table).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.column_count(), 8);
    }

    #[test]
    fn test_short_rows_read_as_null() {
        let table = Table {
            headers: ["name", "noc", "year", "sport", "medal"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            rows: vec![
                vec![Value::from("Alice")],
                vec![Value::from("Bob"), Value::from("USA"), Value::Int(2000), Value::from("Rowing")],
            ],
        };
        let summaries = Aggregator::new().summarize(&table).unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_athletes, 1);
        assert_eq!(summaries[0].medal_count, 0);
    }
}
