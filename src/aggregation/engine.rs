//! Group-by aggregation over project records

use crate::error::AnalyticsError;
use crate::record::{Dimension, Metric, ProjectRecord};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Reduction applied to each group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    Sum,
    Count,
    Mean,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Sum => "SUM",
            Operator::Count => "COUNT",
            Operator::Mean => "MEAN",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUM" => Ok(Operator::Sum),
            "COUNT" => Ok(Operator::Count),
            "MEAN" | "AVG" => Ok(Operator::Mean),
            _ => Err(AnalyticsError::UnknownOperator(s.to_string())),
        }
    }
}

/// One (key, value) pair of an aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub key: String,
    pub value: f64,
}

/// Ordered aggregation output with unique keys
///
/// Order is first-seen key order straight out of [`aggregate`], or rank order
/// after passing through the ranking stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub dimension: Dimension,
    pub operator: Operator,
    /// Reduced metric; `None` for COUNT
    pub metric: Option<Metric>,
    pub entries: Vec<AggregateEntry>,
}

impl AggregationResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggregateEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.value)
    }

    /// Look up the value for a key
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.key == key).map(|e| e.value)
    }

    /// Sum of all group values
    pub fn total(&self) -> f64 {
        self.values().sum()
    }

    /// Name of the displayed quantity, e.g. `"Ingresos"` or `"COUNT"`
    pub fn value_label(&self) -> String {
        match (self.operator, self.metric) {
            (Operator::Count, _) | (_, None) => Operator::Count.to_string(),
            (Operator::Sum, Some(m)) => m.to_string(),
            (Operator::Mean, Some(m)) => format!("MEAN({})", m),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
}

/// Group `records` by `dimension` and reduce each group with `operator`
///
/// COUNT ignores `metric`. Every group holds at least one record, so MEAN
/// never divides by zero.
pub fn aggregate(
    records: &[ProjectRecord],
    dimension: Dimension,
    metric: Metric,
    operator: Operator,
) -> AggregationResult {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Accumulator)> = Vec::new();

    for record in records {
        let key = dimension.key_of(record);
        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, Accumulator::default()));
                groups.len() - 1
            }
        };
        let acc = &mut groups[slot].1;
        acc.count += 1;
        if operator != Operator::Count {
            acc.sum += metric.value_of(record);
        }
    }

    let entries: Vec<AggregateEntry> = groups
        .into_iter()
        .map(|(key, acc)| {
            let value = match operator {
                Operator::Sum => acc.sum,
                Operator::Count => acc.count as f64,
                Operator::Mean => mean(acc.sum, acc.count),
            };
            AggregateEntry { key, value }
        })
        .collect();

    debug!(
        "aggregate {} of {} by {}: {} records -> {} groups",
        operator, metric, dimension, records.len(), entries.len()
    );

    AggregationResult {
        dimension,
        operator,
        metric: (operator != Operator::Count).then_some(metric),
        entries,
    }
}

/// Count group membership per key
pub fn count_by(records: &[ProjectRecord], dimension: Dimension) -> AggregationResult {
    // Metric is ignored for COUNT
    aggregate(records, dimension, Metric::Defectos, Operator::Count)
}

/// Arithmetic mean defined as 0 over an empty population
pub fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Sum of a metric over all records
pub fn total(records: &[ProjectRecord], metric: Metric) -> f64 {
    records.iter().map(|r| metric.value_of(r)).sum()
}

/// Mean of a metric over all records; 0 when there are none
pub fn global_mean(records: &[ProjectRecord], metric: Metric) -> f64 {
    mean(total(records, metric), records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn records() -> Vec<ProjectRecord> {
        vec![
            ProjectRecord::new("A", "Java Spring", "Completado", 2022, 100.0, 80.0, 90.0, 25.0, 8.0, 3),
            ProjectRecord::new("B", "PHP / Laravel", "Cancelado", 2023, 0.0, 20.0, 90.0, -100.0, 0.0, 10),
            ProjectRecord::new("C", "Java Spring", "Retrasado", 2023, 50.0, 60.0, 50.0, -16.67, 4.0, 20),
            ProjectRecord::new("D", "Python / Django", "Completado", 2024, 200.0, 150.0, 160.0, 33.33, 9.0, 5),
        ]
    }

    #[test]
    fn test_sum_by_stack_in_first_seen_order() {
        let result = aggregate(&records(), Dimension::Stack, Metric::Ingresos, Operator::Sum);
        let keys: Vec<&str> = result.keys().collect();
        assert_eq!(keys, vec!["Java Spring", "PHP / Laravel", "Python / Django"]);
        assert_relative_eq!(result.get("Java Spring").unwrap(), 150.0);
        assert_relative_eq!(result.get("PHP / Laravel").unwrap(), 0.0);
        assert_eq!(result.metric, Some(Metric::Ingresos));
    }

    #[test]
    fn test_count_by_status() {
        let result = count_by(&records(), Dimension::Estado);
        assert_eq!(result.get("Completado"), Some(2.0));
        assert_eq!(result.get("Cancelado"), Some(1.0));
        assert_eq!(result.total(), 4.0);
        assert_eq!(result.metric, None);
        assert_eq!(result.value_label(), "COUNT");
    }

    #[test]
    fn test_mean_roi_by_year() {
        let result = aggregate(&records(), Dimension::Anio, Metric::Roi, Operator::Mean);
        assert_relative_eq!(result.get("2023").unwrap(), (-100.0 - 16.67) / 2.0, epsilon = 1e-9);
        assert_relative_eq!(result.get("2022").unwrap(), 25.0);
        assert_eq!(result.value_label(), "MEAN(ROI)");
    }

    #[test]
    fn test_partition_sum() {
        let data = records();
        for dim in Dimension::ALL {
            let result = aggregate(&data, dim, Metric::Costo, Operator::Sum);
            assert_relative_eq!(result.total(), total(&data, Metric::Costo), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_empty_input() {
        let result = aggregate(&[], Dimension::Stack, Metric::Roi, Operator::Mean);
        assert!(result.is_empty());
        assert_eq!(global_mean(&[], Metric::Roi), 0.0);
    }

    #[test]
    fn test_numeric_looking_labels_stay_distinct() {
        let data: Vec<ProjectRecord> = ["007", "7", "1e1", "10"]
            .into_iter()
            .map(|client| ProjectRecord::new(client, "S", "Completado", 2023, 1.0, 1.0, 1.0, 0.0, 5.0, 1))
            .collect();
        let result = count_by(&data, Dimension::Client);
        let keys: Vec<&str> = result.keys().collect();
        assert_eq!(keys, vec!["007", "7", "1e1", "10"]);
        assert!(result.values().all(|v| v == 1.0));
    }

    #[test]
    fn test_colliding_keys_merge() {
        let mut data = records();
        data[0].stack = "Java Spring ".to_string();
        let result = count_by(&data, Dimension::Stack);
        assert_eq!(result.get("Java Spring"), Some(2.0));
    }

    #[test]
    fn test_parse_operator() {
        assert_eq!("sum".parse::<Operator>().unwrap(), Operator::Sum);
        assert_eq!("Mean".parse::<Operator>().unwrap(), Operator::Mean);
        assert!(matches!("median".parse::<Operator>(), Err(AnalyticsError::UnknownOperator(_))));
    }
}
