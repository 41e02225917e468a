//! Ranking and top-N truncation of aggregation results

use super::AggregationResult;

/// Order entries by value, largest first; ties keep their incoming order
pub fn rank_descending(mut result: AggregationResult) -> AggregationResult {
    result.entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    result
}

/// Order entries by value, smallest first; ties keep their incoming order
pub fn rank_ascending(mut result: AggregationResult) -> AggregationResult {
    result.entries.sort_by(|a, b| a.value.total_cmp(&b.value));
    result
}

/// Keep the first `n` entries (all of them when there are fewer)
pub fn top_n(mut result: AggregationResult, n: usize) -> AggregationResult {
    result.entries.truncate(n);
    result
}
