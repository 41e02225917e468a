//! Filter stage: select records by a scalar predicate on one dimension

use crate::record::{Dimension, ProjectRecord};
use log::debug;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Sentinel values meaning "no filtering requested"
const ALL_SENTINELS: [&str; 3] = ["todos", "all", "*"];

/// A filter value, either the "all" sentinel or a trimmed value to match
///
/// The value is normalized against the target dimension when the filter runs,
/// so `"2023.0"` matches year 2023 but never a client named `"2023"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterValue {
    #[default]
    All,
    Equals(String),
}

impl FilterValue {
    pub fn equals(raw: &str) -> Self {
        FilterValue::Equals(raw.trim().to_string())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FilterValue::All)
    }
}

impl From<&str> for FilterValue {
    fn from(raw: &str) -> Self {
        let trimmed = raw.trim();
        if ALL_SENTINELS.iter().any(|s| trimmed.eq_ignore_ascii_case(s)) {
            FilterValue::All
        } else {
            FilterValue::equals(trimmed)
        }
    }
}

impl From<String> for FilterValue {
    fn from(raw: String) -> Self {
        FilterValue::from(raw.as_str())
    }
}

impl From<i32> for FilterValue {
    fn from(year: i32) -> Self {
        FilterValue::Equals(year.to_string())
    }
}

impl From<FilterValue> for String {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::All => "todos".to_string(),
            FilterValue::Equals(key) => key,
        }
    }
}

impl FromStr for FilterValue {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FilterValue::from(s))
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::All => f.write_str("todos"),
            FilterValue::Equals(key) => f.write_str(key),
        }
    }
}

/// Select the records whose `dimension` equals `value` in canonical form
///
/// `FilterValue::All` returns the input slice itself, borrowed.
pub fn filter_records<'a>(
    records: &'a [ProjectRecord],
    dimension: Dimension,
    value: &FilterValue,
) -> Cow<'a, [ProjectRecord]> {
    match value {
        FilterValue::All => Cow::Borrowed(records),
        FilterValue::Equals(raw) => {
            let key = dimension.normalize(raw);
            let subset: Vec<ProjectRecord> = records
                .iter()
                .filter(|r| dimension.key_of(r) == key)
                .cloned()
                .collect();
            debug!("filter {}={}: {} of {} records", dimension, key, subset.len(), records.len());
            Cow::Owned(subset)
        }
    }
}

/// Convenience for the common fiscal-year filter
pub fn filter_by_year<'a>(records: &'a [ProjectRecord], year: &FilterValue) -> Cow<'a, [ProjectRecord]> {
    filter_records(records, Dimension::Anio, year)
}
