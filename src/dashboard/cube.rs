//! OLAP cube explorer: pivot any dimension against any metric

use crate::aggregation::{aggregate, rank_descending, top_n, AggregationResult, Operator};
use crate::record::{Dimension, Metric, ProjectRecord};
use serde::{Deserialize, Serialize};

/// Rows kept in the cube chart and table
pub const DEFAULT_CUBE_ROWS: usize = 15;

/// Percentages are averaged per group; amounts and counts are summed
pub fn operator_for(metric: Metric) -> Operator {
    if metric.is_percentage() {
        Operator::Mean
    } else {
        Operator::Sum
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeQuery {
    pub dimension: Dimension,
    pub metric: Metric,
    pub rows: usize,
}

impl Default for CubeQuery {
    fn default() -> Self {
        Self {
            dimension: Dimension::Stack,
            metric: Metric::Ingresos,
            rows: DEFAULT_CUBE_ROWS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeView {
    pub title: String,
    pub table: AggregationResult,
}

impl CubeQuery {
    pub fn run(&self, records: &[ProjectRecord]) -> CubeView {
        let grouped = aggregate(records, self.dimension, self.metric, operator_for(self.metric));
        CubeView {
            title: format!("{} by {}", self.metric, self.dimension),
            table: top_n(rank_descending(grouped), self.rows),
        }
    }
}
