//! Headline KPI summary for the overview page

use crate::aggregation::{global_mean, total};
use crate::record::{Metric, ProjectRecord};
use serde::{Deserialize, Serialize};

/// Four headline scalars for a (possibly filtered) record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_revenue: f64,
    /// Mean ROI in percent; 0 for an empty set
    pub mean_roi: f64,
    pub project_count: usize,
    pub total_defects: f64,
}

impl KpiSummary {
    pub fn from_records(records: &[ProjectRecord]) -> Self {
        Self {
            total_revenue: total(records, Metric::Ingresos),
            mean_roi: global_mean(records, Metric::Roi),
            project_count: records.len(),
            total_defects: total(records, Metric::Defectos),
        }
    }
}
