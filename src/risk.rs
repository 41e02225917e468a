//! Risk selector: projects losing money, worst first

use crate::record::{ProjectRecord, ProjectStatus};
use serde::{Deserialize, Serialize};

/// Default size of the risk list
pub const DEFAULT_RISK_COUNT: usize = 5;

/// Row of the risk list handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEntry {
    pub client: String,
    pub stack: String,
    pub roi: f64,
    pub status: ProjectStatus,
}

impl From<&ProjectRecord> for RiskEntry {
    fn from(record: &ProjectRecord) -> Self {
        Self {
            client: record.client.clone(),
            stack: record.stack.clone(),
            roi: record.roi,
            status: record.status.clone(),
        }
    }
}

/// Records with negative ROI, most negative first, at most `n` of them
///
/// Equal ROI values keep their dataset order.
pub fn select_top_risks(records: &[ProjectRecord], n: usize) -> Vec<&ProjectRecord> {
    let mut at_risk: Vec<&ProjectRecord> = records.iter().filter(|r| r.roi < 0.0).collect();
    at_risk.sort_by(|a, b| a.roi.total_cmp(&b.roi));
    at_risk.truncate(n);
    at_risk
}

/// Risk list as presentation rows
pub fn risk_entries(records: &[ProjectRecord], n: usize) -> Vec<RiskEntry> {
    select_top_risks(records, n).into_iter().map(RiskEntry::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(client: &str, roi: f64) -> ProjectRecord {
        ProjectRecord::new(client, "Java Spring", "Retrasado", 2023, 10.0, 10.0, 10.0, roi, 3.0, 1)
    }

    #[test]
    fn test_three_negative_records() {
        let data = vec![
            record("a", 12.0),
            record("b", -5.5),
            record("c", 0.0),
            record("d", -40.0),
            record("e", 80.0),
            record("f", -12.25),
        ];

        let risks = select_top_risks(&data, 5);
        let clients: Vec<&str> = risks.iter().map(|r| r.client.as_str()).collect();
        assert_eq!(clients, vec!["d", "f", "b"]);
    }

    #[test]
    fn test_truncates_to_n() {
        let data: Vec<ProjectRecord> = (0..10).map(|i| record(&i.to_string(), -(i as f64) - 1.0)).collect();
        let risks = select_top_risks(&data, 5);
        assert_eq!(risks.len(), 5);
        assert_eq!(risks[0].roi, -10.0);
        assert_eq!(risks[4].roi, -6.0);
    }

    #[test]
    fn test_zero_roi_is_not_a_risk() {
        let data = vec![record("a", 0.0), record("b", 5.0)];
        assert!(select_top_risks(&data, 5).is_empty());
        assert!(select_top_risks(&[], 5).is_empty());
    }

    #[test]
    fn test_risk_entry_fields() {
        let data = vec![record("loss", -20.0)];
        let entries = risk_entries(&data, DEFAULT_RISK_COUNT);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].client, "loss");
        assert_eq!(entries[0].stack, "Java Spring");
        assert_eq!(entries[0].status, ProjectStatus::Retrasado);
    }
}
