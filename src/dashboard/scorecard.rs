//! Balanced scorecard (financial, customer, process perspectives)

use crate::aggregation::global_mean;
use crate::record::{Metric, ProjectRecord};
use serde::{Deserialize, Serialize};

/// Mean ROI above this is healthy
pub const ROI_GREEN_THRESHOLD: f64 = 15.0;

/// Mean ROI above this (and not healthy) is a warning
pub const ROI_YELLOW_THRESHOLD: f64 = 0.0;

/// Traffic-light status for a scorecard perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrafficLight {
    Green,
    Yellow,
    Red,
}

impl TrafficLight {
    /// Classify a mean ROI, rounded to one decimal as displayed
    pub fn for_roi(mean_roi: f64) -> Self {
        let shown = (mean_roi * 10.0).round() / 10.0;
        if shown > ROI_GREEN_THRESHOLD {
            TrafficLight::Green
        } else if shown > ROI_YELLOW_THRESHOLD {
            TrafficLight::Yellow
        } else {
            TrafficLight::Red
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    /// Financial perspective: mean ROI (%)
    pub mean_roi: f64,
    /// Customer perspective: mean NPS
    pub mean_nps: f64,
    /// Process perspective: mean defects per project, rounded
    pub mean_defects: f64,
    pub financial_light: TrafficLight,
}

impl Scorecard {
    pub fn from_records(records: &[ProjectRecord]) -> Self {
        let mean_roi = global_mean(records, Metric::Roi);
        Self {
            mean_roi,
            mean_nps: global_mean(records, Metric::Nps),
            mean_defects: global_mean(records, Metric::Defectos).round(),
            financial_light: TrafficLight::for_roi(mean_roi),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traffic_light_thresholds() {
        assert_eq!(TrafficLight::for_roi(32.0), TrafficLight::Green);
        assert_eq!(TrafficLight::for_roi(15.04), TrafficLight::Yellow); // shows as 15.0
        assert_eq!(TrafficLight::for_roi(15.06), TrafficLight::Green); // shows as 15.1
        assert_eq!(TrafficLight::for_roi(0.3), TrafficLight::Yellow);
        assert_eq!(TrafficLight::for_roi(0.04), TrafficLight::Red);
        assert_eq!(TrafficLight::for_roi(-12.0), TrafficLight::Red);
    }

    #[test]
    fn test_scorecard() {
        let data = vec![
            ProjectRecord::new("a", "s", "Completado", 2023, 1.0, 1.0, 1.0, 40.0, 9.0, 10),
            ProjectRecord::new("b", "s", "Retrasado", 2023, 1.0, 1.0, 1.0, -10.0, 3.0, 13),
        ];
        let card = Scorecard::from_records(&data);
        assert_eq!(card.mean_roi, 15.0);
        assert_eq!(card.mean_nps, 6.0);
        assert_eq!(card.mean_defects, 12.0); // 11.5 rounds away from zero
        assert_eq!(card.financial_light, TrafficLight::Yellow);
    }

    #[test]
    fn test_empty_scorecard() {
        let card = Scorecard::from_records(&[]);
        assert_eq!(card.mean_roi, 0.0);
        assert_eq!(card.mean_nps, 0.0);
        assert_eq!(card.mean_defects, 0.0);
        assert_eq!(card.financial_light, TrafficLight::Red);
    }
}
