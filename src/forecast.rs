//! Rayleigh defect-discovery forecast
//!
//! Models the expected number of defects found per month over a project's
//! life as a Rayleigh density scaled by the total defect count:
//!
//! ```text
//! sigma      = duration_months * SIGMA_FACTOR
//! density(t) = (t / sigma^2) * exp(-t^2 / (2 sigma^2))
//! expected   = total_defects * density(t)      for t in 0..=duration_months
//! ```
//!
//! The curve peaks at `t = sigma`; the reported peak month is `floor(sigma)`,
//! capped at the last month of the window.

use log::warn;
use serde::{Deserialize, Serialize};

/// Shape parameter: sigma as a fraction of the project duration
pub const SIGMA_FACTOR: f64 = 0.4;

/// Default project duration used by the strategy view
pub const DEFAULT_DURATION_MONTHS: u32 = 12;

/// Default total defect estimate used by the strategy view
pub const DEFAULT_TOTAL_DEFECTS: f64 = 100.0;

/// Longest forecast window accepted (100 years)
pub const MAX_DURATION_MONTHS: u32 = 1200;

/// One month of the forecast series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: u32,
    pub label: String,
    pub expected_defects: f64,
}

/// Complete forecast output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectForecast {
    pub duration_months: u32,
    pub total_defects: f64,
    pub sigma: f64,
    /// Month of maximum expected discovery, `floor(sigma)`
    pub peak_month: u32,
    pub points: Vec<ForecastPoint>,
}

impl DefectForecast {
    /// Sum of expected defects across the forecast window
    pub fn expected_total(&self) -> f64 {
        self.points.iter().map(|p| p.expected_defects).sum()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Forecast inputs as received at the call boundary, before clamping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub duration_months: i64,
    pub total_defects: f64,
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self {
            duration_months: DEFAULT_DURATION_MONTHS as i64,
            total_defects: DEFAULT_TOTAL_DEFECTS,
        }
    }
}

impl ForecastRequest {
    /// Clamp to a valid domain: 0 <= duration <= [`MAX_DURATION_MONTHS`],
    /// defects finite and >= 0
    ///
    /// Negative durations clamp to 0 rather than 1, so a degenerate request
    /// yields the single `(0, 0)` point of a zero-month forecast.
    pub fn sanitized(&self) -> (u32, f64) {
        let duration = if self.duration_months < 0 {
            warn!("forecast duration {} is negative, using 0", self.duration_months);
            0
        } else if self.duration_months > MAX_DURATION_MONTHS as i64 {
            warn!(
                "forecast duration {} exceeds {} months, capping",
                self.duration_months, MAX_DURATION_MONTHS
            );
            MAX_DURATION_MONTHS
        } else {
            self.duration_months as u32
        };

        let defects = if self.total_defects.is_finite() && self.total_defects >= 0.0 {
            self.total_defects
        } else {
            warn!("forecast defect total {} is invalid, using 0", self.total_defects);
            0.0
        };

        (duration, defects)
    }
}

/// Rayleigh forecast model with a tunable shape factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastModel {
    pub sigma_factor: f64,
}

impl Default for ForecastModel {
    fn default() -> Self {
        Self { sigma_factor: SIGMA_FACTOR }
    }
}

impl ForecastModel {
    pub fn new(sigma_factor: f64) -> Self {
        Self { sigma_factor }
    }

    /// Rayleigh density at month `t`; 0 when sigma is degenerate
    pub fn density(t: f64, sigma: f64) -> f64 {
        if sigma.is_nan() || sigma <= 0.0 {
            return 0.0;
        }
        let sigma_sq = sigma * sigma;
        (t / sigma_sq) * (-(t * t) / (2.0 * sigma_sq)).exp()
    }

    /// Compute the series for months `0..=duration_months`
    pub fn simulate(&self, duration_months: u32, total_defects: f64) -> DefectForecast {
        let total_defects = if total_defects.is_finite() { total_defects.max(0.0) } else { 0.0 };
        let factor = if self.sigma_factor.is_finite() && self.sigma_factor >= 0.0 {
            self.sigma_factor
        } else {
            warn!("sigma factor {} is invalid, forecast will be flat", self.sigma_factor);
            0.0
        };
        let sigma = duration_months as f64 * factor;

        let points = (0..=duration_months)
            .map(|t| ForecastPoint {
                month: t,
                label: format!("Month {}", t),
                expected_defects: total_defects * Self::density(t as f64, sigma),
            })
            .collect();

        DefectForecast {
            duration_months,
            total_defects,
            sigma,
            peak_month: (sigma.floor() as u32).min(duration_months),
            points,
        }
    }

    /// Clamp a raw request and simulate it
    pub fn simulate_request(&self, request: &ForecastRequest) -> DefectForecast {
        let (duration, defects) = request.sanitized();
        self.simulate(duration, defects)
    }
}

/// Simulate with the standard shape factor
pub fn simulate_defect_forecast(duration_months: u32, total_defects: f64) -> DefectForecast {
    ForecastModel::default().simulate(duration_months, total_defects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_twelve_month_forecast() {
        let forecast = simulate_defect_forecast(12, 100.0);
        assert_eq!(forecast.len(), 13);
        assert_eq!(forecast.points[0].expected_defects, 0.0);
        assert_eq!(forecast.peak_month, 4);
        assert_relative_eq!(forecast.sigma, 4.8, epsilon = 1e-12);
        assert_eq!(forecast.points[12].label, "Month 12");

        // t = 4: (4 / 23.04) * exp(-16 / 46.08) * 100
        let expected = 100.0 * (4.0 / 23.04) * (-16.0_f64 / 46.08).exp();
        assert_relative_eq!(forecast.points[4].expected_defects, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_curve_rises_then_falls() {
        let forecast = simulate_defect_forecast(12, 100.0);
        let values: Vec<f64> = forecast.points.iter().map(|p| p.expected_defects).collect();
        // Continuous peak is at 4.8, so month 5 is the discrete maximum
        assert!(values[1] < values[4]);
        assert!(values[4] < values[5]);
        assert!(values[5] > values[6]);
        assert!(values[6] > values[12]);
    }

    #[test]
    fn test_zero_duration_has_no_nan() {
        let forecast = simulate_defect_forecast(0, 100.0);
        assert_eq!(forecast.len(), 1);
        assert_eq!(forecast.points[0].month, 0);
        assert_eq!(forecast.points[0].expected_defects, 0.0);
        assert_eq!(forecast.peak_month, 0);
    }

    #[test]
    fn test_degenerate_requests_are_clamped() {
        let model = ForecastModel::default();

        let forecast = model.simulate_request(&ForecastRequest { duration_months: -3, total_defects: 100.0 });
        assert_eq!(forecast.len(), 1);
        assert_eq!(forecast.duration_months, 0);

        let forecast = model.simulate_request(&ForecastRequest { duration_months: 6, total_defects: -50.0 });
        assert_eq!(forecast.total_defects, 0.0);
        assert!(forecast.points.iter().all(|p| p.expected_defects == 0.0));

        let forecast = model.simulate(6, f64::NAN);
        assert!(forecast.points.iter().all(|p| p.expected_defects.is_finite()));
    }

    #[test]
    fn test_custom_sigma_factor() {
        let forecast = ForecastModel::new(0.5).simulate(10, 50.0);
        assert_relative_eq!(forecast.sigma, 5.0);
        assert_eq!(forecast.peak_month, 5);
    }

    #[test]
    fn test_wide_sigma_peaks_inside_window() {
        let forecast = ForecastModel::new(5.0).simulate(12, 100.0);
        assert_relative_eq!(forecast.sigma, 60.0);
        assert_eq!(forecast.peak_month, 12);
    }

    #[test]
    fn test_invalid_sigma_factor_is_flat() {
        for factor in [-0.4, f64::NAN, f64::INFINITY] {
            let forecast = ForecastModel::new(factor).simulate(12, 100.0);
            assert_eq!(forecast.sigma, 0.0);
            assert_eq!(forecast.peak_month, 0);
            assert!(forecast.points.iter().all(|p| p.expected_defects == 0.0));
        }
    }

    #[test]
    fn test_duration_is_capped() {
        let request = ForecastRequest { duration_months: u32::MAX as i64, total_defects: 10.0 };
        assert_eq!(request.sanitized().0, MAX_DURATION_MONTHS);
        let forecast = ForecastModel::default().simulate_request(&request);
        assert_eq!(forecast.len(), MAX_DURATION_MONTHS as usize + 1);
    }

    #[test]
    fn test_expected_total_approaches_defect_count() {
        // Over a long window the discrete sum approximates the full integral
        let forecast = ForecastModel::new(0.1).simulate(200, 100.0);
        assert_relative_eq!(forecast.expected_total(), 100.0, epsilon = 1.0);
    }
}
