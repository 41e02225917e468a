//! Dashboard configuration
//!
//! Settings are layered: built-in defaults, then an optional JSON file, then
//! `SOFTINTEL_*` environment variables. The CLI applies its flags last.
//!
//! Recognized environment variables:
//!   SOFTINTEL_DATA, SOFTINTEL_STRICT, SOFTINTEL_MODE, SOFTINTEL_YEAR,
//!   SOFTINTEL_CUBE_DIMENSION, SOFTINTEL_CUBE_METRIC, SOFTINTEL_CUBE_ROWS,
//!   SOFTINTEL_RISK_COUNT, SOFTINTEL_FORECAST_MONTHS, SOFTINTEL_FORECAST_DEFECTS,
//!   SOFTINTEL_SIGMA_FACTOR

use crate::dashboard::{CubeQuery, DashboardMode, DashboardRequest, DEFAULT_CUBE_ROWS};
use crate::error::{AnalyticsError, Result};
use crate::filter::FilterValue;
use crate::forecast::{
    ForecastModel, ForecastRequest, DEFAULT_DURATION_MONTHS, DEFAULT_TOTAL_DEFECTS,
    MAX_DURATION_MONTHS, SIGMA_FACTOR,
};
use crate::record::{Dimension, LoadPolicy, Metric, DEFAULT_DATA_PATH};
use crate::risk::DEFAULT_RISK_COUNT;
use log::debug;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Dataset location (`.json` or `.csv`)
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    #[serde(default)]
    pub load_policy: LoadPolicy,

    #[serde(default)]
    pub mode: DashboardMode,

    /// Fiscal-year filter for the overview ("todos" for all years)
    #[serde(default)]
    pub year: FilterValue,

    #[serde(default = "default_cube_dimension")]
    pub cube_dimension: Dimension,

    #[serde(default = "default_cube_metric")]
    pub cube_metric: Metric,

    #[serde(default = "default_cube_rows")]
    pub cube_rows: usize,

    #[serde(default = "default_risk_count")]
    pub risk_count: usize,

    #[serde(default = "default_forecast_months")]
    pub forecast_months: i64,

    #[serde(default = "default_forecast_defects")]
    pub forecast_defects: f64,

    /// Rayleigh shape factor (sigma = months * factor)
    #[serde(default = "default_sigma_factor")]
    pub sigma_factor: f64,
}

fn default_data_path() -> PathBuf { PathBuf::from(DEFAULT_DATA_PATH) }
fn default_cube_dimension() -> Dimension { Dimension::Stack }
fn default_cube_metric() -> Metric { Metric::Ingresos }
fn default_cube_rows() -> usize { DEFAULT_CUBE_ROWS }
fn default_risk_count() -> usize { DEFAULT_RISK_COUNT }
fn default_forecast_months() -> i64 { DEFAULT_DURATION_MONTHS as i64 }
fn default_forecast_defects() -> f64 { DEFAULT_TOTAL_DEFECTS }
fn default_sigma_factor() -> f64 { SIGMA_FACTOR }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            load_policy: LoadPolicy::default(),
            mode: DashboardMode::default(),
            year: FilterValue::All,
            cube_dimension: default_cube_dimension(),
            cube_metric: default_cube_metric(),
            cube_rows: default_cube_rows(),
            risk_count: default_risk_count(),
            forecast_months: default_forecast_months(),
            forecast_defects: default_forecast_defects(),
            sigma_factor: default_sigma_factor(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AnalyticsError::Config(format!("invalid value for {}: '{}'", name, raw)))
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(AnalyticsError::Config(format!("invalid value for {}: '{}'", name, raw))),
    }
}

impl DashboardConfig {
    /// Read a JSON config file; absent keys take their defaults
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| AnalyticsError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| AnalyticsError::Config(e.to_string()))
    }

    /// Defaults, then the optional file, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(p) => Self::from_path(p)?,
            None => Self::default(),
        };
        let config = base.with_overrides(|name| env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot honor
    ///
    /// Negative forecast durations are accepted here and clamped to 0 later.
    pub fn validate(&self) -> Result<()> {
        if self.forecast_months > MAX_DURATION_MONTHS as i64 {
            return Err(AnalyticsError::Config(format!(
                "forecast_months {} exceeds the maximum of {}",
                self.forecast_months, MAX_DURATION_MONTHS
            )));
        }
        Ok(())
    }

    /// Apply overrides from a variable lookup (the environment in production)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SOFTINTEL_DATA") {
            self.data_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SOFTINTEL_STRICT") {
            self.load_policy = if parse_flag("SOFTINTEL_STRICT", &v)? {
                LoadPolicy::Strict
            } else {
                LoadPolicy::Coerce
            };
        }
        if let Some(v) = lookup("SOFTINTEL_MODE") {
            self.mode = v.parse()?;
        }
        if let Some(v) = lookup("SOFTINTEL_YEAR") {
            self.year = FilterValue::from(v);
        }
        if let Some(v) = lookup("SOFTINTEL_CUBE_DIMENSION") {
            self.cube_dimension = v.parse()?;
        }
        if let Some(v) = lookup("SOFTINTEL_CUBE_METRIC") {
            self.cube_metric = v.parse()?;
        }
        if let Some(v) = lookup("SOFTINTEL_CUBE_ROWS") {
            self.cube_rows = parse_var("SOFTINTEL_CUBE_ROWS", &v)?;
        }
        if let Some(v) = lookup("SOFTINTEL_RISK_COUNT") {
            self.risk_count = parse_var("SOFTINTEL_RISK_COUNT", &v)?;
        }
        if let Some(v) = lookup("SOFTINTEL_FORECAST_MONTHS") {
            self.forecast_months = parse_var("SOFTINTEL_FORECAST_MONTHS", &v)?;
        }
        if let Some(v) = lookup("SOFTINTEL_FORECAST_DEFECTS") {
            self.forecast_defects = parse_var("SOFTINTEL_FORECAST_DEFECTS", &v)?;
        }
        if let Some(v) = lookup("SOFTINTEL_SIGMA_FACTOR") {
            self.sigma_factor = parse_var("SOFTINTEL_SIGMA_FACTOR", &v)?;
        }
        debug!("effective config: {:?}", self);
        Ok(self)
    }

    pub fn cube_query(&self) -> CubeQuery {
        CubeQuery {
            dimension: self.cube_dimension,
            metric: self.cube_metric,
            rows: self.cube_rows,
        }
    }

    pub fn forecast_request(&self) -> ForecastRequest {
        ForecastRequest {
            duration_months: self.forecast_months,
            total_defects: self.forecast_defects,
        }
    }

    pub fn forecast_model(&self) -> ForecastModel {
        ForecastModel::new(self.sigma_factor)
    }

    /// Dashboard request for the configured mode
    pub fn request(&self) -> DashboardRequest {
        DashboardRequest {
            mode: self.mode,
            year: self.year.clone(),
            cube: self.cube_query(),
            risk_count: self.risk_count,
            forecast: self.forecast_request(),
        }
    }
}
