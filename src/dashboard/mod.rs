//! Dashboard views assembled from the aggregation core
//!
//! The application shell picks a [`DashboardMode`] from configuration and asks
//! the [`Dashboard`] for the matching view. Every call recomputes from the
//! immutable record snapshot and returns a fresh value; nothing is cached and
//! no presentation handle is kept here.

mod cube;
mod kpi;
mod scorecard;

pub use cube::{operator_for, CubeQuery, CubeView, DEFAULT_CUBE_ROWS};
pub use kpi::KpiSummary;
pub use scorecard::{Scorecard, TrafficLight, ROI_GREEN_THRESHOLD, ROI_YELLOW_THRESHOLD};

use crate::aggregation::{aggregate, count_by, rank_descending, AggregationResult, Operator};
use crate::error::AnalyticsError;
use crate::filter::{filter_by_year, FilterValue};
use crate::forecast::{DefectForecast, ForecastModel, ForecastRequest};
use crate::record::{Dimension, Metric, ProjectRecord};
use crate::risk::{risk_entries, RiskEntry, DEFAULT_RISK_COUNT};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which dashboard page to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardMode {
    /// KPIs, revenue by stack and status distribution
    #[default]
    Overview,
    /// OLAP pivot explorer
    Cube,
    /// Scorecard, risk list and defect forecast
    Strategy,
}

impl fmt::Display for DashboardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DashboardMode::Overview => "overview",
            DashboardMode::Cube => "cube",
            DashboardMode::Strategy => "strategy",
        })
    }
}

impl FromStr for DashboardMode {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overview" | "dashboard" => Ok(DashboardMode::Overview),
            "cube" | "olap" => Ok(DashboardMode::Cube),
            "strategy" | "estrategia" => Ok(DashboardMode::Strategy),
            _ => Err(AnalyticsError::UnknownMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewView {
    pub year: FilterValue,
    pub kpis: KpiSummary,
    /// SUM of Ingresos by Stack, largest first
    pub revenue_by_stack: AggregationResult,
    /// COUNT by Estado, first-seen order
    pub status_distribution: AggregationResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyView {
    pub scorecard: Scorecard,
    pub risks: Vec<RiskEntry>,
    pub forecast: DefectForecast,
}

/// Output of one dashboard request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum DashboardView {
    Overview(OverviewView),
    Cube(CubeView),
    Strategy(StrategyView),
}

/// Parameters for every mode; each mode reads only its own fields
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRequest {
    pub mode: DashboardMode,
    pub year: FilterValue,
    pub cube: CubeQuery,
    pub risk_count: usize,
    pub forecast: ForecastRequest,
}

impl Default for DashboardRequest {
    fn default() -> Self {
        Self {
            mode: DashboardMode::default(),
            year: FilterValue::All,
            cube: CubeQuery::default(),
            risk_count: DEFAULT_RISK_COUNT,
            forecast: ForecastRequest::default(),
        }
    }
}

/// Dashboard over a loaded record snapshot
#[derive(Debug, Clone)]
pub struct Dashboard {
    records: Vec<ProjectRecord>,
    forecast_model: ForecastModel,
}

impl Dashboard {
    pub fn new(records: Vec<ProjectRecord>) -> Self {
        Self {
            records,
            forecast_model: ForecastModel::default(),
        }
    }

    pub fn with_forecast_model(mut self, model: ForecastModel) -> Self {
        self.forecast_model = model;
        self
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    /// Compute the view selected by `request.mode`
    pub fn render(&self, request: &DashboardRequest) -> DashboardView {
        debug!("rendering {} view over {} records", request.mode, self.records.len());
        match request.mode {
            DashboardMode::Overview => DashboardView::Overview(self.overview(&request.year)),
            DashboardMode::Cube => DashboardView::Cube(self.cube(&request.cube)),
            DashboardMode::Strategy => {
                DashboardView::Strategy(self.strategy(request.risk_count, &request.forecast))
            }
        }
    }

    pub fn kpis(&self, year: &FilterValue) -> KpiSummary {
        KpiSummary::from_records(&filter_by_year(&self.records, year))
    }

    pub fn overview(&self, year: &FilterValue) -> OverviewView {
        let subset = filter_by_year(&self.records, year);
        OverviewView {
            year: year.clone(),
            kpis: KpiSummary::from_records(&subset),
            revenue_by_stack: rank_descending(aggregate(
                &subset,
                Dimension::Stack,
                Metric::Ingresos,
                Operator::Sum,
            )),
            status_distribution: count_by(&subset, Dimension::Estado),
        }
    }

    /// Cube runs over the full record set; the year filter does not apply
    pub fn cube(&self, query: &CubeQuery) -> CubeView {
        query.run(&self.records)
    }

    pub fn strategy(&self, risk_count: usize, forecast: &ForecastRequest) -> StrategyView {
        StrategyView {
            scorecard: Scorecard::from_records(&self.records),
            risks: risk_entries(&self.records, risk_count),
            forecast: self.forecast_model.simulate_request(forecast),
        }
    }
}
