//! SoftIntel Analytics - business-intelligence core for software project portfolios
//!
//! This library provides:
//! - Project dataset loading (JSON or CSV) with strict or coercing validation
//! - Filtering, grouping and ranking of records by any dimension and metric
//! - Dashboard views: KPI overview, OLAP cube explorer, balanced scorecard
//! - Rayleigh defect forecasting and negative-ROI risk selection
//! - JSON/CSV report output and a deterministic sample dataset generator

pub mod error;
pub mod record;
pub mod filter;
pub mod aggregation;
pub mod forecast;
pub mod risk;
pub mod dashboard;
pub mod config;
pub mod report;
pub mod generator;

// Re-export commonly used types
pub use error::{AnalyticsError, Result};
pub use record::{Dimension, LoadPolicy, Metric, ProjectRecord, ProjectStatus};
pub use filter::FilterValue;
pub use aggregation::{AggregationResult, Operator};
pub use forecast::{DefectForecast, ForecastModel};
pub use dashboard::{Dashboard, DashboardMode, DashboardRequest, DashboardView};
pub use config::DashboardConfig;
