//! Report output for the presentation layer: JSON envelopes and CSV tables

use crate::aggregation::{aggregate, count_by, AggregationResult};
use crate::dashboard::{operator_for, DashboardView};
use crate::error::Result;
use crate::forecast::DefectForecast;
use crate::record::{Dimension, Metric, ProjectRecord};
use crate::risk::RiskEntry;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;

/// Envelope wrapping any payload with provenance metadata
#[derive(Debug, Clone, Serialize)]
pub struct Report<T: Serialize> {
    pub generated_at: DateTime<Utc>,
    pub record_count: usize,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> Report<T> {
    pub fn new(record_count: usize, payload: T) -> Self {
        Self {
            generated_at: Utc::now(),
            record_count,
            payload,
        }
    }
}

/// Dashboard view report
pub type ViewReport = Report<DashboardView>;

/// Risk list payload for [`Report`]
#[derive(Debug, Clone, Serialize)]
pub struct RiskList {
    pub risks: Vec<RiskEntry>,
}

/// Write any report as pretty JSON
pub fn write_json<W: Write, T: Serialize>(writer: W, report: &Report<T>) -> Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

/// Write an aggregation table as `<dimension>,<value label>` CSV
pub fn write_table_csv<W: Write>(writer: W, table: &AggregationResult) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([table.dimension.field_name(), table.value_label().as_str()])?;
    for entry in table.iter() {
        csv_writer.write_record([entry.key.as_str(), entry.value.to_string().as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the forecast series as CSV
pub fn write_forecast_csv<W: Write>(writer: W, forecast: &DefectForecast) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Month", "Label", "ExpectedDefects"])?;
    for point in &forecast.points {
        csv_writer.write_record([
            point.month.to_string().as_str(),
            point.label.as_str(),
            point.expected_defects.to_string().as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the risk list as CSV
pub fn write_risks_csv<W: Write>(writer: W, risks: &[RiskEntry]) -> Result<()> {
    // Header is written by hand so an empty list still has one
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(["client", "stack", "roi", "status"])?;
    for risk in risks {
        csv_writer.serialize(risk)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Every pivot of the cube: each dimension against each metric, plus counts
///
/// Each cell is an independent pure aggregation over the shared snapshot, so
/// the cells are computed in parallel. Output order is dimension-major and
/// matches [`Dimension::ALL`] × ([`Metric::ALL`] then COUNT).
pub fn full_cube(records: &[ProjectRecord]) -> Vec<AggregationResult> {
    let cells: Vec<(Dimension, Option<Metric>)> = Dimension::ALL
        .into_iter()
        .flat_map(|d| {
            Metric::ALL
                .into_iter()
                .map(move |m| (d, Some(m)))
                .chain(std::iter::once((d, None)))
        })
        .collect();

    cells
        .par_iter()
        .map(|&(dimension, metric)| match metric {
            Some(m) => aggregate(records, dimension, m, operator_for(m)),
            None => count_by(records, dimension),
        })
        .collect()
}
