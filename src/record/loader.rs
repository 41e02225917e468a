//! Load project records from the dashboard data document
//!
//! The source is a JSON array of objects (`data.json`), or a CSV file with the
//! same column names. Records are validated here, at the load boundary, so
//! that every downstream stage can assume well-formed numbers.

use super::{ProjectRecord, ProjectStatus, MISSING_LABEL};
use crate::error::{AnalyticsError, Result};
use log::{info, warn};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Default location of the dataset, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "data.json";

/// How the loader treats records that fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// Reject the whole batch on the first invalid record
    Strict,
    /// Replace missing numbers with 0 and clamp negatives, logging a warning
    #[default]
    Coerce,
}

/// Fiscal year as found in the source: JSON number, float, or numeric string
#[derive(Debug, Clone, PartialEq)]
enum YearValue {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for YearValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct YearVisitor;

        impl<'de> Visitor<'de> for YearVisitor {
            type Value = YearValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a year as a number or numeric string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<YearValue, E> {
                Ok(YearValue::Number(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<YearValue, E> {
                Ok(YearValue::Number(v as f64))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<YearValue, E> {
                Ok(YearValue::Number(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<YearValue, E> {
                Ok(YearValue::Text(v.to_string()))
            }
        }

        deserializer.deserialize_any(YearVisitor)
    }
}

impl YearValue {
    fn to_year(&self) -> Option<i32> {
        let value = match self {
            YearValue::Number(v) => *v,
            YearValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        if value.is_finite() && value.fract() == 0.0 && value.abs() <= i32::MAX as f64 {
            Some(value as i32)
        } else {
            None
        }
    }
}

/// Raw row as found in the document; every field may be absent
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Client", alias = "Cliente", default)]
    client: Option<String>,
    #[serde(rename = "Stack", default)]
    stack: Option<String>,
    #[serde(rename = "Estado", default)]
    status: Option<String>,
    #[serde(rename = "Anio", default)]
    year: Option<YearValue>,
    #[serde(rename = "Ingresos", default)]
    revenue: Option<f64>,
    #[serde(rename = "Costo", default)]
    cost: Option<f64>,
    #[serde(rename = "Presupuesto", default)]
    budget: Option<f64>,
    #[serde(rename = "ROI", default)]
    roi: Option<f64>,
    #[serde(rename = "NPS", default)]
    nps: Option<f64>,
    #[serde(rename = "Defectos", default)]
    defects: Option<f64>,
    #[serde(rename = "Mes", default)]
    month: Option<String>,
    #[serde(rename = "Industria", default)]
    industry: Option<String>,
    #[serde(rename = "Cloud", default)]
    cloud: Option<String>,
    #[serde(rename = "PM", default)]
    project_manager: Option<String>,
}

/// Applies the load policy to one record's fields
struct FieldCheck {
    index: usize,
    policy: LoadPolicy,
}

impl FieldCheck {
    fn reject(&self, field: &'static str, reason: &str) -> AnalyticsError {
        AnalyticsError::MalformedRecord {
            index: self.index,
            field,
            reason: reason.to_string(),
        }
    }

    fn text(&self, field: &'static str, value: Option<String>) -> Result<String> {
        match value {
            Some(v) => Ok(v),
            None if self.policy == LoadPolicy::Coerce => {
                warn!("record #{}: missing '{}', using '{}'", self.index, field, MISSING_LABEL);
                Ok(MISSING_LABEL.to_string())
            }
            None => Err(self.reject(field, "is missing")),
        }
    }

    fn number(&self, field: &'static str, value: Option<f64>) -> Result<f64> {
        match value {
            Some(v) if v.is_finite() => Ok(v),
            Some(_) => Err(self.reject(field, "is not a finite number")),
            None if self.policy == LoadPolicy::Coerce => {
                warn!("record #{}: missing '{}', using 0", self.index, field);
                Ok(0.0)
            }
            None => Err(self.reject(field, "is missing")),
        }
    }

    fn non_negative(&self, field: &'static str, value: Option<f64>) -> Result<f64> {
        let v = self.number(field, value)?;
        if v >= 0.0 {
            Ok(v)
        } else if self.policy == LoadPolicy::Coerce {
            warn!("record #{}: negative '{}' ({}), clamping to 0", self.index, field, v);
            Ok(0.0)
        } else {
            Err(self.reject(field, "must be non-negative"))
        }
    }

    fn count(&self, field: &'static str, value: Option<f64>) -> Result<u32> {
        let v = self.non_negative(field, value)?;
        if v.fract() != 0.0 {
            if self.policy == LoadPolicy::Strict {
                return Err(self.reject(field, "must be an integer"));
            }
            warn!("record #{}: fractional '{}' ({}), truncating", self.index, field, v);
        }
        Ok(v.min(u32::MAX as f64) as u32)
    }

    fn year(&self, value: Option<YearValue>) -> Result<i32> {
        match value.as_ref().map(YearValue::to_year) {
            Some(Some(year)) => Ok(year),
            Some(None) => Err(self.reject("Anio", "is not an integral year")),
            None if self.policy == LoadPolicy::Coerce => {
                warn!("record #{}: missing 'Anio', using 0", self.index);
                Ok(0)
            }
            None => Err(self.reject("Anio", "is missing")),
        }
    }
}

impl RawRecord {
    fn to_record(self, index: usize, policy: LoadPolicy) -> Result<ProjectRecord> {
        let check = FieldCheck { index, policy };

        Ok(ProjectRecord {
            client: check.text("Client", self.client)?,
            stack: check.text("Stack", self.stack)?,
            status: ProjectStatus::from(check.text("Estado", self.status)?),
            year: check.year(self.year)?,
            revenue: check.non_negative("Ingresos", self.revenue)?,
            cost: check.non_negative("Costo", self.cost)?,
            budget: check.non_negative("Presupuesto", self.budget)?,
            roi: check.number("ROI", self.roi)?,
            nps: check.number("NPS", self.nps)?,
            defects: check.count("Defectos", self.defects)?,
            month: self.month,
            industry: self.industry,
            cloud: self.cloud,
            project_manager: self.project_manager,
        })
    }
}

fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| AnalyticsError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

fn convert_all(rows: Vec<RawRecord>, policy: LoadPolicy) -> Result<Vec<ProjectRecord>> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| row.to_record(index, policy))
        .collect()
}

/// Load all records from a JSON document on disk
pub fn load_records<P: AsRef<Path>>(path: P, policy: LoadPolicy) -> Result<Vec<ProjectRecord>> {
    let path = path.as_ref();
    let file = open_source(path)?;
    let records = load_records_from_reader(BufReader::new(file), policy)?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Load records from any reader producing a JSON array
pub fn load_records_from_reader<R: Read>(reader: R, policy: LoadPolicy) -> Result<Vec<ProjectRecord>> {
    let rows: Vec<RawRecord> = serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            AnalyticsError::Io(e.into())
        } else {
            AnalyticsError::MalformedDocument(e.to_string())
        }
    })?;
    convert_all(rows, policy)
}

/// Load records from a CSV file with the same column headers
pub fn load_records_csv<P: AsRef<Path>>(path: P, policy: LoadPolicy) -> Result<Vec<ProjectRecord>> {
    let path = path.as_ref();
    let file = open_source(path)?;
    let records = load_records_csv_from_reader(file, policy)?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Load records from any reader producing CSV
pub fn load_records_csv_from_reader<R: Read>(reader: R, policy: LoadPolicy) -> Result<Vec<ProjectRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in csv_reader.deserialize() {
        let row: RawRecord = result.map_err(|e| AnalyticsError::MalformedDocument(e.to_string()))?;
        rows.push(row);
    }

    convert_all(rows, policy)
}

/// Load a dataset, choosing the parser from the file extension (`.csv` or JSON)
pub fn load_dataset<P: AsRef<Path>>(path: P, policy: LoadPolicy) -> Result<Vec<ProjectRecord>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        load_records_csv(path, policy)
    } else {
        load_records(path, policy)
    }
}

/// Load the dataset from the default `data.json` location
pub fn load_default_dataset() -> Result<Vec<ProjectRecord>> {
    load_records(DEFAULT_DATA_PATH, LoadPolicy::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"[
        {"Anio": 2023, "Mes": "March", "Cliente": "Grupo Norte", "Industria": "Fintech",
         "Stack": "Python / Django", "Cloud": "AWS", "PM": "Ana Ruiz", "Estado": "Completado",
         "Presupuesto": 100000.0, "Costo": 80000.0, "Ingresos": 130000.0, "ROI": 62.5,
         "Defectos": 12, "NPS": 9},
        {"Anio": "2024", "Client": "Sur SA", "Stack": "Java Spring", "Estado": "Cancelado",
         "Presupuesto": 50000.0, "Costo": 10000.0, "Ingresos": 0, "ROI": -100.0,
         "Defectos": 30, "NPS": 0}
    ]"#;

    #[test]
    fn test_load_json_document() {
        let records = load_records_from_reader(DOC.as_bytes(), LoadPolicy::Strict).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].client, "Grupo Norte");
        assert_eq!(records[0].year, 2023);
        assert_eq!(records[0].defects, 12);
        assert_eq!(records[0].cloud.as_deref(), Some("AWS"));

        // String year is normalized at load time
        assert_eq!(records[1].year, 2024);
        assert_eq!(records[1].status, ProjectStatus::Cancelado);
        assert_eq!(records[1].roi, -100.0);
        assert!(records[1].industry.is_none());
    }

    #[test]
    fn test_missing_numeric_field() {
        let doc = r#"[{"Client": "X", "Stack": "S", "Estado": "Retrasado", "Anio": 2022,
                       "Costo": 1.0, "Presupuesto": 1.0, "ROI": 0, "NPS": 1, "Defectos": 2}]"#;

        let err = load_records_from_reader(doc.as_bytes(), LoadPolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::MalformedRecord { index: 0, field: "Ingresos", .. }
        ));

        let records = load_records_from_reader(doc.as_bytes(), LoadPolicy::Coerce).unwrap();
        assert_eq!(records[0].revenue, 0.0);
    }

    #[test]
    fn test_negative_budget() {
        let doc = r#"[{"Client": "X", "Stack": "S", "Estado": "Completado", "Anio": 2022,
                       "Ingresos": 1.0, "Costo": 1.0, "Presupuesto": -5.0, "ROI": 0,
                       "NPS": 1, "Defectos": 2}]"#;

        assert!(load_records_from_reader(doc.as_bytes(), LoadPolicy::Strict).is_err());
        let records = load_records_from_reader(doc.as_bytes(), LoadPolicy::Coerce).unwrap();
        assert_eq!(records[0].budget, 0.0);
    }

    #[test]
    fn test_bad_year_rejected_under_both_policies() {
        let doc = r#"[{"Client": "X", "Stack": "S", "Estado": "Completado", "Anio": "next",
                       "Ingresos": 1.0, "Costo": 1.0, "Presupuesto": 1.0, "ROI": 0,
                       "NPS": 1, "Defectos": 2}]"#;

        assert!(load_records_from_reader(doc.as_bytes(), LoadPolicy::Strict).is_err());
        assert!(load_records_from_reader(doc.as_bytes(), LoadPolicy::Coerce).is_err());
    }

    #[test]
    fn test_not_an_array() {
        let err = load_records_from_reader(r#"{"Client": "X"}"#.as_bytes(), LoadPolicy::Coerce)
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::MalformedDocument(_)));
    }

    #[test]
    fn test_load_csv() {
        let csv_doc = "\
Client,Stack,Estado,Anio,Ingresos,Costo,Presupuesto,ROI,NPS,Defectos
Acme,PHP / Laravel,Completado,2021,1500.5,1000,1200,50.05,8,9
Beta,Java Spring,Retrasado,2022,1000,1400,1000,-28.57,3,40
";
        let records = load_records_csv_from_reader(csv_doc.as_bytes(), LoadPolicy::Strict).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].year, 2021);
        assert_eq!(records[0].revenue, 1500.5);
        assert_eq!(records[1].defects, 40);
        assert_eq!(records[1].status, ProjectStatus::Retrasado);
    }

    #[test]
    fn test_source_unavailable() {
        let err = load_records("does/not/exist.json", LoadPolicy::Strict).unwrap_err();
        assert!(matches!(err, AnalyticsError::SourceUnavailable { .. }));
    }
}
