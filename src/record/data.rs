//! Project record structures matching the dashboard dataset format

use crate::error::AnalyticsError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Label used when an optional descriptive field is absent
pub const MISSING_LABEL: &str = "N/A";

/// Project status (`Estado` column)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    Completado,
    Cancelado,
    Retrasado,
    /// Any status outside the known catalog, kept verbatim
    Other(String),
}

impl ProjectStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ProjectStatus::Completado => "Completado",
            ProjectStatus::Cancelado => "Cancelado",
            ProjectStatus::Retrasado => "Retrasado",
            ProjectStatus::Other(s) => s,
        }
    }
}

impl From<String> for ProjectStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Completado" => ProjectStatus::Completado,
            "Cancelado" => ProjectStatus::Cancelado,
            "Retrasado" => ProjectStatus::Retrasado,
            _ => ProjectStatus::Other(s),
        }
    }
}

impl From<&str> for ProjectStatus {
    fn from(s: &str) -> Self {
        ProjectStatus::from(s.to_string())
    }
}

impl From<ProjectStatus> for String {
    fn from(status: ProjectStatus) -> Self {
        match status {
            ProjectStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single project record from the dataset
///
/// Records are immutable once loaded; every stage borrows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Client / project identifier
    #[serde(rename = "Client", alias = "Cliente")]
    pub client: String,

    /// Technology stack
    #[serde(rename = "Stack")]
    pub stack: String,

    /// Project status
    #[serde(rename = "Estado")]
    pub status: ProjectStatus,

    /// Fiscal year
    #[serde(rename = "Anio")]
    pub year: i32,

    /// Revenue billed
    #[serde(rename = "Ingresos")]
    pub revenue: f64,

    /// Actual cost
    #[serde(rename = "Costo")]
    pub cost: f64,

    /// Estimated budget
    #[serde(rename = "Presupuesto")]
    pub budget: f64,

    /// Return on investment, signed percentage
    #[serde(rename = "ROI")]
    pub roi: f64,

    /// Net promoter score
    #[serde(rename = "NPS")]
    pub nps: f64,

    /// Defect count
    #[serde(rename = "Defectos")]
    pub defects: u32,

    #[serde(rename = "Mes", default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,

    #[serde(rename = "Industria", default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    #[serde(rename = "Cloud", default, skip_serializing_if = "Option::is_none")]
    pub cloud: Option<String>,

    /// Project manager
    #[serde(rename = "PM", default, skip_serializing_if = "Option::is_none")]
    pub project_manager: Option<String>,
}

impl ProjectRecord {
    /// Create a record with the required fields; optional descriptors start empty
    pub fn new(
        client: impl Into<String>,
        stack: impl Into<String>,
        status: impl Into<ProjectStatus>,
        year: i32,
        revenue: f64,
        cost: f64,
        budget: f64,
        roi: f64,
        nps: f64,
        defects: u32,
    ) -> Self {
        Self {
            client: client.into(),
            stack: stack.into(),
            status: status.into(),
            year,
            revenue,
            cost,
            budget,
            roi,
            nps,
            defects,
            month: None,
            industry: None,
            cloud: None,
            project_manager: None,
        }
    }
}

/// A record field usable as a grouping key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Client,
    Stack,
    Estado,
    Anio,
    Mes,
    Industria,
    Cloud,
    #[serde(rename = "PM")]
    Pm,
}

impl Dimension {
    pub const ALL: [Dimension; 8] = [
        Dimension::Client,
        Dimension::Stack,
        Dimension::Estado,
        Dimension::Anio,
        Dimension::Mes,
        Dimension::Industria,
        Dimension::Cloud,
        Dimension::Pm,
    ];

    /// Field name as it appears in the source document
    pub fn field_name(&self) -> &'static str {
        match self {
            Dimension::Client => "Client",
            Dimension::Stack => "Stack",
            Dimension::Estado => "Estado",
            Dimension::Anio => "Anio",
            Dimension::Mes => "Mes",
            Dimension::Industria => "Industria",
            Dimension::Cloud => "Cloud",
            Dimension::Pm => "PM",
        }
    }

    /// Raw field value for a record, before canonicalization
    pub fn raw_value<'a>(&self, record: &'a ProjectRecord) -> Cow<'a, str> {
        fn optional(field: &Option<String>) -> Cow<'_, str> {
            match field {
                Some(value) => Cow::Borrowed(value.as_str()),
                None => Cow::Borrowed(MISSING_LABEL),
            }
        }

        match self {
            Dimension::Client => Cow::Borrowed(&record.client),
            Dimension::Stack => Cow::Borrowed(&record.stack),
            Dimension::Estado => Cow::Borrowed(record.status.as_str()),
            Dimension::Anio => Cow::Owned(record.year.to_string()),
            Dimension::Mes => optional(&record.month),
            Dimension::Industria => optional(&record.industry),
            Dimension::Cloud => optional(&record.cloud),
            Dimension::Pm => optional(&record.project_manager),
        }
    }

    /// Whether values of this dimension are numbers rather than labels
    pub fn is_numeric(&self) -> bool {
        matches!(self, Dimension::Anio)
    }

    /// Canonical form of a raw value of this dimension
    ///
    /// Numeric dimensions go through [`canonical_key`]; labels are only
    /// trimmed, so `"007"` and `"7"` stay distinct clients.
    pub fn normalize(&self, raw: &str) -> String {
        if self.is_numeric() {
            canonical_key(raw)
        } else {
            raw.trim().to_string()
        }
    }

    /// Canonical grouping key for a record
    pub fn key_of(&self, record: &ProjectRecord) -> String {
        self.normalize(&self.raw_value(record))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for Dimension {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" | "cliente" => Ok(Dimension::Client),
            "stack" => Ok(Dimension::Stack),
            "estado" => Ok(Dimension::Estado),
            "anio" => Ok(Dimension::Anio),
            "mes" => Ok(Dimension::Mes),
            "industria" => Ok(Dimension::Industria),
            "cloud" => Ok(Dimension::Cloud),
            "pm" => Ok(Dimension::Pm),
            _ => Err(AnalyticsError::UnknownDimension(s.to_string())),
        }
    }
}

/// A numeric record field that can be reduced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Ingresos,
    Costo,
    Presupuesto,
    #[serde(rename = "ROI")]
    Roi,
    #[serde(rename = "NPS")]
    Nps,
    Defectos,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Ingresos,
        Metric::Costo,
        Metric::Presupuesto,
        Metric::Roi,
        Metric::Nps,
        Metric::Defectos,
    ];

    pub fn field_name(&self) -> &'static str {
        match self {
            Metric::Ingresos => "Ingresos",
            Metric::Costo => "Costo",
            Metric::Presupuesto => "Presupuesto",
            Metric::Roi => "ROI",
            Metric::Nps => "NPS",
            Metric::Defectos => "Defectos",
        }
    }

    pub fn value_of(&self, record: &ProjectRecord) -> f64 {
        match self {
            Metric::Ingresos => record.revenue,
            Metric::Costo => record.cost,
            Metric::Presupuesto => record.budget,
            Metric::Roi => record.roi,
            Metric::Nps => record.nps,
            Metric::Defectos => record.defects as f64,
        }
    }

    /// Whether the metric is a currency amount (for unit-aware display)
    pub fn is_currency(&self) -> bool {
        matches!(self, Metric::Ingresos | Metric::Costo | Metric::Presupuesto)
    }

    /// Whether the metric is a percentage
    pub fn is_percentage(&self) -> bool {
        matches!(self, Metric::Roi)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for Metric {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ingresos" => Ok(Metric::Ingresos),
            "costo" => Ok(Metric::Costo),
            "presupuesto" => Ok(Metric::Presupuesto),
            "roi" => Ok(Metric::Roi),
            "nps" => Ok(Metric::Nps),
            "defectos" => Ok(Metric::Defectos),
            _ => Err(AnalyticsError::UnknownMetric(s.to_string())),
        }
    }
}

/// Normalize a numeric dimension value to its canonical string form
///
/// Input is trimmed. Text that parses as a finite integral number is rendered
/// as a plain integer, so `2023`, `"2023"`, `"2023.0"` and `" 2023 "` all map
/// to `"2023"`. Everything else is kept verbatim.
pub fn canonical_key(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
            format!("{}", v as i64)
        }
        _ => trimmed.to_string(),
    }
}
