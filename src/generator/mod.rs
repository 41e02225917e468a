//! Synthetic project dataset for demos and tests
//!
//! Records are drawn from small fixed catalogs (stacks, statuses, clients,
//! PMs, months) and priced with a simple business model: budgets scale with
//! company size, cancelled projects bill nothing, troubled projects overrun
//! their budget and successful ones bill above it.

mod rng;

pub use rng::SampleRng;

use crate::error::Result;
use crate::record::{ProjectRecord, ProjectStatus};
use chrono::NaiveDate;
use log::info;
use std::io::Write;

/// Default number of generated projects
pub const DEFAULT_PROJECT_COUNT: usize = 500;

/// Default RNG seed
pub const DEFAULT_SEED: u64 = 42;

const FIRST_YEAR: i32 = 2020;
const LAST_YEAR: i32 = 2024;

/// (stack, cloud)
const STACKS: [(&str, &str); 6] = [
    ("Python / Django", "AWS"),
    ("React / Node.js", "AWS"),
    (".NET Core / Angular", "Azure"),
    ("Java Spring", "Google Cloud"),
    ("PHP / Laravel", "DigitalOcean"),
    ("Data Science Stack", "Google Cloud"),
];

/// (status, reason)
const STATUSES: [(&str, &str); 6] = [
    ("Completado", "Éxito rotundo"),
    ("Completado", "Con sobrecostos"),
    ("Completado", "Con retrasos"),
    ("Cancelado", "Falta de presupuesto"),
    ("Cancelado", "Cambio de estrategia"),
    ("Retrasado", "Problemas técnicos"),
];

const INDUSTRIES: [&str; 6] = ["Fintech", "Salud", "Retail", "Manufactura", "Educación", "Logística"];
const COMPANY_SIZES: [&str; 4] = ["Startup", "Pyme", "Corporativo", "Unicornio"];

const CLIENT_PREFIXES: [&str; 5] = ["Grupo", "Industrias", "Servicios", "Soluciones", "Corporativo"];
const CLIENT_SUFFIXES: [&str; 4] = ["Azteca", "del Norte", "Pacífico", "del Valle"];
const CLIENT_COUNT: usize = CLIENT_PREFIXES.len() * CLIENT_SUFFIXES.len();

const PM_FIRST_NAMES: [&str; 5] = ["Ana", "Carlos", "Lucía", "Miguel", "Sofía"];
const PM_LAST_NAMES: [&str; 3] = ["García", "Hernández", "López"];
const PM_COUNT: usize = PM_FIRST_NAMES.len() * PM_LAST_NAMES.len();

#[derive(Debug, Clone)]
struct Client {
    name: String,
    industry: &'static str,
    size: &'static str,
}

#[derive(Debug, Clone)]
struct Period {
    year: i32,
    month_name: String,
}

fn clients(rng: &mut SampleRng) -> Vec<Client> {
    (0..CLIENT_COUNT)
        .map(|i| Client {
            name: format!(
                "{} {}",
                CLIENT_PREFIXES[i % CLIENT_PREFIXES.len()],
                CLIENT_SUFFIXES[i / CLIENT_PREFIXES.len()]
            ),
            industry: *rng.choose(&INDUSTRIES),
            size: *rng.choose(&COMPANY_SIZES),
        })
        .collect()
}

fn project_managers() -> Vec<String> {
    (0..PM_COUNT)
        .map(|i| {
            format!(
                "{} {}",
                PM_FIRST_NAMES[i % PM_FIRST_NAMES.len()],
                PM_LAST_NAMES[i / PM_FIRST_NAMES.len()]
            )
        })
        .collect()
}

fn periods() -> Vec<Period> {
    (FIRST_YEAR..=LAST_YEAR)
        .flat_map(|year| (1..=12).map(move |month| (year, month)))
        .filter_map(|(year, month)| {
            NaiveDate::from_ymd_opt(year, month, 1).map(|date| Period {
                year,
                month_name: date.format("%B").to_string(),
            })
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Generate `count` synthetic projects; the same seed yields the same dataset
pub fn generate_dataset(count: usize, seed: u64) -> Vec<ProjectRecord> {
    let mut rng = SampleRng::new(seed);
    let clients = clients(&mut rng);
    let managers = project_managers();
    let periods = periods();

    let records: Vec<ProjectRecord> = (0..count)
        .map(|_| {
            let client = rng.choose(&clients);
            let &(stack, cloud) = rng.choose(&STACKS);
            let manager = rng.choose(&managers);
            let &(status, reason) = rng.choose(&STATUSES);
            let period = rng.choose(&periods);

            let base_budget = if client.size == "Startup" { 50_000.0 } else { 500_000.0 };
            let budget = round2(rng.uniform(base_budget * 0.8, base_budget * 3.0));

            let status = ProjectStatus::from(status);
            let (cost, revenue, nps) = match status {
                ProjectStatus::Cancelado => (budget * rng.uniform(0.1, 0.4), 0.0, 0),
                ProjectStatus::Retrasado => (budget * rng.uniform(1.1, 1.5), budget, rng.int_inclusive(1, 6)),
                _ if reason == "Con sobrecostos" => {
                    (budget * rng.uniform(1.1, 1.5), budget, rng.int_inclusive(1, 6))
                }
                _ => {
                    let cost = budget * rng.uniform(0.7, 0.95);
                    let revenue = budget * rng.uniform(1.2, 1.5);
                    (cost, revenue, rng.int_inclusive(7, 10))
                }
            };

            let defect_factor = if stack.contains("Python") { 0.5 } else { 1.2 };
            let defects = (rng.int_inclusive(5, 50) as f64 * defect_factor) as u32;

            let roi = if cost > 0.0 { round2((revenue - cost) / cost * 100.0) } else { 0.0 };

            let mut record = ProjectRecord::new(
                client.name.clone(),
                stack,
                status,
                period.year,
                round2(revenue),
                round2(cost),
                budget,
                roi,
                nps as f64,
                defects,
            );
            record.month = Some(period.month_name.clone());
            record.industry = Some(client.industry.to_string());
            record.cloud = Some(cloud.to_string());
            record.project_manager = Some(manager.clone());
            record
        })
        .collect();

    info!("generated {} synthetic projects (seed {})", records.len(), seed);
    records
}

/// Write records as a pretty JSON array in the dataset format
pub fn write_dataset_json<W: Write>(writer: W, records: &[ProjectRecord]) -> Result<()> {
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}
