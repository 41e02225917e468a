//! SoftIntel Analytics CLI
//!
//! Loads a project dataset and prints one dashboard view as a text table,
//! a JSON report, or CSV.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use softintel_analytics::config::DashboardConfig;
use softintel_analytics::dashboard::{
    CubeView, Dashboard, DashboardMode, DashboardView, KpiSummary, OverviewView, StrategyView,
};
use softintel_analytics::forecast::DefectForecast;
use softintel_analytics::generator::{generate_dataset, write_dataset_json, DEFAULT_PROJECT_COUNT, DEFAULT_SEED};
use softintel_analytics::record::{load_dataset, Dimension, LoadPolicy, Metric};
use softintel_analytics::report::{self, Report, RiskList, ViewReport};
use softintel_analytics::risk::{risk_entries, RiskEntry};
use softintel_analytics::{AggregationResult, FilterValue};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "softintel")]
#[command(about = "Software project portfolio analytics")]
#[command(
    after_help = "Environment:\n  SOFTINTEL_DATA     Dataset path\n  SOFTINTEL_STRICT   Reject invalid records\n  RUST_LOG           Log verbosity"
)]
struct Cli {
    /// Dataset file (.json or .csv)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Fiscal year for the overview ("todos" for all years)
    #[arg(long, global = true)]
    year: Option<FilterValue>,
    /// Print a JSON report instead of a table
    #[arg(long, global = true, default_value_t = false, conflicts_with = "csv")]
    json: bool,
    /// Print CSV instead of a table (cube, forecast, risks)
    #[arg(long, global = true, default_value_t = false)]
    csv: bool,
    /// Reject malformed records instead of coercing them
    #[arg(long, global = true, default_value_t = false)]
    strict: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Headline KPIs
    Kpis,
    /// KPIs, revenue by stack and status distribution
    Overview,
    /// Pivot one dimension against one metric
    Cube {
        #[arg(long)]
        dimension: Option<Dimension>,
        #[arg(long)]
        metric: Option<Metric>,
        #[arg(long)]
        rows: Option<usize>,
    },
    /// Rayleigh defect forecast
    Forecast {
        #[arg(long, allow_negative_numbers = true)]
        months: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        defects: Option<f64>,
    },
    /// Projects with negative ROI, worst first
    Risks {
        #[arg(long)]
        count: Option<usize>,
    },
    /// Scorecard, risks and forecast
    Strategy,
    /// Render the view selected by the configured mode
    View {
        #[arg(long)]
        mode: Option<DashboardMode>,
    },
    /// Write a synthetic dataset
    Generate {
        #[arg(long, default_value_t = DEFAULT_PROJECT_COUNT)]
        count: usize,
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if let Commands::Generate { count, seed, out } = &cli.command {
        return generate(*count, *seed, out.clone());
    }

    let mut config = DashboardConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    apply_flags(&mut config, &cli);
    config.validate().context("Invalid settings")?;
    if cli.csv && !supports_csv(&cli.command, config.mode) {
        bail!("CSV output is only available for cube, forecast and risks");
    }

    let records = load_dataset(&config.data_path, config.load_policy)
        .with_context(|| format!("Failed to load dataset {}", config.data_path.display()))?;

    let record_count = records.len();
    let dashboard = Dashboard::new(records).with_forecast_model(config.forecast_model());
    let request = config.request();

    let view = match &cli.command {
        Commands::Kpis => {
            let kpis = dashboard.kpis(&config.year);
            if cli.json {
                return print_json(&Report::new(record_count, kpis));
            }
            print_kpis(&kpis);
            return Ok(());
        }
        Commands::Forecast { .. } => {
            let forecast = config.forecast_model().simulate_request(&request.forecast);
            if cli.json {
                return print_json(&Report::new(record_count, forecast));
            }
            if cli.csv {
                return report::write_forecast_csv(io::stdout().lock(), &forecast).context("Failed to write CSV");
            }
            print_forecast(&forecast);
            return Ok(());
        }
        Commands::Risks { .. } => {
            let risks = risk_entries(dashboard.records(), request.risk_count);
            if cli.json {
                return print_json(&Report::new(record_count, RiskList { risks }));
            }
            if cli.csv {
                return report::write_risks_csv(io::stdout().lock(), &risks).context("Failed to write CSV");
            }
            print_risks(&risks);
            return Ok(());
        }
        Commands::Overview => DashboardView::Overview(dashboard.overview(&request.year)),
        Commands::Cube { .. } => DashboardView::Cube(dashboard.cube(&request.cube)),
        Commands::Strategy => {
            DashboardView::Strategy(dashboard.strategy(request.risk_count, &request.forecast))
        }
        Commands::View { .. } => dashboard.render(&request),
        Commands::Generate { count, seed, out } => return generate(*count, *seed, out.clone()),
    };

    if cli.json {
        return print_json(&ViewReport::new(record_count, view));
    }

    match view {
        DashboardView::Cube(cube) if cli.csv => {
            report::write_table_csv(io::stdout().lock(), &cube.table).context("Failed to write CSV")
        }
        _ if cli.csv => bail!("CSV output is only available for cube, forecast and risks"),
        DashboardView::Overview(overview) => {
            print_overview(&overview);
            Ok(())
        }
        DashboardView::Cube(cube) => {
            print_cube(&cube);
            Ok(())
        }
        DashboardView::Strategy(strategy) => {
            print_strategy(&strategy);
            Ok(())
        }
    }
}

/// Whether `--csv` has a tabular output for this command
fn supports_csv(command: &Commands, mode: DashboardMode) -> bool {
    match command {
        Commands::Cube { .. } | Commands::Forecast { .. } | Commands::Risks { .. } => true,
        Commands::View { .. } => mode == DashboardMode::Cube,
        _ => false,
    }
}

/// CLI flags take precedence over file and environment settings
fn apply_flags(config: &mut DashboardConfig, cli: &Cli) {
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }
    if let Some(year) = &cli.year {
        config.year = year.clone();
    }
    if cli.strict {
        config.load_policy = LoadPolicy::Strict;
    }
    match &cli.command {
        Commands::Cube { dimension, metric, rows } => {
            config.mode = DashboardMode::Cube;
            if let Some(d) = dimension {
                config.cube_dimension = *d;
            }
            if let Some(m) = metric {
                config.cube_metric = *m;
            }
            if let Some(r) = rows {
                config.cube_rows = *r;
            }
        }
        Commands::Forecast { months, defects } => {
            if let Some(m) = months {
                config.forecast_months = *m;
            }
            if let Some(d) = defects {
                config.forecast_defects = *d;
            }
        }
        Commands::Risks { count } => {
            if let Some(c) = count {
                config.risk_count = *c;
            }
        }
        Commands::View { mode: Some(mode) } => config.mode = *mode,
        _ => {}
    }
}

fn generate(count: usize, seed: u64, out: Option<PathBuf>) -> Result<()> {
    let records = generate_dataset(count, seed);
    match out {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_dataset_json(BufWriter::new(file), &records)?;
            println!("Wrote {} projects to {}", records.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            write_dataset_json(&mut stdout, &records)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(report: &Report<T>) -> Result<()> {
    let mut stdout = io::stdout().lock();
    report::write_json(&mut stdout, report).context("Failed to write JSON")?;
    writeln!(stdout)?;
    Ok(())
}

fn print_kpis(kpis: &KpiSummary) {
    println!("KPIs");
    println!("  Total revenue:  ${:.2}", kpis.total_revenue);
    println!("  Mean ROI:       {:.1}%", kpis.mean_roi);
    println!("  Projects:       {}", kpis.project_count);
    println!("  Total defects:  {:.0}", kpis.total_defects);
}

fn print_table(table: &AggregationResult) {
    let label = table.value_label();
    println!("{:<32} {:>18}", table.dimension.field_name(), label);
    println!("{}", "-".repeat(51));
    for entry in table.iter() {
        println!("{:<32} {:>18.2}", entry.key, entry.value);
    }
}

fn print_overview(view: &OverviewView) {
    println!("Overview (year: {})", view.year.to_string());
    println!("======================\n");
    print_kpis(&view.kpis);
    println!();
    print_table(&view.revenue_by_stack);
    println!();
    print_table(&view.status_distribution);
}

fn print_cube(view: &CubeView) {
    println!("{}", view.title);
    println!();
    print_table(&view.table);
}

fn print_forecast(forecast: &DefectForecast) {
    println!(
        "Defect forecast: {} months, {} defects, sigma {:.2}, peak month {}",
        forecast.duration_months, forecast.total_defects, forecast.sigma, forecast.peak_month
    );
    println!("{:>5} {:>10} {:>14}", "Month", "Label", "Expected");
    println!("{}", "-".repeat(31));
    for point in &forecast.points {
        println!("{:>5} {:>10} {:>14.4}", point.month, point.label, point.expected_defects);
    }
}

fn print_risks(risks: &[RiskEntry]) {
    if risks.is_empty() {
        println!("No projects with negative ROI");
        return;
    }
    println!("{:<28} {:<24} {:>10} {:<12}", "Client", "Stack", "ROI", "Status");
    println!("{}", "-".repeat(77));
    for risk in risks {
        println!("{:<28} {:<24} {:>9.2}% {:<12}", risk.client, risk.stack, risk.roi, risk.status.as_str());
    }
}

fn print_strategy(view: &StrategyView) {
    println!("Balanced scorecard");
    println!("  Mean ROI:      {:.1}% ({:?})", view.scorecard.mean_roi, view.scorecard.financial_light);
    println!("  Mean NPS:      {:.1}", view.scorecard.mean_nps);
    println!("  Mean defects:  {:.0}", view.scorecard.mean_defects);
    println!();
    print_risks(&view.risks);
    println!();
    print_forecast(&view.forecast);
}
