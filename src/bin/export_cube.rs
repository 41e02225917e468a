//! Export every cube pivot of a dataset as CSV files
//!
//! Writes one `<dimension>_<metric>.csv` per dimension × metric pair (plus
//! `<dimension>_count.csv`) into the output directory, ranked largest first.

use anyhow::{Context, Result};
use clap::Parser;
use softintel_analytics::aggregation::rank_descending;
use softintel_analytics::record::{load_dataset, LoadPolicy};
use softintel_analytics::report::{full_cube, write_table_csv};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "export_cube")]
#[command(about = "Write every dimension x metric pivot as CSV")]
struct Args {
    /// Dataset file (.json or .csv)
    #[arg(long, default_value = "data.json")]
    data: PathBuf,
    /// Output directory
    #[arg(long, default_value = "cube_output")]
    out: PathBuf,
    /// Reject malformed records instead of coercing them
    #[arg(long, default_value_t = false)]
    strict: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let policy = if args.strict { LoadPolicy::Strict } else { LoadPolicy::Coerce };

    let start = Instant::now();
    println!("Loading projects from {}...", args.data.display());
    let records = load_dataset(&args.data, policy)
        .with_context(|| format!("Failed to load dataset {}", args.data.display()))?;
    println!("Loaded {} projects in {:?}", records.len(), start.elapsed());

    println!("Computing cube...");
    let cube_start = Instant::now();
    let cells = full_cube(&records);
    println!("{} pivots computed in {:?}", cells.len(), cube_start.elapsed());

    fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create {}", args.out.display()))?;

    for cell in cells {
        let name = match cell.metric {
            Some(metric) => format!("{}_{}.csv", cell.dimension.field_name(), metric.field_name()),
            None => format!("{}_count.csv", cell.dimension.field_name()),
        }
        .to_lowercase();
        let path = args.out.join(name);
        let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        write_table_csv(BufWriter::new(file), &rank_descending(cell))
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    println!("Output written to {}", args.out.display());
    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
