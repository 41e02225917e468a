//! Project record model and dataset loading

mod data;
pub mod loader;

pub use data::{canonical_key, Dimension, Metric, ProjectRecord, ProjectStatus, MISSING_LABEL};
pub use loader::{
    load_dataset, load_default_dataset, load_records, load_records_csv,
    load_records_csv_from_reader, load_records_from_reader, LoadPolicy, DEFAULT_DATA_PATH,
};
