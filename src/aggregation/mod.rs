//! Aggregation engine with ranking and top-N stages

mod engine;
mod ranking;

pub use engine::{
    aggregate, count_by, global_mean, mean, total, AggregateEntry, AggregationResult, Operator,
};
pub use ranking::{rank_ascending, rank_descending, top_n};
