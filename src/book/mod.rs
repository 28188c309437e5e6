//! Aggregate book: per-level totals and the event-application engine.

pub mod aggregator;
pub mod level;

pub use aggregator::{BookAggregator, BookStats};
pub use level::LevelTotals;
