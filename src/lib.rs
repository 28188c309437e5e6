//! # lob-replay
//!
//! Aggregate limit-order-book view built by replaying a sequential log of
//! delimited order events (add, delete, modify).
//!
//! This is not a matching engine: it never crosses orders. It is an
//! aggregator that answers "how much resting size and how many orders
//! exist at each price" for any symbol/side pair, at any point after a
//! single-threaded, single-pass replay.
//!
//! ## Features
//!
//! - **Event replay**: `A`/`D`/`M` semantics with modify as backout + re-add
//! - **Point-in-time queries**: per side, per symbol, or whole-book, with
//!   deterministic symbol/side/numeric-price ordering
//! - **Loud failure on bad history**: deletes and modifies of unknown order
//!   ids surface as errors instead of corrupting the aggregates
//! - **Diagnostics**: every skipped line is categorized, line-addressed,
//!   and exportable as JSON
//!
//! ## Wire format
//!
//! One event per line, `|`-delimited:
//!
//! ```text
//! Symbol|A|Side|OrderId|Size|Price
//! Symbol|D|OrderId
//! Symbol|M|OrderId|NewSize|NewPrice
//! ```
//!
//! Query output is one line per visible price level:
//! `Symbol|Side|Price|TotalSize|OrderCount`.
//!
//! ## Quick Start
//!
//! ```rust
//! use lob_replay::{ReplayEngine, Side, VecSource};
//!
//! let source = VecSource::from_lines(&[
//!     "IBM|A|B|1|100|50.5",
//!     "IBM|A|S|2|40|51",
//!     "IBM|M|1|80|50.25",
//! ]);
//!
//! let mut engine = ReplayEngine::new();
//! engine.replay(source).unwrap();
//!
//! let levels = engine.book().query_levels("IBM", Side::Buy);
//! assert_eq!(levels[0].price.raw(), "50.25");
//! assert_eq!(levels[0].total_size, 80);
//! ```
//!
//! ### Reporting
//!
//! ```rust
//! use lob_replay::{report_all, BookAggregator, WriterSink};
//! use lob_replay::parse_event;
//!
//! let mut book = BookAggregator::new();
//! book.apply(parse_event("IBM|A|B|1|100|50.5").unwrap()).unwrap();
//!
//! let mut sink = WriterSink::new(Vec::new());
//! report_all(&book, &mut sink).unwrap();
//!
//! let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
//! assert_eq!(out, "IBM|B|50.5|100|1\n");
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Core types: `OrderEvent`, `Side`, `PriceKey`, composite keys, query rows |
//! | [`parser`] | Wire-format parsing: `parse_event` |
//! | [`book`] | Book state: `BookAggregator`, `LevelTotals`, `BookStats` |
//! | [`replay`] | Driver loop: `ReplayEngine`, `ReplayConfig`, `UnknownOrderPolicy` |
//! | [`source`] | Line sources: `FileSource`, `VecSource` |
//! | [`report`] | Row sinks: `WriterSink`, `VecSink`, `report_symbol`, `report_all` |
//! | [`diagnostics`] | Skip tracking: `DiagnosticTracker`, `DiagnosticCategory` |
//! | [`error`] | Error taxonomy: `ParseError`, `ApplyError`, `ReplayError` |

pub mod book;
pub mod diagnostics;
pub mod error;
pub mod parser;
pub mod replay;
pub mod report;
pub mod source;
pub mod types;

// Re-exports - Core types
pub use error::{ApplyError, ParseError, ReplayError, Result};
pub use types::{
    BookRow, BookSideKey, LevelKey, LevelRow, LiveOrder, OrderEvent, PriceKey, Side, PRICE_SCALE,
};

// Re-exports - Parsing and book state
pub use book::{BookAggregator, BookStats, LevelTotals};
pub use parser::{parse_event, DELIMITER};

// Re-exports - Replay driver
pub use replay::{ReplayConfig, ReplayEngine, ReplayStats, UnknownOrderPolicy};

// Re-exports - Collaborator seams
pub use report::{report_all, report_symbol, ReportSink, VecSink, WriterSink};
pub use source::{FileSource, LineSource, SourceMetadata, VecSource};

// Re-exports - Diagnostics
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticSummary, DiagnosticTracker, DiagnosticTrackerConfig,
};
