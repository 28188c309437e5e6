//! Replay driver: line source -> parser -> book, with skip/report policy.
//!
//! One engine instance performs one single-threaded, single-pass replay.
//! Parse failures are always recoverable (the line is reported and
//! skipped); unknown-order failures follow the configured
//! [`UnknownOrderPolicy`]. Either way every skip lands in the
//! [`DiagnosticTracker`] with its line number and context.

use crate::book::BookAggregator;
use crate::diagnostics::{DiagnosticCategory, DiagnosticTracker};
use crate::error::{ApplyError, ParseError, ReplayError, Result};
use crate::parser::parse_event;
use crate::source::LineSource;
use crate::types::OrderEvent;

/// What to do when a Delete/Modify references an unknown order id.
///
/// Both choices are valid per the input contract; the point is that the
/// event never silently applies against a default-constructed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownOrderPolicy {
    /// Record a diagnostic and continue with the next line (default).
    #[default]
    Skip,

    /// Stop the replay and surface the error to the caller.
    Abort,
}

/// Configuration for replay behavior.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// How to handle unknown-order events.
    pub unknown_order_policy: UnknownOrderPolicy,

    /// Whether to log skipped lines via the `log` facade.
    pub log_warnings: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            unknown_order_policy: UnknownOrderPolicy::default(),
            log_warnings: true,
        }
    }
}

impl ReplayConfig {
    /// Create a default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unknown-order policy.
    pub fn with_unknown_order_policy(mut self, policy: UnknownOrderPolicy) -> Self {
        self.unknown_order_policy = policy;
        self
    }

    /// Enable/disable warning logs.
    pub fn with_logging(mut self, log: bool) -> Self {
        self.log_warnings = log;
        self
    }
}

/// Counters for one replay pass.
#[derive(Debug, Clone, Default)]
pub struct ReplayStats {
    /// Raw lines taken from the source (including skipped ones).
    pub lines_read: u64,

    /// Blank lines ignored.
    pub blank_lines: u64,

    /// Events successfully applied to the book.
    pub events_applied: u64,

    /// Lines skipped because they failed to parse.
    pub parse_errors: u64,

    /// Delete/Modify events that referenced an unknown order.
    pub unknown_orders: u64,
}

/// Sequential replay engine over a [`BookAggregator`].
///
/// # Example
///
/// ```
/// use lob_replay::replay::ReplayEngine;
/// use lob_replay::source::VecSource;
/// use lob_replay::Side;
///
/// let source = VecSource::from_lines(&[
///     "IBM|A|B|1|100|50.5",
///     "IBM|A|S|2|40|51",
/// ]);
///
/// let mut engine = ReplayEngine::new();
/// engine.replay(source).unwrap();
///
/// assert_eq!(engine.stats().events_applied, 2);
/// assert_eq!(engine.book().query_levels("IBM", Side::Buy).len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ReplayEngine {
    book: BookAggregator,
    config: ReplayConfig,
    tracker: DiagnosticTracker,
    stats: ReplayStats,
}

impl ReplayEngine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(ReplayConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(config: ReplayConfig) -> Self {
        Self {
            book: BookAggregator::new(),
            config,
            tracker: DiagnosticTracker::new(),
            stats: ReplayStats::default(),
        }
    }

    /// Drain a line source through the engine.
    ///
    /// # Errors
    ///
    /// Source read failures always abort; unknown-order events abort only
    /// under [`UnknownOrderPolicy::Abort`].
    pub fn replay<S: LineSource>(&mut self, source: S) -> Result<()> {
        for line in source.lines()? {
            let line = line?;
            self.apply_line(&line)?;
        }
        Ok(())
    }

    /// Feed one raw line through parse and apply.
    pub fn apply_line(&mut self, raw: &str) -> Result<()> {
        self.stats.lines_read += 1;
        let line_number = self.stats.lines_read;

        if raw.trim().is_empty() {
            self.stats.blank_lines += 1;
            return Ok(());
        }

        let event = match parse_event(raw) {
            Ok(event) => event,
            Err(err) => {
                self.skip_parse_error(line_number, raw, &err);
                return Ok(());
            }
        };

        // Order-id reuse is applied (last-write-wins) but reported.
        if let OrderEvent::Add { order_id, .. } = &event {
            if self.book.contains_order(*order_id) {
                self.tracker.record_order(
                    DiagnosticCategory::DuplicateOrderId,
                    format!("order id {order_id} reused by a second add"),
                    line_number,
                    *order_id,
                );
            }
        }

        match self.book.apply(event) {
            Ok(()) => {
                self.stats.events_applied += 1;
                Ok(())
            }
            Err(err @ ApplyError::UnknownOrder(order_id)) => {
                self.stats.unknown_orders += 1;
                self.tracker.record_order(
                    DiagnosticCategory::UnknownOrder,
                    err.to_string(),
                    line_number,
                    order_id,
                );
                if self.config.log_warnings {
                    log::warn!("line {line_number}: {err} - {raw}");
                }
                match self.config.unknown_order_policy {
                    UnknownOrderPolicy::Skip => Ok(()),
                    UnknownOrderPolicy::Abort => Err(ReplayError::Apply(err)),
                }
            }
        }
    }

    fn skip_parse_error(&mut self, line_number: u64, raw: &str, err: &ParseError) {
        self.stats.parse_errors += 1;

        let category = match err {
            ParseError::UnknownOperation(_) => DiagnosticCategory::UnknownOperation,
            _ => DiagnosticCategory::MalformedLine,
        };
        self.tracker
            .record_line(category, err.to_string(), line_number, raw);

        if self.config.log_warnings {
            log::warn!("line {line_number}: {err} - {raw}");
        }
    }

    /// The book built so far.
    pub fn book(&self) -> &BookAggregator {
        &self.book
    }

    /// Consume the engine and keep the book.
    pub fn into_book(self) -> BookAggregator {
        self.book
    }

    /// Replay counters.
    pub fn stats(&self) -> &ReplayStats {
        &self.stats
    }

    /// Recorded diagnostics.
    pub fn diagnostics(&self) -> &DiagnosticTracker {
        &self.tracker
    }
}
