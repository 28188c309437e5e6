//! Diagnostic tracking for replay anomalies.
//!
//! The replay policy is "report and continue" for bad lines, so every skip
//! needs enough context to diagnose the input afterwards: the category, the
//! line number, the raw line or the offending order id. The tracker stores
//! a capped list of records, keeps running per-category counts, and can
//! export everything as JSON.

use std::collections::HashMap;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Category of diagnostic for classification and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    /// Operation code not in {A, D, M}.
    UnknownOperation,

    /// Line failed validation (field count, numeric fields, side).
    MalformedLine,

    /// Delete/Modify referenced an order id with no prior Add.
    UnknownOrder,

    /// An Add reused an order id already in history.
    DuplicateOrderId,

    /// Other/uncategorized.
    Other,
}

impl DiagnosticCategory {
    /// Human-readable name for the category.
    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticCategory::UnknownOperation => "UNKNOWN_OPERATION",
            DiagnosticCategory::MalformedLine => "MALFORMED_LINE",
            DiagnosticCategory::UnknownOrder => "UNKNOWN_ORDER",
            DiagnosticCategory::DuplicateOrderId => "DUPLICATE_ORDER_ID",
            DiagnosticCategory::Other => "OTHER",
        }
    }
}

/// A single diagnostic record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique id (auto-incremented).
    pub id: u64,

    /// Category.
    pub category: DiagnosticCategory,

    /// Human-readable message.
    pub message: String,

    /// 1-based input line number, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u64>,

    /// The raw input line, if the diagnostic is line-addressed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_line: Option<String>,

    /// Offending order id, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal information.
    pub fn new(id: u64, category: DiagnosticCategory, message: impl Into<String>) -> Self {
        Self {
            id,
            category,
            message: message.into(),
            line_number: None,
            raw_line: None,
            order_id: None,
        }
    }

    /// Set the line number.
    pub fn with_line_number(mut self, line_number: u64) -> Self {
        self.line_number = Some(line_number);
        self
    }

    /// Set the raw line.
    pub fn with_raw_line(mut self, raw: impl Into<String>) -> Self {
        self.raw_line = Some(raw.into());
        self
    }

    /// Set the order id.
    pub fn with_order_id(mut self, order_id: u64) -> Self {
        self.order_id = Some(order_id);
        self
    }
}

/// Summary statistics over all recorded diagnostics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticSummary {
    /// Total recorded, including those dropped past the cap.
    pub total: u64,

    /// Count by category name.
    pub by_category: HashMap<String, u64>,

    /// Number of distinct order ids involved.
    pub unique_orders: u64,
}

/// Configuration for the tracker.
#[derive(Debug, Clone)]
pub struct DiagnosticTrackerConfig {
    /// Maximum number of records kept in memory; counts keep running past
    /// the cap.
    pub max_records: usize,
}

impl Default for DiagnosticTrackerConfig {
    fn default() -> Self {
        Self {
            max_records: 100_000,
        }
    }
}

/// Categorized, capped diagnostic store for one replay.
#[derive(Debug)]
pub struct DiagnosticTracker {
    config: DiagnosticTrackerConfig,
    records: Vec<Diagnostic>,
    next_id: u64,
    category_counts: HashMap<DiagnosticCategory, u64>,
    unique_orders: HashSet<u64>,
}

impl Default for DiagnosticTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticTracker {
    /// Create a tracker with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticTrackerConfig::default())
    }

    /// Create a tracker with custom configuration.
    pub fn with_config(config: DiagnosticTrackerConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
            next_id: 1,
            category_counts: HashMap::new(),
            unique_orders: HashSet::new(),
        }
    }

    /// Record a diagnostic built by the given closure (which receives the
    /// assigned id).
    pub fn record_with(
        &mut self,
        build: impl FnOnce(u64) -> Diagnostic,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let diagnostic = build(id);

        if let Some(order_id) = diagnostic.order_id {
            self.unique_orders.insert(order_id);
        }
        *self.category_counts.entry(diagnostic.category).or_insert(0) += 1;

        if self.records.len() < self.config.max_records {
            self.records.push(diagnostic);
        }
        id
    }

    /// Record a line-addressed diagnostic.
    pub fn record_line(
        &mut self,
        category: DiagnosticCategory,
        message: impl Into<String>,
        line_number: u64,
        raw_line: &str,
    ) -> u64 {
        let message = message.into();
        self.record_with(|id| {
            Diagnostic::new(id, category, message)
                .with_line_number(line_number)
                .with_raw_line(raw_line)
        })
    }

    /// Record an order-addressed diagnostic.
    pub fn record_order(
        &mut self,
        category: DiagnosticCategory,
        message: impl Into<String>,
        line_number: u64,
        order_id: u64,
    ) -> u64 {
        let message = message.into();
        self.record_with(|id| {
            Diagnostic::new(id, category, message)
                .with_line_number(line_number)
                .with_order_id(order_id)
        })
    }

    /// Number of records held in memory.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    /// Total recorded, including records dropped past the cap.
    pub fn total_count(&self) -> u64 {
        self.category_counts.values().sum()
    }

    /// Count for one category.
    pub fn count_by_category(&self, category: DiagnosticCategory) -> u64 {
        *self.category_counts.get(&category).unwrap_or(&0)
    }

    /// All held records.
    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    /// Summary statistics.
    pub fn summary(&self) -> DiagnosticSummary {
        let by_category = self
            .category_counts
            .iter()
            .map(|(cat, count)| (cat.name().to_string(), *count))
            .collect();

        DiagnosticSummary {
            total: self.total_count(),
            by_category,
            unique_orders: self.unique_orders.len() as u64,
        }
    }

    /// Export the summary and records to a JSON file.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        #[derive(Serialize)]
        struct Export<'a> {
            summary: DiagnosticSummary,
            diagnostics: &'a [Diagnostic],
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(
            &mut writer,
            &Export {
                summary: self.summary(),
                diagnostics: &self.records,
            },
        )?;
        writer.flush()
    }
}
