//! Report sinks: where ordered query rows go.
//!
//! The book hands the sink `(symbol, side, price, total_size, order_count)`
//! rows in query order; the sink owns presentation. `WriterSink` renders
//! the pipe format `Symbol|Side|Price|TotalSize|OrderCount`, one line per
//! price level.

use std::io::Write;

use crate::book::BookAggregator;
use crate::error::Result;
use crate::types::BookRow;

/// Receives ordered book rows.
pub trait ReportSink {
    /// Accept one row.
    fn emit(&mut self, row: &BookRow) -> Result<()>;
}

/// Renders rows in the pipe wire format to any writer.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Create a sink over a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> ReportSink for WriterSink<W> {
    fn emit(&mut self, row: &BookRow) -> Result<()> {
        writeln!(
            self.writer,
            "{}|{}|{}|{}|{}",
            row.symbol, row.side, row.price, row.total_size, row.order_count
        )?;
        Ok(())
    }
}

/// Collects rows for assertions in tests.
#[derive(Debug, Default)]
pub struct VecSink {
    rows: Vec<BookRow>,
}

impl VecSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected rows.
    pub fn rows(&self) -> &[BookRow] {
        &self.rows
    }

    /// Consume the sink and return the rows.
    pub fn into_rows(self) -> Vec<BookRow> {
        self.rows
    }
}

impl ReportSink for VecSink {
    fn emit(&mut self, row: &BookRow) -> Result<()> {
        self.rows.push(row.clone());
        Ok(())
    }
}

/// Emit all visible levels of one symbol (buys, then sells).
pub fn report_symbol(book: &BookAggregator, symbol: &str, sink: &mut impl ReportSink) -> Result<()> {
    for row in book.query_symbol(symbol) {
        sink.emit(&row)?;
    }
    Ok(())
}

/// Emit the full book snapshot (symbol, side, ascending price).
pub fn report_all(book: &BookAggregator, sink: &mut impl ReportSink) -> Result<()> {
    for row in book.query_all() {
        sink.emit(&row)?;
    }
    Ok(())
}
