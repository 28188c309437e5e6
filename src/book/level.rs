//! Aggregate totals for one price level.
//!
//! # Invariant
//!
//! For well-formed input, `total_size` equals the sum of the sizes of all
//! live orders at this level and `order_count` equals their count. Both
//! counters are signed and are never clamped: malformed input (deletes
//! against stale history, reused order ids) can legitimately drive them
//! through zero or negative, and the query layer filters rather than
//! corrects. Silently clamping would hide exactly the corruption a caller
//! needs to see.

/// Signed size/count aggregate for one `(symbol, side, price)` key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelTotals {
    total_size: i64,
    order_count: i64,
}

impl LevelTotals {
    /// Create an empty level.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for an order arriving at this level.
    #[inline]
    pub fn apply(&mut self, size: i64) {
        self.total_size += size;
        self.order_count += 1;
    }

    /// Reverse an order's contribution (delete or modify backout).
    #[inline]
    pub fn back_out(&mut self, size: i64) {
        self.total_size -= size;
        self.order_count -= 1;
    }

    /// Current aggregate size (may be zero or negative).
    #[inline]
    pub fn total_size(&self) -> i64 {
        self.total_size
    }

    /// Current order count (may be zero or negative).
    #[inline]
    pub fn order_count(&self) -> i64 {
        self.order_count
    }

    /// Whether the level shows up in query output.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.total_size > 0
    }
}
