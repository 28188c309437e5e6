//! Book aggregator: owns all book state and applies order events.
//!
//! This is not a matching engine. It answers one question — how much
//! resting size and how many orders exist at each price — for any
//! symbol/side pair, at any point of a sequential replay.
//!
//! State layout:
//! - order history: order_id -> last known [`LiveOrder`] (ahash map)
//! - aggregate totals: (symbol, side, price) -> [`LevelTotals`] (ahash map)
//! - price index: (symbol, side) -> sorted set of prices ever seen
//!
//! Price-index insertion is permanent: a level whose size drops to zero
//! stays enumerable and is filtered at query time instead. Aggregate
//! counters are signed and never clamped.

use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashMap;

use super::level::LevelTotals;
use crate::error::ApplyError;
use crate::types::{
    BookRow, BookSideKey, LevelKey, LevelRow, LiveOrder, OrderEvent, PriceKey, Side,
};

/// Counters for monitoring a replay.
#[derive(Debug, Clone, Default)]
pub struct BookStats {
    /// Events successfully applied.
    pub events_applied: u64,

    /// Top-level Add events applied. Modify re-adds count as modifies.
    pub adds: u64,

    /// Top-level (purge) deletes applied.
    pub deletes: u64,

    /// Modify events applied.
    pub modifies: u64,

    /// Adds that overwrote an existing history entry (order-id reuse).
    pub duplicate_adds: u64,

    /// Orders currently in history.
    pub live_orders: usize,

    /// Distinct (symbol, side, price) keys ever touched.
    pub price_levels: usize,
}

/// Aggregate limit-order-book view for any number of symbols.
///
/// # Example
///
/// ```
/// use lob_replay::{parse_event, BookAggregator, Side};
///
/// let mut book = BookAggregator::new();
/// book.apply(parse_event("IBM|A|B|1|100|50.5").unwrap()).unwrap();
///
/// let levels = book.query_levels("IBM", Side::Buy);
/// assert_eq!(levels.len(), 1);
/// assert_eq!(levels[0].price.raw(), "50.5");
/// assert_eq!(levels[0].total_size, 100);
/// assert_eq!(levels[0].order_count, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BookAggregator {
    /// Aggregate totals per price level.
    totals: AHashMap<LevelKey, LevelTotals>,

    /// Every price ever seen per (symbol, side), sorted. Never shrinks.
    price_index: BTreeMap<BookSideKey, BTreeSet<PriceKey>>,

    /// Order history: last known state per order id. Ids are global across
    /// symbols (the wire format does not namespace them).
    history: AHashMap<u64, LiveOrder>,

    /// Statistics.
    stats: BookStats,
}

impl BookAggregator {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event to the book.
    ///
    /// On `Err` the book state is untouched.
    ///
    /// # Errors
    ///
    /// [`ApplyError::UnknownOrder`] when a Delete or Modify references an
    /// order id with no prior Add in history.
    pub fn apply(&mut self, event: OrderEvent) -> Result<(), ApplyError> {
        match event {
            OrderEvent::Add {
                symbol,
                side,
                order_id,
                size,
                price,
            } => {
                self.add_order(symbol, side, order_id, size, price);
                self.stats.adds += 1;
            }
            OrderEvent::Delete { symbol, order_id } => {
                // Purge: the id will not be referenced again.
                self.remove_contribution(&symbol, order_id, true)?;
                self.stats.deletes += 1;
            }
            OrderEvent::Modify {
                symbol,
                order_id,
                new_size,
                new_price,
            } => {
                self.modify_order(symbol, order_id, new_size, new_price)?;
                self.stats.modifies += 1;
            }
        }

        self.stats.events_applied += 1;
        self.stats.live_orders = self.history.len();
        self.stats.price_levels = self.totals.len();

        Ok(())
    }

    /// Add an order's contribution and record it in history.
    fn add_order(&mut self, symbol: String, side: Side, order_id: u64, size: u64, price: PriceKey) {
        let key = LevelKey {
            symbol: symbol.clone(),
            side,
            price: price.clone(),
        };
        self.totals.entry(key).or_default().apply(size as i64);

        self.price_index
            .entry(BookSideKey {
                symbol: symbol.clone(),
                side,
            })
            .or_default()
            .insert(price.clone());

        let previous = self.history.insert(
            order_id,
            LiveOrder {
                order_id,
                symbol,
                side,
                size,
                price,
            },
        );

        // Order-id reuse: last write wins, and the old contribution stays
        // in the aggregates. Callers can watch `duplicate_adds` and the
        // replay diagnostics.
        if previous.is_some() {
            self.stats.duplicate_adds += 1;
            log::debug!("order id {order_id} reused; history overwritten");
        }
    }

    /// Reverse an order's aggregate contribution.
    ///
    /// The aggregate key uses the *event's* symbol with the stored side and
    /// price. With `purge` the history entry is removed as well; a modify
    /// backout keeps it so the re-add can recover the side.
    ///
    /// Returns the stored side.
    fn remove_contribution(
        &mut self,
        symbol: &str,
        order_id: u64,
        purge: bool,
    ) -> Result<Side, ApplyError> {
        let order = self
            .history
            .get(&order_id)
            .ok_or(ApplyError::UnknownOrder(order_id))?;

        let key = LevelKey {
            symbol: symbol.to_string(),
            side: order.side,
            price: order.price.clone(),
        };
        let size = order.size as i64;
        let side = order.side;

        // A delete naming a symbol the order never traded under lands on a
        // fresh (possibly negative) level.
        self.totals.entry(key).or_default().back_out(size);

        if purge {
            self.history.remove(&order_id);
        }

        Ok(side)
    }

    /// Two-phase modify: backout, then re-add with the recovered side.
    fn modify_order(
        &mut self,
        symbol: String,
        order_id: u64,
        new_size: u64,
        new_price: PriceKey,
    ) -> Result<(), ApplyError> {
        let side = self.remove_contribution(&symbol, order_id, false)?;
        self.add_order(symbol, side, order_id, new_size, new_price);
        Ok(())
    }

    /// All visible price levels for one symbol/side, ascending by price.
    ///
    /// Levels with non-positive size are suppressed, not deleted.
    pub fn query_levels(&self, symbol: &str, side: Side) -> Vec<LevelRow> {
        let key = BookSideKey {
            symbol: symbol.to_string(),
            side,
        };
        let Some(prices) = self.price_index.get(&key) else {
            return Vec::new();
        };

        let mut rows = Vec::new();
        for price in prices {
            let level_key = LevelKey {
                symbol: symbol.to_string(),
                side,
                price: price.clone(),
            };
            if let Some(totals) = self.totals.get(&level_key) {
                if totals.is_visible() {
                    rows.push(LevelRow {
                        price: price.clone(),
                        total_size: totals.total_size(),
                        order_count: totals.order_count(),
                    });
                }
            }
        }
        rows
    }

    /// All visible levels for one symbol: buy side first, then sell side,
    /// each ascending by price.
    pub fn query_symbol(&self, symbol: &str) -> Vec<BookRow> {
        let mut rows = Vec::new();
        for side in [Side::Buy, Side::Sell] {
            rows.extend(
                self.query_levels(symbol, side)
                    .into_iter()
                    .map(|level| BookRow {
                        symbol: symbol.to_string(),
                        side,
                        price: level.price,
                        total_size: level.total_size,
                        order_count: level.order_count,
                    }),
            );
        }
        rows
    }

    /// Full snapshot: every visible level of every (symbol, side), ordered
    /// by symbol, then side, then ascending price.
    pub fn query_all(&self) -> Vec<BookRow> {
        let mut rows = Vec::new();
        for key in self.price_index.keys() {
            rows.extend(
                self.query_levels(&key.symbol, key.side)
                    .into_iter()
                    .map(|level| BookRow {
                        symbol: key.symbol.clone(),
                        side: key.side,
                        price: level.price,
                        total_size: level.total_size,
                        order_count: level.order_count,
                    }),
            );
        }
        rows
    }

    /// Distinct symbols with any indexed price level, ascending.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self
            .price_index
            .keys()
            .map(|k| k.symbol.as_str())
            .collect();
        symbols.dedup();
        symbols
    }

    /// Whether an order id is currently in history.
    pub fn contains_order(&self, order_id: u64) -> bool {
        self.history.contains_key(&order_id)
    }

    /// Number of orders currently in history.
    pub fn live_order_count(&self) -> usize {
        self.history.len()
    }

    /// Current statistics.
    pub fn stats(&self) -> &BookStats {
        &self.stats
    }

    /// Reset to an empty book.
    pub fn reset(&mut self) {
        self.totals.clear();
        self.price_index.clear();
        self.history.clear();
        self.stats = BookStats::default();
    }
}
