//! Core data types for order events and the aggregate book view.
//!
//! Design notes:
//! - Composite keys are proper structs (`LevelKey`, `BookSideKey`) rather
//!   than delimiter-joined strings, so equality and ordering are explicit.
//! - `PriceKey` keeps the original price text as the grouping key and a
//!   fixed-point tick value for numeric ordering.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Fixed-point price scale: 1 tick = 1e-9 of the quoted unit.
pub const PRICE_SCALE: i64 = 1_000_000_000;

/// Order side (buy or sell).
///
/// Declaration order matters: `Buy` sorts before `Sell`, which is the
/// side ordering `query_all` relies on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Side {
    /// Buy order.
    Buy = b'B',
    /// Sell order.
    Sell = b'S',
}

impl Side {
    /// Parse side from a byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'B' => Some(Side::Buy),
            b'S' => Some(Side::Sell),
            _ => None,
        }
    }

    /// Convert to byte representation.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// The single-letter wire code (`B` or `S`).
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "B",
            Side::Sell => "S",
        }
    }

    /// Check if this is a buy.
    #[inline(always)]
    pub fn is_buy(self) -> bool {
        matches!(self, Side::Buy)
    }

    /// Check if this is a sell.
    #[inline(always)]
    pub fn is_sell(self) -> bool {
        matches!(self, Side::Sell)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price grouping and ordering key.
///
/// The raw input text is the identity: two prices are the same level only
/// if their text matches exactly (`50.5` and `50.50` stay distinct, as in
/// the wire format). Ordering, however, is numeric over the fixed-point
/// tick value, with the raw text as a tiebreaker, so `9` sorts before `10`.
#[derive(Debug, Clone)]
pub struct PriceKey {
    raw: String,
    ticks: i64,
}

impl PriceKey {
    /// Parse a price token: non-negative decimal, at most 9 fractional
    /// digits, no sign or exponent.
    pub fn parse(raw: &str) -> Option<Self> {
        let (int_part, frac_part) = match raw.split_once('.') {
            Some((i, f)) => (i, f),
            None => (raw, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if frac_part.len() > 9 {
            return None;
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let mut ticks: i64 = 0;
        for b in int_part.bytes() {
            ticks = ticks
                .checked_mul(10)?
                .checked_add(i64::from(b - b'0'))?;
        }
        ticks = ticks.checked_mul(PRICE_SCALE)?;

        let mut frac: i64 = 0;
        for b in frac_part.bytes() {
            frac = frac * 10 + i64::from(b - b'0');
        }
        for _ in frac_part.len()..9 {
            frac *= 10;
        }
        ticks = ticks.checked_add(frac)?;

        Some(Self {
            raw: raw.to_string(),
            ticks,
        })
    }

    /// The original price text (used for grouping and output).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Fixed-point tick value (scale [`PRICE_SCALE`]).
    pub fn ticks(&self) -> i64 {
        self.ticks
    }
}

// Identity is the raw text; a matching raw implies matching ticks, so the
// manual Eq/Hash/Ord impls below are mutually consistent.
impl PartialEq for PriceKey {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for PriceKey {}

impl Hash for PriceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialOrd for PriceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ticks
            .cmp(&other.ticks)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl fmt::Display for PriceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for PriceKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for PriceKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        PriceKey::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid price: {raw:?}")))
    }
}

/// A single order-book event from the input log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    /// New resting order.
    Add {
        symbol: String,
        side: Side,
        order_id: u64,
        size: u64,
        price: PriceKey,
    },
    /// Remove an order entirely.
    Delete { symbol: String, order_id: u64 },
    /// Replace an order's size and price, keeping its side.
    Modify {
        symbol: String,
        order_id: u64,
        new_size: u64,
        new_price: PriceKey,
    },
}

impl OrderEvent {
    /// The symbol this event targets.
    pub fn symbol(&self) -> &str {
        match self {
            OrderEvent::Add { symbol, .. }
            | OrderEvent::Delete { symbol, .. }
            | OrderEvent::Modify { symbol, .. } => symbol,
        }
    }

    /// The order id this event targets.
    pub fn order_id(&self) -> u64 {
        match self {
            OrderEvent::Add { order_id, .. }
            | OrderEvent::Delete { order_id, .. }
            | OrderEvent::Modify { order_id, .. } => *order_id,
        }
    }
}

/// Last known state of a live order, kept in the history map.
///
/// Created on Add, overwritten by the re-Add phase of a Modify, removed
/// only by a purge (top-level) Delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveOrder {
    pub order_id: u64,
    pub symbol: String,
    pub side: Side,
    pub size: u64,
    pub price: PriceKey,
}

/// Aggregate key: one price level within a symbol/side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LevelKey {
    pub symbol: String,
    pub side: Side,
    pub price: PriceKey,
}

/// Key for one side of one symbol's book (the price-index key).
///
/// Derived ordering is symbol first, then side, which gives `query_all`
/// its deterministic snapshot order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookSideKey {
    pub symbol: String,
    pub side: Side,
}

/// One price level in a per-side query result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelRow {
    pub price: PriceKey,
    pub total_size: i64,
    pub order_count: i64,
}

/// One fully-keyed row in a symbol or whole-book query result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookRow {
    pub symbol: String,
    pub side: Side,
    pub price: PriceKey,
    pub total_size: i64,
    pub order_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_from_byte() {
        assert_eq!(Side::from_byte(b'B'), Some(Side::Buy));
        assert_eq!(Side::from_byte(b'S'), Some(Side::Sell));
        assert_eq!(Side::from_byte(b'A'), None);
    }

    #[test]
    fn test_side_ordering() {
        assert!(Side::Buy < Side::Sell);
    }

    #[test]
    fn test_price_key_parse_integer() {
        let p = PriceKey::parse("100").unwrap();
        assert_eq!(p.raw(), "100");
        assert_eq!(p.ticks(), 100 * PRICE_SCALE);
    }

    #[test]
    fn test_price_key_parse_decimal() {
        let p = PriceKey::parse("50.5").unwrap();
        assert_eq!(p.ticks(), 50 * PRICE_SCALE + 500_000_000);

        let p = PriceKey::parse(".25").unwrap();
        assert_eq!(p.ticks(), 250_000_000);
    }

    #[test]
    fn test_price_key_parse_rejects() {
        assert!(PriceKey::parse("").is_none());
        assert!(PriceKey::parse(".").is_none());
        assert!(PriceKey::parse("-1").is_none());
        assert!(PriceKey::parse("+1").is_none());
        assert!(PriceKey::parse("1.2.3").is_none());
        assert!(PriceKey::parse("abc").is_none());
        assert!(PriceKey::parse("1.0000000001").is_none()); // 10 frac digits
        assert!(PriceKey::parse("99999999999999999999").is_none()); // overflow
    }

    #[test]
    fn test_price_key_numeric_ordering() {
        // Numeric ordering: 9 < 10, unlike lexicographic.
        let nine = PriceKey::parse("9").unwrap();
        let ten = PriceKey::parse("10").unwrap();
        assert!(nine < ten);
    }

    #[test]
    fn test_price_key_grouping_is_textual() {
        let a = PriceKey::parse("50.5").unwrap();
        let b = PriceKey::parse("50.50").unwrap();
        // Numerically equal, but distinct grouping keys with a total order.
        assert_eq!(a.ticks(), b.ticks());
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn test_price_key_display_round_trips_raw() {
        let p = PriceKey::parse("007.30").unwrap();
        assert_eq!(p.to_string(), "007.30");
    }

    #[test]
    fn test_book_side_key_ordering() {
        let ibm_buy = BookSideKey {
            symbol: "IBM".to_string(),
            side: Side::Buy,
        };
        let ibm_sell = BookSideKey {
            symbol: "IBM".to_string(),
            side: Side::Sell,
        };
        let msft_buy = BookSideKey {
            symbol: "MSFT".to_string(),
            side: Side::Buy,
        };
        assert!(ibm_buy < ibm_sell);
        assert!(ibm_sell < msft_buy);
    }

    #[test]
    fn test_event_accessors() {
        let event = OrderEvent::Delete {
            symbol: "IBM".to_string(),
            order_id: 7,
        };
        assert_eq!(event.symbol(), "IBM");
        assert_eq!(event.order_id(), 7);
    }

    #[test]
    fn test_price_key_serde() {
        let p = PriceKey::parse("50.5").unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"50.5\"");
        let back: PriceKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
