//! Event parser: one raw delimited record in, one typed [`OrderEvent`] out.
//!
//! Pure function, no side effects. The wire format (delimiter `|`):
//!
//! ```text
//! Symbol|A|Side|OrderId|Size|Price
//! Symbol|D|OrderId
//! Symbol|M|OrderId|NewSize|NewPrice
//! ```
//!
//! Field counts are exact; numeric fields are validated here so the book
//! never sees a malformed event.

use crate::error::ParseError;
use crate::types::{OrderEvent, PriceKey, Side};

/// Field delimiter of the wire format.
pub const DELIMITER: char = '|';

/// Field counts per operation.
const ADD_FIELDS: usize = 6;
const DELETE_FIELDS: usize = 3;
const MODIFY_FIELDS: usize = 5;

/// Parse one raw input line into an [`OrderEvent`].
///
/// # Errors
///
/// All variants of [`ParseError`] are per-line and recoverable: the caller
/// reports the line and moves on.
pub fn parse_event(raw: &str) -> Result<OrderEvent, ParseError> {
    let fields: Vec<&str> = raw.split(DELIMITER).collect();

    // Need at least symbol + operation code to dispatch.
    if fields.len() < 2 {
        return Err(ParseError::Truncated {
            expected: DELETE_FIELDS,
            found: fields.len(),
        });
    }

    match fields[1] {
        "A" => parse_add(&fields),
        "D" => parse_delete(&fields),
        "M" => parse_modify(&fields),
        op => Err(ParseError::UnknownOperation(op.to_string())),
    }
}

fn parse_add(fields: &[&str]) -> Result<OrderEvent, ParseError> {
    expect_fields(fields, ADD_FIELDS)?;

    let side = parse_side(fields[2])?;
    let order_id = parse_u64("order_id", fields[3])?;
    let size = parse_size(fields[4])?;
    let price = parse_price(fields[5])?;

    Ok(OrderEvent::Add {
        symbol: fields[0].to_string(),
        side,
        order_id,
        size,
        price,
    })
}

fn parse_delete(fields: &[&str]) -> Result<OrderEvent, ParseError> {
    expect_fields(fields, DELETE_FIELDS)?;

    Ok(OrderEvent::Delete {
        symbol: fields[0].to_string(),
        order_id: parse_u64("order_id", fields[2])?,
    })
}

fn parse_modify(fields: &[&str]) -> Result<OrderEvent, ParseError> {
    expect_fields(fields, MODIFY_FIELDS)?;

    Ok(OrderEvent::Modify {
        symbol: fields[0].to_string(),
        order_id: parse_u64("order_id", fields[2])?,
        new_size: parse_size(fields[3])?,
        new_price: parse_price(fields[4])?,
    })
}

fn expect_fields(fields: &[&str], expected: usize) -> Result<(), ParseError> {
    if fields.len() != expected {
        return Err(ParseError::Truncated {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

fn parse_side(raw: &str) -> Result<Side, ParseError> {
    match raw.as_bytes() {
        [b] => Side::from_byte(*b).ok_or_else(|| ParseError::InvalidSide(raw.to_string())),
        _ => Err(ParseError::InvalidSide(raw.to_string())),
    }
}

fn parse_u64(field: &'static str, raw: &str) -> Result<u64, ParseError> {
    raw.parse::<u64>().map_err(|_| ParseError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

/// Size is non-negative and bounded so it always fits the signed aggregate.
fn parse_size(raw: &str) -> Result<u64, ParseError> {
    let size = parse_u64("size", raw)?;
    if size > i64::MAX as u64 {
        return Err(ParseError::InvalidNumber {
            field: "size",
            value: raw.to_string(),
        });
    }
    Ok(size)
}

fn parse_price(raw: &str) -> Result<PriceKey, ParseError> {
    PriceKey::parse(raw).ok_or_else(|| ParseError::InvalidNumber {
        field: "price",
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let event = parse_event("IBM|A|B|1|100|50.5").unwrap();
        assert_eq!(
            event,
            OrderEvent::Add {
                symbol: "IBM".to_string(),
                side: Side::Buy,
                order_id: 1,
                size: 100,
                price: PriceKey::parse("50.5").unwrap(),
            }
        );
    }

    #[test]
    fn test_parse_delete() {
        let event = parse_event("MSFT|D|42").unwrap();
        assert_eq!(
            event,
            OrderEvent::Delete {
                symbol: "MSFT".to_string(),
                order_id: 42,
            }
        );
    }

    #[test]
    fn test_parse_modify() {
        let event = parse_event("MS|M|7|8|12").unwrap();
        assert_eq!(
            event,
            OrderEvent::Modify {
                symbol: "MS".to_string(),
                order_id: 7,
                new_size: 8,
                new_price: PriceKey::parse("12").unwrap(),
            }
        );
    }

    #[test]
    fn test_unknown_operation() {
        let err = parse_event("IBM|X|1|2|3").unwrap_err();
        assert_eq!(err, ParseError::UnknownOperation("X".to_string()));
    }

    #[test]
    fn test_truncated_add() {
        let err = parse_event("IBM|A|B|1|100").unwrap_err();
        assert_eq!(
            err,
            ParseError::Truncated {
                expected: 6,
                found: 5,
            }
        );
    }

    #[test]
    fn test_extra_fields_rejected() {
        let err = parse_event("IBM|D|1|junk").unwrap_err();
        assert_eq!(
            err,
            ParseError::Truncated {
                expected: 3,
                found: 4,
            }
        );
    }

    #[test]
    fn test_line_without_operation() {
        let err = parse_event("IBM").unwrap_err();
        assert!(matches!(err, ParseError::Truncated { found: 1, .. }));
    }

    #[test]
    fn test_invalid_size() {
        let err = parse_event("IBM|A|B|1|-5|50.5").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber { field: "size", .. }
        ));

        let err = parse_event("IBM|A|B|1|1e3|50.5").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber { field: "size", .. }
        ));
    }

    #[test]
    fn test_invalid_order_id() {
        let err = parse_event("IBM|D|abc").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber {
                field: "order_id",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_price() {
        let err = parse_event("IBM|A|B|1|100|fifty").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber { field: "price", .. }
        ));
    }

    #[test]
    fn test_invalid_side() {
        let err = parse_event("IBM|A|Q|1|100|50.5").unwrap_err();
        assert_eq!(err, ParseError::InvalidSide("Q".to_string()));

        let err = parse_event("IBM|A|BUY|1|100|50.5").unwrap_err();
        assert_eq!(err, ParseError::InvalidSide("BUY".to_string()));
    }

    #[test]
    fn test_zero_size_allowed() {
        // Size is non-negative; zero is valid on the wire.
        let event = parse_event("IBM|A|S|9|0|10").unwrap();
        assert!(matches!(event, OrderEvent::Add { size: 0, .. }));
    }
}
