//! End-to-end replay tests over inline event logs.
//!
//! Each test drives the full pipeline — line source, parser, book,
//! report sink — and asserts on the rendered pipe-format output or the
//! collected rows.

use lob_replay::{
    report_all, report_symbol, DiagnosticCategory, ReplayConfig, ReplayEngine, Side,
    UnknownOrderPolicy, VecSink, VecSource, WriterSink,
};

fn replay(lines: &[&str]) -> ReplayEngine {
    let mut engine = ReplayEngine::with_config(ReplayConfig::new().with_logging(false));
    engine.replay(VecSource::from_lines(lines)).unwrap();
    engine
}

fn render_all(engine: &ReplayEngine) -> String {
    let mut sink = WriterSink::new(Vec::new());
    report_all(engine.book(), &mut sink).unwrap();
    String::from_utf8(sink.into_inner().unwrap()).unwrap()
}

#[test]
fn test_build_book_and_print_symbol() {
    let engine = replay(&[
        "IBM|A|B|100|1000|10.15",
        "IBM|A|B|101|500|10.15",
        "IBM|A|S|102|800|10.25",
        "MSFT|A|B|103|200|40.10",
    ]);

    let mut sink = WriterSink::new(Vec::new());
    report_symbol(engine.book(), "IBM", &mut sink).unwrap();
    let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();

    assert_eq!(out, "IBM|B|10.15|1500|2\nIBM|S|10.25|800|1\n");
}

#[test]
fn test_full_book_snapshot_ordering() {
    let engine = replay(&[
        "MSFT|A|S|1|10|101",
        "ABB|A|B|2|20|9",
        "ABB|A|B|3|30|10",
        "MSFT|A|B|4|40|100",
        "ABB|A|S|5|50|11",
    ]);

    // Symbol, then side (B before S), then numeric price (9 before 10).
    assert_eq!(
        render_all(&engine),
        "ABB|B|9|20|1\n\
         ABB|B|10|30|1\n\
         ABB|S|11|50|1\n\
         MSFT|B|100|40|1\n\
         MSFT|S|101|10|1\n"
    );
}

#[test]
fn test_delete_hides_level() {
    let engine = replay(&["IBM|A|B|1|100|50.5", "IBM|D|1"]);
    assert_eq!(render_all(&engine), "");

    // Replay again with a successor order at the same price.
    let engine = replay(&["IBM|A|B|1|100|50.5", "IBM|D|1", "IBM|A|B|2|70|50.5"]);
    assert_eq!(render_all(&engine), "IBM|B|50.5|70|1\n");
}

#[test]
fn test_modify_moves_size_to_new_price() {
    let engine = replay(&["IBM|A|B|1|5|10", "IBM|M|1|8|12"]);

    let rows = engine.book().query_levels("IBM", Side::Buy);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].price.raw(), "12");
    assert_eq!(rows[0].total_size, 8);
    assert_eq!(rows[0].order_count, 1);

    assert_eq!(render_all(&engine), "IBM|B|12|8|1\n");
}

#[test]
fn test_modify_then_delete_lifecycle() {
    let engine = replay(&[
        "IBM|A|S|1|5|10",
        "IBM|M|1|8|12",
        "IBM|M|1|3|11",
        "IBM|D|1",
    ]);

    assert_eq!(render_all(&engine), "");
    assert_eq!(engine.book().live_order_count(), 0);
    assert_eq!(engine.stats().events_applied, 4);
}

#[test]
fn test_unknown_operation_reported_and_skipped() {
    let engine = replay(&[
        "IBM|A|B|1|100|50.5",
        "IBM|Q|1",
        "IBM|A|B|2|50|50.5",
    ]);

    assert_eq!(engine.stats().parse_errors, 1);
    assert_eq!(
        engine
            .diagnostics()
            .count_by_category(DiagnosticCategory::UnknownOperation),
        1
    );
    assert_eq!(render_all(&engine), "IBM|B|50.5|150|2\n");
}

#[test]
fn test_unknown_order_skipped_by_default() {
    let engine = replay(&["IBM|D|999", "IBM|M|998|5|10", "IBM|A|B|1|100|50.5"]);

    assert_eq!(engine.stats().unknown_orders, 2);
    assert_eq!(render_all(&engine), "IBM|B|50.5|100|1\n");

    let summary = engine.diagnostics().summary();
    assert_eq!(summary.by_category.get("UNKNOWN_ORDER"), Some(&2));
    assert_eq!(summary.unique_orders, 2);
}

#[test]
fn test_strict_mode_aborts_on_unknown_order() {
    let mut engine = ReplayEngine::with_config(
        ReplayConfig::new()
            .with_unknown_order_policy(UnknownOrderPolicy::Abort)
            .with_logging(false),
    );
    let result = engine.replay(VecSource::from_lines(&[
        "IBM|A|B|1|100|50.5",
        "IBM|D|999",
    ]));

    assert!(result.is_err());
    assert_eq!(engine.stats().events_applied, 1);
}

#[test]
fn test_vec_sink_collects_rows() {
    let engine = replay(&["IBM|A|B|1|100|50.5", "IBM|A|S|2|40|51"]);

    let mut sink = VecSink::new();
    report_symbol(engine.book(), "IBM", &mut sink).unwrap();
    let rows = sink.into_rows();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].side, Side::Buy);
    assert_eq!(rows[0].total_size, 100);
    assert_eq!(rows[1].side, Side::Sell);
    assert_eq!(rows[1].order_count, 1);
}

#[test]
fn test_mixed_log_end_to_end() {
    // A log exercising every operation, bad lines included.
    let engine = replay(&[
        "IBM|A|B|1|1000|10",
        "IBM|A|B|2|500|10",
        "IBM|A|S|3|800|11",
        "bogus line",
        "IBM|M|2|750|10.5",
        "MSFT|A|B|4|200|40",
        "IBM|D|1",
        "MSFT|X|whatever",
        "MSFT|D|999",
    ]);

    let stats = engine.stats();
    assert_eq!(stats.lines_read, 9);
    assert_eq!(stats.events_applied, 6);
    assert_eq!(stats.parse_errors, 2);
    assert_eq!(stats.unknown_orders, 1);

    assert_eq!(
        render_all(&engine),
        "IBM|B|10.5|750|1\n\
         IBM|S|11|800|1\n\
         MSFT|B|40|200|1\n"
    );
}
