//! CLI driver: replay an order-event log and print the aggregate book.
//!
//! # Usage
//!
//! ```bash
//! # Print the whole book after replay
//! cargo run --release --bin replay_book -- --input orderBookInput.txt
//!
//! # Print selected symbols first, then the whole book
//! cargo run --release --bin replay_book -- \
//!     --input orderBookInput.txt --symbol IBM --symbol MSFT
//!
//! # Stop on the first delete/modify of an unknown order id
//! cargo run --release --bin replay_book -- \
//!     --input orderBookInput.txt --strict
//!
//! # Export skip diagnostics as JSON
//! cargo run --release --bin replay_book -- \
//!     --input orderBookInput.txt --diagnostics skipped.json
//! ```
//!
//! Output format is one line per visible price level:
//! `Symbol|Side|Price|TotalSize|OrderCount`.

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use lob_replay::{
    report_all, report_symbol, FileSource, ReplayConfig, ReplayEngine, UnknownOrderPolicy,
    WriterSink,
};

/// Command-line arguments
struct Args {
    /// Input event-log file
    input: PathBuf,
    /// Symbols to print individually before the full book
    symbols: Vec<String>,
    /// Abort on unknown-order events instead of skipping them
    strict: bool,
    /// Optional path for JSON diagnostic export
    diagnostics: Option<PathBuf>,
    /// Print replay statistics to stderr
    verbose: bool,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().collect();

    let mut input: Option<PathBuf> = None;
    let mut symbols = Vec::new();
    let mut strict = false;
    let mut diagnostics = None;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" | "-i" => {
                i += 1;
                if i >= args.len() {
                    return Err("--input requires a path".to_string());
                }
                input = Some(PathBuf::from(&args[i]));
            }
            "--symbol" | "-s" => {
                i += 1;
                if i >= args.len() {
                    return Err("--symbol requires a symbol name".to_string());
                }
                symbols.push(args[i].clone());
            }
            "--diagnostics" | "-d" => {
                i += 1;
                if i >= args.len() {
                    return Err("--diagnostics requires a path".to_string());
                }
                diagnostics = Some(PathBuf::from(&args[i]));
            }
            "--strict" => {
                strict = true;
            }
            "--verbose" | "-v" => {
                verbose = true;
            }
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            arg => {
                // Positional argument: the input file
                if input.is_none() {
                    input = Some(PathBuf::from(arg));
                } else {
                    return Err(format!("Unknown argument: {arg}"));
                }
            }
        }
        i += 1;
    }

    let input = input.ok_or("Input path is required")?;

    Ok(Args {
        input,
        symbols,
        strict,
        diagnostics,
        verbose,
    })
}

fn print_help() {
    eprintln!(
        r#"
Replay an order-event log into an aggregate book view

Replays Symbol|A/D/M events one at a time, then prints the resulting
price levels as Symbol|Side|Price|TotalSize|OrderCount rows.

USAGE:
    replay_book [OPTIONS] --input <FILE>
    replay_book <FILE>

OPTIONS:
    -i, --input <FILE>        Input event-log file (pipe-delimited)
    -s, --symbol <SYMBOL>     Print this symbol before the full book
                              (repeatable)
    -d, --diagnostics <FILE>  Export skip diagnostics as JSON
        --strict              Abort on deletes/modifies of unknown orders
                              (default: report and skip)
    -v, --verbose             Print replay statistics to stderr
    -h, --help                Print this help message

EXAMPLES:
    # Full book snapshot
    replay_book -i orderBookInput.txt

    # Per-symbol sections first
    replay_book -i orderBookInput.txt -s IBM -s MSFT
"#
    );
}

fn run(args: &Args) -> lob_replay::Result<()> {
    let policy = if args.strict {
        UnknownOrderPolicy::Abort
    } else {
        UnknownOrderPolicy::Skip
    };

    let source = FileSource::new(&args.input)?;
    let mut engine = ReplayEngine::with_config(
        ReplayConfig::new().with_unknown_order_policy(policy),
    );
    engine.replay(source)?;

    let stdout = io::stdout();
    let mut sink = WriterSink::new(stdout.lock());

    if !args.symbols.is_empty() {
        println!("Printing individual symbols:");
        for symbol in &args.symbols {
            report_symbol(engine.book(), symbol, &mut sink)?;
        }
        println!();
    }

    println!("Printing the entire book:");
    report_all(engine.book(), &mut sink)?;
    sink.into_inner()?.flush()?;

    if let Some(path) = &args.diagnostics {
        engine.diagnostics().export_to_file(path)?;
        eprintln!(
            "Exported {} diagnostic(s) to {}",
            engine.diagnostics().total_count(),
            path.display()
        );
    }

    if args.verbose {
        let stats = engine.stats();
        eprintln!("Replay statistics:");
        eprintln!("  Lines read:      {}", stats.lines_read);
        eprintln!("  Events applied:  {}", stats.events_applied);
        eprintln!("  Parse errors:    {}", stats.parse_errors);
        eprintln!("  Unknown orders:  {}", stats.unknown_orders);
        eprintln!("  Live orders:     {}", engine.book().live_order_count());
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(1);
        }
    };

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
