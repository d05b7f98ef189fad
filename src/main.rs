//! Interactive personal finance ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run                      # uses ./finance_data.csv
//! cargo run -- ~/books/2024.csv  # uses another ledger file
//! ```
//!
//! The program presents a menu to add a transaction, view a report for a date
//! range (optionally with a chart), or exit. Logs go to stderr and are controlled
//! by `RUST_LOG`.
use anyhow::Result;
use finance_ledger::app;
use finance_ledger::config::LedgerConfig;
use finance_ledger::prompt::Prompter;
use finance_ledger::store::Ledger;
use std::env;
use std::io;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_logger();

    match main_inner() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn main_inner() -> Result<()> {
    let config = LedgerConfig::from_args(env::args());
    debug!("{config:?}");

    let ledger = Ledger::new(config);
    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
    app::run(&ledger, &mut prompter)
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` is used when set; otherwise only warnings and errors from this
/// program are shown.
fn init_logger() {
    let filter = match env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("{}=warn", env!("CARGO_CRATE_NAME"))),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
