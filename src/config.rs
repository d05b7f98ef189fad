//! Runtime configuration for the ledger.
//!
//! A [`LedgerConfig`] is built once at startup and handed to the components that
//! need it. It is never mutated afterwards.

use std::path::{Path, PathBuf};

pub const DEFAULT_LEDGER_FILE: &str = "finance_data.csv";
pub const DEFAULT_CHART_FILE: &str = "finance_chart.html";
pub const DEFAULT_CURRENCY: &str = "₹";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    ledger_path: PathBuf,
    chart_path: PathBuf,
    currency: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            ledger_path: PathBuf::from(DEFAULT_LEDGER_FILE),
            chart_path: PathBuf::from(DEFAULT_CHART_FILE),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl LedgerConfig {
    /// Builds the configuration from command-line arguments.
    ///
    /// The only accepted argument is an optional path to the ledger file. Any
    /// further arguments are ignored.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        match args.into_iter().nth(1) {
            Some(path) => LedgerConfig::default().with_ledger_path(path),
            None => LedgerConfig::default(),
        }
    }

    pub fn with_ledger_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ledger_path = path.into();
        self
    }

    pub fn with_chart_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chart_path = path.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    pub fn chart_path(&self) -> &Path {
        &self.chart_path
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}
