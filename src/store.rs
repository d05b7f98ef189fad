//! The CSV-backed transaction store.
//!
//! The ledger is a flat CSV file with the header `date,amount,category,description`.
//! Records are only ever appended. Every operation opens the file, does its work
//! and closes it again, so reads always reflect what is on disk at call time.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::LedgerConfig;
use crate::types::{COLUMNS, Transaction};

/// An iterator over the transactions of a ledger file.
///
/// This struct owns the CSV reader and file, allowing transactions to be streamed
/// one at a time without loading the entire file into memory. Rows shorter than
/// the header are padded with empty fields, so a row missing its trailing
/// description still reads.
pub struct LedgerReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
    path: PathBuf,
}

impl LedgerReader {
    fn parse(&self, mut record: StringRecord) -> Result<Transaction> {
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        while record.len() < self.headers.len() {
            record.push_field("");
        }
        record.deserialize(Some(&self.headers)).with_context(|| {
            format!(
                "Failed to parse record at line {} from: {}",
                line,
                self.path.display()
            )
        })
    }
}

impl Iterator for LedgerReader {
    type Item = Result<Transaction, anyhow::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(true) => Some(self.parse(record)),
            Ok(false) => None,
            Err(e) => Some(
                Err(e).with_context(|| format!("Failed to read ledger: {}", self.path.display())),
            ),
        }
    }
}

/// Append-only store of transactions in a single CSV file.
#[derive(Debug, Clone)]
pub struct Ledger {
    config: LedgerConfig,
}

impl Ledger {
    pub fn new(config: LedgerConfig) -> Self {
        Ledger { config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        self.config.ledger_path()
    }

    /// Creates the ledger file with its header row if it does not exist yet.
    ///
    /// An existing file is left untouched, whatever it contains, so calling this
    /// more than once is harmless. Missing parent directories are created.
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` once the ledger file exists.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The parent directory cannot be created
    /// - The file cannot be created (permission denied, disk full, etc.)
    /// - Writing or flushing the header fails
    pub fn initialize(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            debug!("Ledger {} already exists", path.display());
            return Ok(());
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create ledger: {}", path.display()))?;
        writer
            .write_record(COLUMNS)
            .context("Failed to write ledger header")?;
        writer.flush().context("Failed to flush ledger header")?;

        info!("Created ledger {}", path.display());
        Ok(())
    }

    /// Appends one transaction to the end of the ledger.
    ///
    /// The record is written in the fixed column order with standard CSV quoting.
    /// No validation happens here; callers are expected to hand over well-formed
    /// transactions.
    ///
    /// # Arguments
    ///
    /// * `transaction` - The transaction to append
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The ledger cannot be opened for appending
    /// - Serializing or flushing the record fails
    pub fn add_entry(&self, transaction: &Transaction) -> Result<()> {
        let path = self.path();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .with_context(|| format!("Failed to open ledger for append: {}", path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .serialize(transaction)
            .with_context(|| format!("Failed to write record to: {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush ledger: {}", path.display()))?;

        info!(
            date = %transaction.date,
            amount = %transaction.amount,
            category = %transaction.category,
            "Appended transaction"
        );
        Ok(())
    }

    /// Streams every transaction in the ledger in file order.
    ///
    /// # Returns
    ///
    /// Returns an iterator over `Result<Transaction>`.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The ledger cannot be opened (file not found, permission denied, etc.)
    /// - The header row cannot be read
    ///
    /// Note: Individual record parsing errors are returned when iterating over the
    /// result, naming the line the record starts on.
    pub fn read_all(&self) -> Result<LedgerReader> {
        let path = self.path();
        let file = File::open(path)
            .with_context(|| format!("Failed to open ledger: {}", path.display()))?;
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read ledger header: {}", path.display()))?
            .clone();

        Ok(LedgerReader {
            reader,
            headers,
            path: path.to_path_buf(),
        })
    }

    /// Returns the transactions dated between `start` and `end`, both inclusive,
    /// in the order they appear in the ledger.
    ///
    /// # Arguments
    ///
    /// * `start` - The first day of the range
    /// * `end` - The last day of the range
    ///
    /// # Returns
    ///
    /// The matching transactions. The result may be empty, including when `start`
    /// is after `end`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the ledger cannot be read or any of
    /// its records fails to parse.
    pub fn transactions_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let mut matching = Vec::new();
        for transaction in self.read_all()? {
            let transaction = transaction?;
            if start <= transaction.date && transaction.date <= end {
                matching.push(transaction);
            }
        }

        debug!(
            "Found {} transactions between {} and {}",
            matching.len(),
            start,
            end
        );
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn date(day: u32, month: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn ledger_in(dir: &TempDir) -> Ledger {
        Ledger::new(LedgerConfig::default().with_ledger_path(dir.path().join("finance_data.csv")))
    }

    fn tx(day: u32, amount: &str, category: Category, description: &str) -> Transaction {
        Transaction::new(
            date(day, 1, 2024),
            Decimal::from_str(amount).unwrap(),
            category,
            description,
        )
    }

    #[test]
    fn initialize_writes_header() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);

        ledger.initialize().unwrap();

        let contents = fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(contents, "date,amount,category,description\n");
    }

    #[test]
    fn initialize_leaves_existing_file_untouched() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        let existing = "not,a,ledger\nat all\n";
        fs::write(ledger.path(), existing).unwrap();

        ledger.initialize().unwrap();
        ledger.initialize().unwrap();

        assert_eq!(fs::read_to_string(ledger.path()).unwrap(), existing);
    }

    #[test]
    fn initialize_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::new(
            LedgerConfig::default().with_ledger_path(dir.path().join("nested/books.csv")),
        );

        ledger.initialize().unwrap();

        assert!(ledger.path().exists());
    }

    #[test]
    fn add_entry_appends_in_column_order() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        ledger.initialize().unwrap();

        ledger
            .add_entry(&tx(5, "12.50", Category::Expense, "lunch, with \"friends\""))
            .unwrap();

        let contents = fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(
            contents,
            "date,amount,category,description\n\
             05-01-2024,12.50,Expense,\"lunch, with \"\"friends\"\"\"\n"
        );
    }

    #[test]
    fn appended_transaction_reads_back_equal() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        ledger.initialize().unwrap();
        let original = tx(10, "99.99", Category::Income, "refund, partial");

        ledger.add_entry(&original).unwrap();

        let found = ledger
            .transactions_between(date(1, 1, 2024), date(31, 1, 2024))
            .unwrap();
        assert_eq!(found, vec![original]);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        ledger.initialize().unwrap();
        for day in [9, 10, 15, 20, 21] {
            ledger
                .add_entry(&tx(day, "1", Category::Income, &format!("day {}", day)))
                .unwrap();
        }

        let found = ledger
            .transactions_between(date(10, 1, 2024), date(20, 1, 2024))
            .unwrap();

        let days: Vec<NaiveDate> = found.iter().map(|t| t.date).collect();
        assert_eq!(days, vec![date(10, 1, 2024), date(15, 1, 2024), date(20, 1, 2024)]);
    }

    #[test]
    fn results_keep_file_order_and_duplicates() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        ledger.initialize().unwrap();
        let entries = vec![
            tx(3, "5", Category::Expense, "b"),
            tx(1, "5", Category::Expense, "a"),
            tx(3, "5", Category::Expense, "b"),
        ];
        for entry in &entries {
            ledger.add_entry(entry).unwrap();
        }

        let found = ledger
            .transactions_between(date(1, 1, 2024), date(3, 1, 2024))
            .unwrap();
        assert_eq!(found, entries);
    }

    #[test]
    fn empty_range_returns_no_transactions() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        ledger.initialize().unwrap();
        ledger.add_entry(&tx(5, "10", Category::Income, "")).unwrap();

        let before = ledger
            .transactions_between(date(1, 2, 2024), date(28, 2, 2024))
            .unwrap();
        let reversed = ledger
            .transactions_between(date(31, 1, 2024), date(1, 1, 2024))
            .unwrap();

        assert!(before.is_empty());
        assert!(reversed.is_empty());
    }

    #[test]
    fn reads_reflect_latest_appends() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        ledger.initialize().unwrap();
        let range = (date(1, 1, 2024), date(31, 1, 2024));

        ledger.add_entry(&tx(2, "1", Category::Income, "")).unwrap();
        assert_eq!(ledger.transactions_between(range.0, range.1).unwrap().len(), 1);

        ledger.add_entry(&tx(3, "2", Category::Expense, "")).unwrap();
        assert_eq!(ledger.transactions_between(range.0, range.1).unwrap().len(), 2);
    }

    #[test]
    fn malformed_rows_report_their_line() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        fs::write(
            ledger.path(),
            "date,amount,category,description\n01-01-2024,5,Income,ok\n2024-01-02,5,Income,bad\n",
        )
        .unwrap();

        let err = ledger
            .transactions_between(date(1, 1, 2024), date(31, 1, 2024))
            .unwrap_err();

        assert!(err.to_string().contains("line 3"), "unexpected error: {}", err);
    }

    #[test]
    fn short_rows_read_with_empty_description() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        fs::write(
            ledger.path(),
            "date,amount,category,description\n01-01-2024,5,Income\n02-01-2024,3,Expense,tea\n",
        )
        .unwrap();

        let found = ledger
            .transactions_between(date(1, 1, 2024), date(31, 1, 2024))
            .unwrap();

        assert_eq!(
            found,
            vec![
                tx(1, "5", Category::Income, ""),
                tx(2, "3", Category::Expense, "tea"),
            ]
        );
    }

    #[test]
    fn error_line_counts_newlines_inside_quoted_fields() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        fs::write(
            ledger.path(),
            "date,amount,category,description\n\
             01-01-2024,5,Income,\"two\nlines\"\n\
             02-01-2024,oops,Income,\n",
        )
        .unwrap();

        let err = ledger
            .transactions_between(date(1, 1, 2024), date(31, 1, 2024))
            .unwrap_err();

        assert!(err.to_string().contains("line 4"), "unexpected error: {}", err);
    }

    #[test]
    fn missing_ledger_is_an_error() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);

        assert!(ledger.read_all().is_err());
    }
}
