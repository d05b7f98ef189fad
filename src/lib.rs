//! A personal finance ledger.
//!
//! Income and expense transactions are kept in a flat CSV file. The crate offers
//! validated interactive entry, date-range reports with income, expense and net
//! savings totals, and a daily income vs. expense chart.
//!
//! # Examples
//!
//! Summarizing a handful of transactions:
//! ```
//! use chrono::NaiveDate;
//! use finance_ledger::report::Summary;
//! use finance_ledger::types::{Category, Transaction};
//! use rust_decimal::Decimal;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let transactions = vec![
//!     Transaction::new(day, Decimal::from(100), Category::Income, "Salary"),
//!     Transaction::new(day, Decimal::from(40), Category::Expense, "Groceries"),
//! ];
//!
//! let summary = Summary::from_transactions(&transactions).unwrap();
//! assert_eq!(summary.net_savings(), Decimal::from(60));
//! ```

pub mod app;
pub mod chart;
pub mod config;
pub mod prompt;
pub mod report;
pub mod store;
pub mod types;
