//! Summaries of transactions over a date range.
//!
//! This module computes income, expense and net savings totals for a filtered set
//! of transactions and renders them, together with the transactions themselves,
//! as a plain-text report.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::RoundingStrategy;
use std::io::Write;

use crate::types::{Amount, Category, Transaction, format_date};

pub const NO_TRANSACTIONS: &str = "No transactions found in the given date range.";

/// Totals over a set of transactions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total_income: Amount,
    pub total_expense: Amount,
}

impl Summary {
    /// Sums income and expense amounts.
    ///
    /// # Errors
    ///
    /// Returns an error if either total overflows.
    pub fn from_transactions(transactions: &[Transaction]) -> Result<Self> {
        let mut summary = Summary::default();
        for tx in transactions {
            match tx.category {
                Category::Income => {
                    summary.total_income = summary
                        .total_income
                        .checked_add(tx.amount)
                        .ok_or_else(|| anyhow!("Overflow in total income"))?;
                }
                Category::Expense => {
                    summary.total_expense = summary
                        .total_expense
                        .checked_add(tx.amount)
                        .ok_or_else(|| anyhow!("Overflow in total expense"))?;
                }
            }
        }
        Ok(summary)
    }

    pub fn net_savings(&self) -> Amount {
        self.total_income - self.total_expense
    }
}

/// Formats an amount with a currency prefix and two decimal places.
pub fn format_money(currency: &str, amount: Amount) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{:.2}", currency, rounded.abs())
    } else {
        format!("{}{:.2}", currency, rounded.abs())
    }
}

/// Writes the report for the transactions found between `start` and `end`.
///
/// An empty set produces only a "no transactions" notice. Otherwise the
/// transactions are listed in a table followed by the income, expense and
/// net savings totals.
///
/// # Arguments
///
/// * `out` - Where the report is written
/// * `start` - The first day of the reported range, shown in the heading
/// * `end` - The last day of the reported range, shown in the heading
/// * `transactions` - The transactions within the range
/// * `currency` - Prefix for the money totals
///
/// # Errors
///
/// This function will return an error if:
/// - Writing to `out` fails
/// - A total overflows, which cannot happen for amounts accepted at entry
pub fn write_report<W: Write>(
    out: &mut W,
    start: NaiveDate,
    end: NaiveDate,
    transactions: &[Transaction],
    currency: &str,
) -> Result<()> {
    if transactions.is_empty() {
        writeln!(out, "{}", NO_TRANSACTIONS)?;
        return Ok(());
    }

    let summary = Summary::from_transactions(transactions)?;

    writeln!(
        out,
        "Transactions from {} to {}",
        format_date(start),
        format_date(end)
    )?;
    write_table(out, transactions)?;
    writeln!(out)?;
    writeln!(out, "Summary:")?;
    writeln!(
        out,
        "Total Income: {}",
        format_money(currency, summary.total_income)
    )?;
    writeln!(
        out,
        "Total Expense: {}",
        format_money(currency, summary.total_expense)
    )?;
    writeln!(
        out,
        "Net Savings: {}",
        format_money(currency, summary.net_savings())
    )?;
    Ok(())
}

/// Writes the transactions as a right-aligned table, one row per transaction.
fn write_table<W: Write>(out: &mut W, transactions: &[Transaction]) -> Result<()> {
    let rows: Vec<[String; 4]> = transactions
        .iter()
        .map(|tx| {
            [
                format_date(tx.date),
                tx.amount.to_string(),
                tx.category.to_string(),
                tx.description.clone(),
            ]
        })
        .collect();

    let headers = ["date", "amount", "category", "description"];
    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 4]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:>width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join(" ")
    };

    writeln!(out, "{}", line(headers))?;
    for row in &rows {
        writeln!(
            out,
            "{}",
            line([
                row[0].as_str(),
                row[1].as_str(),
                row[2].as_str(),
                row[3].as_str()
            ])
            .trim_end()
        )?;
    }
    Ok(())
}
