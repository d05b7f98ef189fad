//! Core data types for the finance ledger.
//!
//! This module defines the ledger's single entity, [`Transaction`], together with
//! the closed [`Category`] enumeration and the parsing rules shared by the prompts
//! and the CSV store.
//!
//! # Type Aliases
//!
//! - [`Amount`]: Type alias for monetary amounts (Decimal)
//!
//! # Serialization
//!
//! All types implement [`Serialize`] and [`Deserialize`] from `serde` for CSV
//! processing. Custom serializers and deserializers ensure the on-disk format:
//! - Dates are written and read as `dd-mm-yyyy`
//! - Categories are written as the literal strings `Income` and `Expense`
//! - Amounts are written as decimal text and accept float or scientific text on read

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub type Amount = Decimal;

/// The date format used for storage, prompts and display.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Column order of the ledger file.
pub const COLUMNS: [&str; 4] = ["date", "amount", "category", "description"];

/// Whether money came in or went out.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Category {
    Income,
    Expense,
}

impl Category {
    /// Single-letter codes accepted at the category prompt.
    const CODES: [(&'static str, Category); 2] =
        [("I", Category::Income), ("E", Category::Expense)];

    /// Decodes a case-insensitive single-letter code (`I` or `E`).
    pub fn from_code(code: &str) -> Result<Self> {
        let code = code.trim().to_uppercase();
        Self::CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, category)| *category)
            .context("Invalid category. Please enter 'I' for Income or 'E' for Expense.")
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Income => "Income",
            Category::Expense => "Expense",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single income or expense entry in the ledger.
///
/// Transactions carry no identifier; they are identified only by their position
/// in the ledger file. Duplicates are permitted.
///
/// # Fields
///
/// - `date`: The calendar day of the transaction, stored as `dd-mm-yyyy`
/// - `amount`: A strictly positive amount
/// - `category`: Income or Expense
/// - `description`: Free text, possibly empty. Missing in older rows reads as empty.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct Transaction {
    #[serde(with = "ledger_date")]
    pub date: NaiveDate,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Amount,
    pub category: Category,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        amount: Amount,
        category: Category,
        description: impl Into<String>,
    ) -> Self {
        Transaction {
            date,
            amount,
            category,
            description: description.into(),
        }
    }
}

/// Parses a date in the fixed `dd-mm-yyyy` format.
///
/// Day and month take one or two digits; the year takes exactly four. Signs,
/// short years and other separators are rejected.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if !has_date_shape(trimmed) {
        bail!("Invalid date format. Please enter the date in dd-mm-yyyy format");
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .context("Invalid date format. Please enter the date in dd-mm-yyyy format")
}

fn has_date_shape(text: &str) -> bool {
    fn digits(part: &str, min: usize, max: usize) -> bool {
        (min..=max).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
    }

    let parts: Vec<&str> = text.split('-').collect();
    match parts.as_slice() {
        [day, month, year] => digits(day, 1, 2) && digits(month, 1, 2) && digits(year, 4, 4),
        _ => false,
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses decimal text, falling back to scientific notation (`1e3`).
fn parse_decimal(input: &str) -> Result<Decimal> {
    let trimmed = input.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .with_context(|| format!("could not convert string to amount: '{}'", trimmed))
}

/// Largest amount accepted for a single transaction.
///
/// Keeps every total well inside `Decimal`'s range.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Parses a user-entered amount.
///
/// The amount must be strictly positive and no larger than [`MAX_AMOUNT`].
pub fn parse_amount(input: &str) -> Result<Amount> {
    let amount = parse_decimal(input)?;
    if amount <= Decimal::ZERO {
        bail!("Amount must be a non-negative, non-zero value.");
    }
    if amount > Decimal::from(MAX_AMOUNT) {
        bail!("Amount must not exceed {}.", MAX_AMOUNT);
    }
    Ok(amount)
}

/// Custom deserializer for ledger amounts.
///
/// Rows written by hand or by older versions of the program may hold float text
/// (`100.0`) or numbers in scientific notation; all of these are accepted. Empty
/// values are rejected.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = Decimal;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a decimal number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if value.trim().is_empty() {
                return Err(de::Error::custom("missing amount"));
            }
            parse_decimal(value).map_err(|e| de::Error::custom(format!("invalid decimal: {}", e)))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Decimal::try_from(value)
                .map_err(|e| de::Error::custom(format!("invalid decimal from float: {}", e)))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Decimal::from(value))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Decimal::from(value))
        }
    }

    deserializer.deserialize_str(AmountVisitor)
}

/// Serde adapter storing a [`NaiveDate`] as `dd-mm-yyyy` text.
mod ledger_date {
    use super::{format_date, parse_date};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).map_err(|_| de::Error::custom(format!("invalid date '{}'", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_codes_are_case_insensitive() {
        assert_eq!(Category::from_code("i").unwrap(), Category::Income);
        assert_eq!(Category::from_code("I").unwrap(), Category::Income);
        assert_eq!(Category::from_code("e").unwrap(), Category::Expense);
        assert_eq!(Category::from_code(" E ").unwrap(), Category::Expense);
    }

    #[test]
    fn unknown_category_codes_are_rejected() {
        for code in ["", "x", "Income", "IE", "0"] {
            assert!(Category::from_code(code).is_err(), "{:?} should be rejected", code);
        }
    }

    #[test]
    fn parse_date_accepts_day_month_year() {
        let date = parse_date("05-03-2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(format_date(date), "05-03-2024");
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        for input in [
            "2024-03-05",
            "31-02-2024",
            "05/03/2024",
            "",
            "yesterday",
            "01-01-24",
            "01-01-+2024",
            "01-01-20245",
            "+1-01-2024",
            "001-01-2024",
        ] {
            assert!(parse_date(input).is_err(), "{:?} should be rejected", input);
        }
    }

    #[test]
    fn parse_amount_requires_positive_values() {
        assert_eq!(parse_amount("12.50").unwrap(), Decimal::from_str("12.5").unwrap());
        assert_eq!(parse_amount("1e2").unwrap(), Decimal::from(100));
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn parse_date_accepts_single_digit_day_and_month() {
        assert_eq!(
            parse_date("5-3-2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn parse_amount_has_a_ceiling() {
        assert_eq!(parse_amount("1000000000000").unwrap(), Decimal::from(MAX_AMOUNT));
        assert!(parse_amount("1000000000000.01").is_err());
        assert!(parse_amount("50000000000000000000000000000").is_err());
    }

    #[test]
    fn non_positive_amount_message() {
        let err = parse_amount("-1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Amount must be a non-negative, non-zero value."
        );
    }

    #[test]
    fn transaction_rows_read_float_amounts_and_empty_descriptions() {
        let data = "date,amount,category,description\n\
                    01-01-2024,100.0,Income,Salary\n\
                    02-01-2024,40,Expense,\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<Transaction> = reader.deserialize().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].amount, Decimal::from(100));
        assert_eq!(rows[0].category, Category::Income);
        assert_eq!(rows[1].description, "");
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }
}
