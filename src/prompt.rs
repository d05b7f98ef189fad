//! Validated interactive input.
//!
//! Every accessor keeps asking until it gets a valid value. Validation problems
//! are printed and never returned to the caller; the only errors that escape are
//! I/O failures, including the input stream being closed.

use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use std::io::{BufRead, Write};
use tracing::debug;

use crate::types::{Amount, Category, parse_amount, parse_date};

pub const AMOUNT_PROMPT: &str = "Enter the amount: ";
pub const CATEGORY_PROMPT: &str = "Enter the category ('I' for Income or 'E' for Expense): ";
pub const DESCRIPTION_PROMPT: &str = "Enter a description (optional): ";

/// Reads answers from `input` and writes prompts and diagnostics to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Where prompts and messages are written.
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Prints `prompt` and returns the next line without its line terminator.
    pub fn line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input stream closed");
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    fn reject(&mut self, message: impl std::fmt::Display) -> Result<()> {
        debug!("Rejected input: {}", message);
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    /// Asks for a `dd-mm-yyyy` date.
    ///
    /// With `allow_default`, an empty answer means today.
    pub fn date(&mut self, prompt: &str, allow_default: bool) -> Result<NaiveDate> {
        loop {
            let answer = self.line(prompt)?;
            if allow_default && answer.is_empty() {
                return Ok(Local::now().date_naive());
            }
            match parse_date(&answer) {
                Ok(date) => return Ok(date),
                Err(e) => self.reject(e)?,
            }
        }
    }

    /// Asks for a strictly positive amount.
    pub fn amount(&mut self) -> Result<Amount> {
        loop {
            let answer = self.line(AMOUNT_PROMPT)?;
            match parse_amount(&answer) {
                Ok(amount) => return Ok(amount),
                Err(e) => self.reject(e)?,
            }
        }
    }

    /// Asks for a category code, `I` or `E` in either case.
    pub fn category(&mut self) -> Result<Category> {
        loop {
            let answer = self.line(CATEGORY_PROMPT)?;
            match Category::from_code(&answer) {
                Ok(category) => return Ok(category),
                Err(e) => self.reject(e)?,
            }
        }
    }

    /// Asks for free text. Anything is accepted, including nothing.
    pub fn description(&mut self) -> Result<String> {
        self.line(DESCRIPTION_PROMPT)
    }

    /// Asks a yes/no question; only `y` (either case) counts as yes.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self.line(prompt)?.trim().eq_ignore_ascii_case("y"))
    }
}
