//! The interactive menu loop.

use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

use crate::chart;
use crate::prompt::Prompter;
use crate::report;
use crate::store::Ledger;
use crate::types::Transaction;

const MENU: &str = "\n1. Add a new transaction\n\
                    2. View transactions and summary within a date range\n\
                    3. Exit";
const CHOICE_PROMPT: &str = "Enter your choice (1-3): ";
const ADD_DATE_PROMPT: &str =
    "Enter the date of the transaction (dd-mm-yyyy) or enter for today's date: ";
const START_DATE_PROMPT: &str = "Enter the start date (dd-mm-yyyy): ";
const END_DATE_PROMPT: &str = "Enter the end date (dd-mm-yyyy): ";
const PLOT_PROMPT: &str = "Do you want to see a plot? (y/n): ";
const DISMISS_PROMPT: &str = "Press Enter to return to the menu...";

/// What the user picked from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddTransaction,
    ViewReport,
    Exit,
}

impl Action {
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Action::AddTransaction),
            "2" => Some(Action::ViewReport),
            "3" => Some(Action::Exit),
            _ => None,
        }
    }
}

/// Runs the menu until the user chooses to exit.
pub fn run<R: BufRead, W: Write>(ledger: &Ledger, prompter: &mut Prompter<R, W>) -> Result<()> {
    ledger.initialize()?;

    loop {
        writeln!(prompter.out(), "{}", MENU)?;
        let choice = prompter.line(CHOICE_PROMPT)?;

        match Action::from_choice(&choice) {
            Some(Action::AddTransaction) => add(ledger, prompter)?,
            Some(Action::ViewReport) => view_report(ledger, prompter)?,
            Some(Action::Exit) => {
                writeln!(prompter.out(), "Exiting...")?;
                return Ok(());
            }
            None => {
                debug!("Unrecognized menu choice {:?}", choice);
                writeln!(prompter.out(), "Invalid choice, enter 1, 2, or 3.")?;
            }
        }
    }
}

/// Collects a new transaction and appends it to the ledger.
pub fn add<R: BufRead, W: Write>(ledger: &Ledger, prompter: &mut Prompter<R, W>) -> Result<()> {
    ledger.initialize()?;

    let date = prompter.date(ADD_DATE_PROMPT, true)?;
    let amount = prompter.amount()?;
    let category = prompter.category()?;
    let description = prompter.description()?;

    ledger.add_entry(&Transaction::new(date, amount, category, description))?;
    writeln!(prompter.out(), "Entry added successfully")?;
    Ok(())
}

/// Reports on a date range and optionally plots it.
pub fn view_report<R: BufRead, W: Write>(
    ledger: &Ledger,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let start = prompter.date(START_DATE_PROMPT, false)?;
    let end = prompter.date(END_DATE_PROMPT, false)?;

    let transactions = ledger.transactions_between(start, end)?;
    report::write_report(
        prompter.out(),
        start,
        end,
        &transactions,
        ledger.config().currency(),
    )?;

    if prompter.confirm(PLOT_PROMPT)? {
        let path = ledger.config().chart_path();
        if chart::plot_transactions(&transactions, path)? {
            writeln!(prompter.out(), "Chart written to {}", path.display())?;
            prompter.line(DISMISS_PROMPT)?;
        } else {
            writeln!(prompter.out(), "Nothing to plot.")?;
        }
    }
    Ok(())
}
