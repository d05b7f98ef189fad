//! Income and expense chart over time.
//!
//! Transactions are resampled to one total per calendar day and per category,
//! then drawn as two line series with ECharts. The chart is written as a
//! standalone HTML page that can be opened in any browser.

use anyhow::{Context, Result, anyhow};
use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisType, ItemStyle, LineStyle, SplitLine, Tooltip, Trigger},
    series::Line,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::types::{Amount, Category, Transaction, format_date};

const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.5.1/dist/echarts.min.js";

/// Per-day income and expense totals over a contiguous span of days.
///
/// `income[i]` and `expense[i]` are the totals for `days[i]`. Days without any
/// transaction of a category hold zero for that category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySeries {
    pub days: Vec<NaiveDate>,
    pub income: Vec<Amount>,
    pub expense: Vec<Amount>,
}

impl DailySeries {
    /// Resamples transactions to daily totals between their earliest and latest date.
    ///
    /// Returns `None` when there are no transactions.
    pub fn resample(transactions: &[Transaction]) -> Result<Option<Self>> {
        let Some(first) = transactions.iter().map(|tx| tx.date).min() else {
            return Ok(None);
        };
        let last = transactions.iter().map(|tx| tx.date).max().unwrap_or(first);
        let span = (last - first).num_days() as usize + 1;

        let mut series = DailySeries {
            days: first.iter_days().take(span).collect(),
            income: vec![Decimal::ZERO; span],
            expense: vec![Decimal::ZERO; span],
        };

        for tx in transactions {
            let day = (tx.date - first).num_days() as usize;
            let slot = match tx.category {
                Category::Income => &mut series.income[day],
                Category::Expense => &mut series.expense[day],
            };
            *slot = slot
                .checked_add(tx.amount)
                .ok_or_else(|| anyhow!("Overflow in daily {} total", tx.category))?;
        }

        Ok(Some(series))
    }

    pub fn labels(&self) -> Vec<String> {
        self.days.iter().map(|day| format_date(*day)).collect()
    }
}

fn to_points(amounts: &[Amount]) -> Vec<f64> {
    amounts
        .iter()
        .map(|amount| amount.to_f64().unwrap_or_default())
        .collect()
}

fn line_series(name: &str, color: &str, amounts: &[Amount]) -> Line {
    Line::new()
        .name(name)
        .item_style(ItemStyle::new().color(color))
        .line_style(LineStyle::new().color(color))
        .data(to_points(amounts))
}

/// Builds the income vs. expense line chart.
pub fn income_expense_chart(series_data: &DailySeries) -> Chart {
    Chart::new()
        .title(Title::new().text("Income and Expenses Over Time"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new().top("bottom"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("10%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .name("Date")
                .split_line(SplitLine::new().show(true))
                .data(series_data.labels()),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name("Amount")
                .split_line(SplitLine::new().show(true)),
        )
        .series(line_series("Income", "green", &series_data.income))
        .series(line_series("Expense", "red", &series_data.expense))
}

/// Wraps the chart options in a standalone HTML page.
pub fn chart_page(chart: &Chart) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Income and Expenses Over Time</title>
  <script src="{}"></script>
</head>
<body>
  <div id="chart" style="width: 1000px; height: 500px;"></div>
  <script>
    const chart = echarts.init(document.getElementById("chart"));
    chart.setOption({});
    window.addEventListener('resize', chart.resize);
  </script>
</body>
</html>
"#,
        ECHARTS_URL, chart
    )
}

/// Draws the daily income and expense chart for `transactions` into `path`.
///
/// Returns `false` without writing anything when there is nothing to plot.
pub fn plot_transactions(transactions: &[Transaction], path: &Path) -> Result<bool> {
    let Some(daily) = DailySeries::resample(transactions)? else {
        return Ok(false);
    };

    let page = chart_page(&income_expense_chart(&daily));
    fs::write(path, page)
        .with_context(|| format!("Failed to write chart: {}", path.display()))?;

    info!(
        "Wrote chart with {} days to {}",
        daily.days.len(),
        path.display()
    );
    Ok(true)
}
