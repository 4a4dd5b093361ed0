//! Aggregation and margin computation

use std::fmt;

use gpm_protocol::CellValue;

use crate::error::{Account, CalcError};
use crate::ledger::LedgerRow;

/// A reporting period as entered by the user, trimmed and non-empty
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Period(String);

impl Period {
    /// Validate raw input from the period field
    pub fn parse(input: &str) -> Result<Self, CalcError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CalcError::Validation);
        }
        Ok(Period(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Running sums for one invocation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub revenue: f64,
    pub cogs: f64,
    pub revenue_found: bool,
    pub cogs_found: bool,
}

impl Totals {
    /// Sum the rows that belong to `period`
    pub fn collect<I>(period: &Period, rows: I) -> Self
    where
        I: IntoIterator<Item = LedgerRow>,
    {
        let mut totals = Totals::default();
        for row in rows {
            totals.add(period, &row);
        }
        totals
    }

    /// Fold one row in; rows for other periods or accounts are ignored
    pub fn add(&mut self, period: &Period, row: &LedgerRow) {
        if row.period != period.as_str() {
            return;
        }
        match Account::from_label(&row.account) {
            Some(Account::Revenue) => {
                self.revenue += row.amount;
                self.revenue_found = true;
            }
            Some(Account::Cogs) => {
                self.cogs += row.amount;
                self.cogs_found = true;
            }
            None => {}
        }
    }

    /// Check the totals and derive the margin
    pub fn into_margin(self, period: &Period) -> Result<GrossMargin, CalcError> {
        if !self.revenue_found {
            return Err(CalcError::ZeroData {
                account: Account::Revenue,
                period: period.to_string(),
            });
        }
        if !self.cogs_found {
            return Err(CalcError::ZeroData {
                account: Account::Cogs,
                period: period.to_string(),
            });
        }
        if self.revenue <= 0.0 {
            return Err(CalcError::InvalidMargin {
                period: period.to_string(),
                revenue: self.revenue,
            });
        }

        let gross_profit = self.revenue - self.cogs;
        Ok(GrossMargin {
            period: period.clone(),
            revenue: self.revenue,
            cogs: self.cogs,
            gross_profit,
            margin: gross_profit / self.revenue,
        })
    }
}

/// The computed summary for one period
#[derive(Debug, Clone, PartialEq)]
pub struct GrossMargin {
    pub period: Period,
    pub revenue: f64,
    pub cogs: f64,
    pub gross_profit: f64,
    /// `gross_profit / revenue`, unclamped
    pub margin: f64,
}

/// Aggregate `rows` for `period` and compute the gross profit margin
pub fn compute<I>(period: &Period, rows: I) -> Result<GrossMargin, CalcError>
where
    I: IntoIterator<Item = LedgerRow>,
{
    Totals::collect(period, rows).into_margin(period)
}

/// [`compute`] over a raw data-body block as read from the host
pub fn compute_from_cells(
    period: &Period,
    values: &[Vec<CellValue>],
) -> Result<GrossMargin, CalcError> {
    compute(period, values.iter().map(|row| LedgerRow::from_cells(row)))
}
