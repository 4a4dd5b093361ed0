//! Calculation errors

use std::fmt;

use thiserror::Error;

/// The two account categories the report aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Account {
    Revenue,
    Cogs,
}

impl Account {
    /// Match a normalised (trimmed, lower-case) account label
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "revenue" => Some(Account::Revenue),
            "cogs" => Some(Account::Cogs),
            _ => None,
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Account::Revenue => f.write_str("Revenue"),
            Account::Cogs => f.write_str("COGS"),
        }
    }
}

/// Reasons the margin cannot be computed
///
/// The `Display` text is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// The period field was empty or whitespace
    #[error("Please enter a period (for example, Q1).")]
    Validation,

    /// No row of the given account matched the period
    #[error("No {account} data found for period '{period}'.")]
    ZeroData { account: Account, period: String },

    /// Revenue summed to zero or less
    #[error("Revenue for period '{period}' is {revenue}; it must be greater than zero to calculate a margin.")]
    InvalidMargin { period: String, revenue: f64 },
}
