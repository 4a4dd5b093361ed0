//! # gpm-report
//!
//! The computation behind the gross profit margin button, with no host access:
//!
//! - [`Period`] - validated, trimmed period input
//! - [`LedgerRow`] - one normalised `[account, period, amount]` table row
//! - [`compute`] - aggregate revenue and COGS for a period and derive the margin
//! - [`SummaryBlock`] - the 7x2 block written to the output sheet
//!
//! ```rust
//! use gpm_report::{compute, LedgerRow, Period};
//!
//! let period = Period::parse(" Q1 ").unwrap();
//! let rows = vec![
//!     LedgerRow::new("Revenue", "Q1", 1000.0),
//!     LedgerRow::new("COGS", "Q1", 600.0),
//!     LedgerRow::new("Revenue", "Q2", 500.0),
//! ];
//!
//! let result = compute(&period, rows).unwrap();
//! assert_eq!(result.gross_profit, 400.0);
//! assert_eq!(result.margin, 0.4);
//! ```

pub mod error;
pub mod ledger;
pub mod margin;
pub mod summary;

pub use error::{Account, CalcError};
pub use ledger::{coerce_amount, cell_text, LedgerRow};
pub use margin::{compute, compute_from_cells, GrossMargin, Period, Totals};
pub use summary::{output_sheet_name, SummaryBlock};
