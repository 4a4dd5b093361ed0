//! # gpm-core
//!
//! In-memory workbook model used by the gpm local host.
//!
//! This crate provides the document types the host side of the add-in works on:
//! - [`CellValue`] - Cell values (numbers, strings, booleans, errors)
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing
//! - [`NumberFormat`] - Display formats (currency, percentage, ...)
//! - [`Table`] - Structured tables with a header row and a data body
//! - [`Workbook`], [`Worksheet`] - The document structures
//!
//! ## Example
//!
//! ```rust
//! use gpm_core::{CellValue, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_cell_value("A1", "Revenue").unwrap();
//! sheet.set_cell_value("B1", 1000.0).unwrap();
//!
//! assert_eq!(sheet.get_value("B1").unwrap(), CellValue::Number(1000.0));
//! ```

pub mod cell;
pub mod error;
pub mod format;
pub mod table;
pub mod workbook;
pub mod worksheet;

#[cfg(feature = "serde")]
pub mod io;

// Re-exports for convenience
pub use cell::{CellAddress, CellData, CellError, CellRange, CellValue};
pub use error::{Error, Result};
pub use format::NumberFormat;
pub use table::Table;
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Column width used when a column has never been sized
pub const DEFAULT_COLUMN_WIDTH: f64 = 8.43;
