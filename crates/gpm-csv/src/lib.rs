//! # gpm-csv
//!
//! Loads an `account,period,amount` ledger from CSV into a workbook, as a
//! structured table the add-in can read.

mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::CsvReader;
