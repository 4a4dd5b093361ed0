//! Error types for gpm-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gpm-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u16, u16),

    /// Sheet index out of bounds
    #[error("Sheet index {0} out of bounds (count: {1})")]
    SheetOutOfBounds(usize, usize),

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// Table not found on the given sheet
    #[error("Table '{table}' not found on sheet '{sheet}'")]
    TableNotFound { sheet: String, table: String },

    /// Invalid table name
    #[error("Invalid table name: '{0}'")]
    InvalidTableName(String),

    /// Table name already used somewhere in the workbook
    #[error("Table name already exists: {0}")]
    DuplicateTableName(String),

    /// Values written to a range do not match its shape
    #[error("Range {range} expects {rows}x{cols} values, got {actual_rows}x{actual_cols}")]
    ShapeMismatch {
        range: String,
        rows: u32,
        cols: u16,
        actual_rows: usize,
        actual_cols: usize,
    },

    /// The last worksheet cannot be removed
    #[error("A workbook must contain at least one visible worksheet")]
    LastSheet,

    /// IO error while reading or writing a workbook file
    #[cfg(feature = "serde")]
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed workbook file
    #[cfg(feature = "serde")]
    #[error("Workbook JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
