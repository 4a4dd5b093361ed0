//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;
use gpm_core::{CellRange, CellValue, Workbook};

/// Number of ledger columns: account, period, amount.
const LEDGER_COLUMNS: usize = 3;
/// Only the amount column is stored as numbers.
const AMOUNT_COLUMN: usize = 2;

/// Ledger CSV reader
pub struct CsvReader;

impl CsvReader {
    /// Read a ledger CSV file into a new workbook
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Workbook> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read a ledger CSV into a new workbook.
    ///
    /// The first record is the header row. The header and every data row land
    /// on `options.sheet_name` starting at A1, and `options.table_name` spans
    /// them, so the table's data body is exactly the imported rows.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Workbook> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if headers.len() < LEDGER_COLUMNS {
            return Err(CsvError::Parse {
                row: 1,
                column: headers.len() + 1,
                message: format!(
                    "expected {LEDGER_COLUMNS} columns (account, period, amount), found {}",
                    headers.len()
                ),
            });
        }

        let mut workbook = Workbook::empty();
        workbook.add_worksheet_with_name(&options.sheet_name)?;
        let worksheet = workbook
            .worksheet_by_name_mut(&options.sheet_name)
            .ok_or_else(|| gpm_core::Error::SheetNotFound(options.sheet_name.clone()))?;

        for (col, value) in headers.iter().take(LEDGER_COLUMNS).enumerate() {
            worksheet.set_cell_value_at(0, col as u16, value)?;
        }

        let mut row_idx = 1u32;
        for result in csv_reader.records() {
            let record = result?;

            for (col, field) in record.iter().take(LEDGER_COLUMNS).enumerate() {
                // account and period are labels even when they look numeric
                let value = if col == AMOUNT_COLUMN {
                    Self::detect_type(field)
                } else {
                    CellValue::from(field)
                };

                worksheet.set_cell_value_at(row_idx, col as u16, value)?;
            }

            row_idx += 1;
        }

        let range = CellRange::from_indices(0, 0, row_idx - 1, LEDGER_COLUMNS as u16 - 1);
        workbook.add_table(&options.sheet_name, &options.table_name, range)?;

        tracing::debug!(
            "Imported {} ledger row(s) into {}!{}",
            row_idx - 1,
            options.sheet_name,
            options.table_name
        );
        Ok(workbook)
    }

    /// Detect the type of a field value.
    ///
    /// Only numbers are recognised; labels such as `TRUE` or `Q1` stay text.
    fn detect_type(field: &str) -> CellValue {
        let trimmed = field.trim();

        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::from(field),
        }
    }
}
