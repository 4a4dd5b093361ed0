//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellData, CellRange, CellValue};
use crate::error::{Error, Result};
use crate::format::NumberFormat;
use crate::table::Table;
use crate::{DEFAULT_COLUMN_WIDTH, MAX_COLS};

/// Character-width padding Excel adds around auto-fitted content
const AUTOFIT_PADDING: f64 = 0.71;

/// A worksheet (single sheet in a workbook)
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Non-blank cells, row-major
    #[cfg_attr(feature = "serde", serde(default))]
    cells: BTreeMap<CellAddress, CellData>,
    /// Explicit column widths (in characters)
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "BTreeMap::is_empty")
    )]
    column_widths: BTreeMap<u16, f64>,
    /// Structured tables on this sheet
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    tables: Vec<Table>,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    // === Cell Access ===

    /// Get cell data at row/column
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellData> {
        self.cells.get(&CellAddress::new(row, col))
    }

    /// Get a cell value by A1 address
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr.row, addr.col))
    }

    /// Get a cell value at row/column (`Empty` when unset)
    pub fn get_value_at(&self, row: u32, col: u16) -> CellValue {
        self.cell_at(row, col)
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    /// Set a cell value by A1 address
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value at row/column
    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
    ) -> Result<()> {
        let addr = Self::checked_address(row, col)?;
        self.update_cell(addr, |cell| cell.value = value.into());
        Ok(())
    }

    /// Whether a cell is bold
    pub fn is_bold_at(&self, row: u32, col: u16) -> bool {
        self.cell_at(row, col).map(|c| c.bold).unwrap_or(false)
    }

    /// Text shown for a cell, after number formatting
    pub fn display_text_at(&self, row: u32, col: u16) -> String {
        self.cell_at(row, col)
            .map(CellData::display_text)
            .unwrap_or_default()
    }

    // === Range Operations ===

    /// Read a rectangular block of values
    pub fn range_values(&self, range: &CellRange) -> Vec<Vec<CellValue>> {
        range
            .rows()
            .map(|row| range.cols().map(|col| self.get_value_at(row, col)).collect())
            .collect()
    }

    /// Write a rectangular block of values; the shape must match the range
    pub fn set_range_values(&mut self, range: &CellRange, values: &[Vec<CellValue>]) -> Result<()> {
        let shape_ok = values.len() == range.row_count() as usize
            && values.iter().all(|r| r.len() == range.col_count() as usize);
        if !shape_ok {
            return Err(Error::ShapeMismatch {
                range: range.to_string(),
                rows: range.row_count(),
                cols: range.col_count(),
                actual_rows: values.len(),
                actual_cols: values.first().map(Vec::len).unwrap_or(0),
            });
        }

        for (row, row_values) in range.rows().zip(values) {
            for (col, value) in range.cols().zip(row_values) {
                self.set_cell_value_at(row, col, value.clone())?;
            }
        }
        Ok(())
    }

    /// Apply a number format to every cell of a range
    pub fn set_range_number_format(&mut self, range: &CellRange, format: &NumberFormat) {
        for addr in range.cells() {
            self.update_cell(addr, |cell| cell.number_format = format.clone());
        }
    }

    /// Set the font weight of every cell of a range
    pub fn set_range_bold(&mut self, range: &CellRange, bold: bool) {
        for addr in range.cells() {
            self.update_cell(addr, |cell| cell.bold = bold);
        }
    }

    /// Get the used range (bounds of all non-blank cells)
    pub fn used_range(&self) -> Option<CellRange> {
        let mut iter = self.cells.keys();
        let first = iter.next()?;
        let (mut min_row, mut max_row) = (first.row, first.row);
        let (mut min_col, mut max_col) = (first.col, first.col);
        for addr in iter {
            min_row = min_row.min(addr.row);
            max_row = max_row.max(addr.row);
            min_col = min_col.min(addr.col);
            max_col = max_col.max(addr.col);
        }
        Some(CellRange::from_indices(min_row, min_col, max_row, max_col))
    }

    // === Column Operations ===

    /// Get column width
    pub fn column_width(&self, col: u16) -> f64 {
        self.column_widths
            .get(&col)
            .copied()
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    /// Set column width
    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.column_widths.insert(col, width);
    }

    /// Size the columns of `range` to fit their content
    ///
    /// Only rows inside `range` are measured. Columns with no content keep the
    /// default width.
    pub fn autofit_columns(&mut self, range: &CellRange) {
        for col in range.cols() {
            let widest = self
                .cells
                .iter()
                .filter(|&(addr, cell)| addr.col == col && range.contains(addr) && !cell.is_blank())
                .map(|(_, cell)| {
                    let chars = cell.display_text().chars().count() as f64;
                    if cell.bold {
                        chars * 1.1
                    } else {
                        chars
                    }
                })
                .fold(0.0_f64, f64::max);

            let width = if widest > 0.0 {
                (widest + AUTOFIT_PADDING).max(1.0)
            } else {
                DEFAULT_COLUMN_WIDTH
            };
            self.column_widths.insert(col, (width * 100.0).round() / 100.0);
        }
    }

    // === Tables ===

    /// Tables on this sheet
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Find a table by name (case-insensitive, as Excel does)
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    pub(crate) fn push_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    fn checked_address(row: u32, col: u16) -> Result<CellAddress> {
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }
        if row >= crate::MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, crate::MAX_ROWS - 1));
        }
        Ok(CellAddress::new(row, col))
    }

    /// Modify a cell in place, dropping it again if it ends up blank
    fn update_cell(&mut self, addr: CellAddress, f: impl FnOnce(&mut CellData)) {
        let cell = self.cells.entry(addr).or_default();
        f(cell);
        if cell.is_blank() {
            self.cells.remove(&addr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_and_get_values() {
        let mut ws = Worksheet::new("Data");
        ws.set_cell_value("A1", "Revenue").unwrap();
        ws.set_cell_value("C1", 1000.0).unwrap();

        assert_eq!(ws.get_value("A1").unwrap(), CellValue::string("Revenue"));
        assert_eq!(ws.get_value("B1").unwrap(), CellValue::Empty);
        assert_eq!(ws.used_range().unwrap().to_string(), "A1:C1");
    }

    #[test]
    fn test_range_values_shape_checked() {
        let mut ws = Worksheet::new("Out");
        let range = CellRange::parse("A1:B2").unwrap();
        let values = vec![
            vec![CellValue::from("Metric"), CellValue::from("Value")],
            vec![CellValue::from("Revenue"), CellValue::from(1000.0)],
        ];
        ws.set_range_values(&range, &values).unwrap();
        assert_eq!(ws.range_values(&range), values);

        let err = ws.set_range_values(&range, &values[..1]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { rows: 2, cols: 2, .. }));
    }

    #[test]
    fn test_formatting_and_display() {
        let mut ws = Worksheet::new("Out");
        ws.set_cell_value("B4", 1000.0).unwrap();
        ws.set_cell_value("B7", 0.4).unwrap();
        ws.set_range_number_format(&CellRange::parse("B4").unwrap(), &NumberFormat::currency());
        ws.set_range_number_format(
            &CellRange::parse("B7").unwrap(),
            &NumberFormat::percent_decimal(),
        );

        assert_eq!(ws.display_text_at(3, 1), "$1,000.00");
        assert_eq!(ws.display_text_at(6, 1), "40.00%");
    }

    #[test]
    fn test_clearing_value_keeps_formatted_cell() {
        let mut ws = Worksheet::new("Out");
        ws.set_range_bold(&CellRange::parse("A1").unwrap(), true);
        ws.set_cell_value("A1", CellValue::Empty).unwrap();
        assert!(ws.is_bold_at(0, 0));

        ws.set_range_bold(&CellRange::parse("A1").unwrap(), false);
        assert!(ws.cell_at(0, 0).is_none());
    }

    #[test]
    fn test_autofit_uses_display_text() {
        let mut ws = Worksheet::new("Out");
        ws.set_cell_value("A1", "Gross Profit Margin").unwrap();
        ws.set_cell_value("B1", 1234567.0).unwrap();
        ws.set_range_number_format(&CellRange::parse("B1").unwrap(), &NumberFormat::currency());

        ws.autofit_columns(&CellRange::parse("A:C").unwrap());

        assert_eq!(ws.column_width(0), 19.71);
        // "$1,234,567.00" is 13 characters
        assert_eq!(ws.column_width(1), 13.71);
        assert_eq!(ws.column_width(2), DEFAULT_COLUMN_WIDTH);
    }
}
