//! Structured tables (Excel "ListObjects")

use crate::cell::CellRange;
use crate::error::{Error, Result};

/// A named table occupying a rectangular range of a worksheet
///
/// The first row of the range is the header row; every row below it belongs
/// to the data body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    name: String,
    range: CellRange,
}

impl Table {
    /// Create a table over `range` (header row included)
    pub fn new<S: Into<String>>(name: S, range: CellRange) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(Error::InvalidTableName(name));
        }
        if range.is_whole_columns() {
            return Err(Error::InvalidRange(format!(
                "table '{}' cannot span whole columns",
                name
            )));
        }
        Ok(Self { name, range })
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full range, header included
    pub fn range(&self) -> CellRange {
        self.range
    }

    /// Data rows (header excluded), `None` for a header-only table
    pub fn data_body_range(&self) -> Option<CellRange> {
        if self.range.row_count() < 2 {
            return None;
        }
        Some(CellRange::from_indices(
            self.range.start.row + 1,
            self.range.start.col,
            self.range.end.row,
            self.range.end.col,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_body_excludes_header() {
        let table = Table::new("InputData", CellRange::parse("A1:C4").unwrap()).unwrap();
        assert_eq!(table.data_body_range().unwrap().to_string(), "A2:C4");
    }

    #[test]
    fn test_header_only_table_has_no_body() {
        let table = Table::new("Empty", CellRange::parse("B2:D2").unwrap()).unwrap();
        assert!(table.data_body_range().is_none());
    }

    #[test]
    fn test_invalid_names() {
        let range = CellRange::parse("A1:B2").unwrap();
        assert!(Table::new("", range).is_err());
        assert!(Table::new("Input Data", range).is_err());
    }
}
