//! Cell-related types
//!
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A range of cells (e.g., "A1:B7")
//! - [`CellData`] - Value plus the formatting the add-in applies

mod address;
pub(crate) mod value;

pub use address::{CellAddress, CellRange};
pub use value::{CellError, CellValue};

use crate::format::NumberFormat;

/// Complete cell contents: value, number format and font weight
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellData {
    /// The cell value
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: CellValue,
    /// Display format
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "NumberFormat::is_general")
    )]
    pub number_format: NumberFormat,
    /// Bold font
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "is_false"))]
    pub bold: bool,
}

#[cfg(feature = "serde")]
fn is_false(b: &bool) -> bool {
    !*b
}

impl CellData {
    /// True when the cell carries neither a value nor formatting
    pub fn is_blank(&self) -> bool {
        self.value.is_empty() && self.number_format.is_general() && !self.bold
    }

    /// The text a user would see in the cell
    pub fn display_text(&self) -> String {
        match &self.value {
            CellValue::Number(n) => self.number_format.render(*n),
            other => other.to_string(),
        }
    }
}
