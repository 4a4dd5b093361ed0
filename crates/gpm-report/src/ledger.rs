//! Normalising raw table rows

use gpm_protocol::CellValue;

/// One row of the input table, normalised for matching
///
/// `account` is trimmed and lower-cased, `period` is trimmed, `amount` is
/// whatever number the amount cell coerces to.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub account: String,
    pub period: String,
    pub amount: f64,
}

impl LedgerRow {
    /// Build a row from already-extracted fields, normalising them
    pub fn new(account: &str, period: &str, amount: f64) -> Self {
        Self {
            account: account.trim().to_lowercase(),
            period: period.trim().to_string(),
            amount,
        }
    }

    /// Build a row from table cells laid out as `[account, period, amount, ..]`
    ///
    /// Missing cells read as empty; extra cells are ignored.
    pub fn from_cells(cells: &[CellValue]) -> Self {
        let cell = |i: usize| cells.get(i).unwrap_or(&CellValue::Null);
        Self::new(&cell_text(cell(0)), &cell_text(cell(1)), coerce_amount(cell(2)))
    }
}

/// Text of a cell as a label (empty for null cells)
///
/// Whole numbers print without a fractional part so a period stored as the
/// number `2024` matches the text `2024`.
pub fn cell_text(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        CellValue::Number(n) => n.to_string(),
        CellValue::String(s) => s.clone(),
        CellValue::Error(e) => e.code.clone(),
    }
}

/// Coerce an amount cell to a number
///
/// Numbers pass through, numeric text is parsed, anything else (empty cells,
/// booleans, error values, non-numeric text, non-finite values) is 0.
pub fn coerce_amount(value: &CellValue) -> f64 {
    let n = match value {
        CellValue::Number(n) => *n,
        CellValue::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        CellValue::Null | CellValue::Bool(_) | CellValue::Error(_) => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}
