//! The output block written to the summary sheet
//!
//! ```text
//!      A                     B
//!  1   Period                Q1          (bold)
//!  2
//!  3   Metric                Value       (bold)
//!  4   Revenue               $1,000.00
//!  5   COGS                  $600.00
//!  6   Gross Profit          $400.00
//!  7   Gross Profit Margin   40.00%
//! ```

use gpm_protocol::CellValue;

use crate::margin::{GrossMargin, Period};

/// Sheet name for a period's summary: `prefix` followed by the trimmed period
pub fn output_sheet_name(prefix: &str, period: &Period) -> String {
    format!("{prefix}{period}")
}

/// Values and formatting for one summary sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryBlock {
    pub sheet_name: String,
    /// 7 rows of 2 cells, matching [`SummaryBlock::RANGE`]
    pub values: Vec<Vec<CellValue>>,
}

impl SummaryBlock {
    /// Where the block is written
    pub const RANGE: &'static str = "A1:B7";
    /// Revenue, COGS and gross profit values
    pub const CURRENCY_RANGE: &'static str = "B4:B6";
    /// Margin value
    pub const PERCENT_RANGE: &'static str = "B7";
    /// Period row and the Metric/Value header
    pub const BOLD_RANGES: [&'static str; 2] = ["A1:B1", "A3:B3"];
    /// Columns sized to fit after writing
    pub const AUTOFIT_RANGE: &'static str = "A:B";

    pub const CURRENCY_FORMAT: &'static str = "$#,##0.00";
    pub const PERCENT_FORMAT: &'static str = "0.00%";

    /// Lay out `result` for the sheet named with `prefix`
    pub fn new(prefix: &str, result: &GrossMargin) -> Self {
        let row = |label: &str, value: CellValue| vec![CellValue::from(label), value];
        let values = vec![
            row("Period", result.period.as_str().into()),
            row("", "".into()),
            row("Metric", "Value".into()),
            row("Revenue", result.revenue.into()),
            row("COGS", result.cogs.into()),
            row("Gross Profit", result.gross_profit.into()),
            row("Gross Profit Margin", result.margin.into()),
        ];

        Self {
            sheet_name: output_sheet_name(prefix, &result.period),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compute, LedgerRow};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_block_layout() {
        let period = Period::parse("Q1").unwrap();
        let result = compute(
            &period,
            vec![
                LedgerRow::new("Revenue", "Q1", 1000.0),
                LedgerRow::new("COGS", "Q1", 600.0),
            ],
        )
        .unwrap();

        let block = SummaryBlock::new("GPM_", &result);

        assert_eq!(block.sheet_name, "GPM_Q1");
        assert_eq!(
            block.values,
            vec![
                vec!["Period".into(), "Q1".into()],
                vec!["".into(), "".into()],
                vec!["Metric".into(), "Value".into()],
                vec!["Revenue".into(), 1000.0.into()],
                vec!["COGS".into(), 600.0.into()],
                vec!["Gross Profit".into(), 400.0.into()],
                vec!["Gross Profit Margin".into(), 0.4.into()],
            ]
        );
    }

    #[test]
    fn test_sheet_name_uses_trimmed_period() {
        let period = Period::parse("  FY2024 ").unwrap();
        assert_eq!(output_sheet_name("GPM_", &period), "GPM_FY2024");
    }
}
