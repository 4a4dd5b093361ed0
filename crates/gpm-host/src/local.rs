//! An in-process host backed by a gpm-core workbook.

use gpm_core::{CellRange, NumberFormat, Workbook, Worksheet};
use gpm_protocol::{
    error_codes, CellError, CellValue, DebugInfo, HostError, HostInfo, HostKind, Operation,
    OperationResult,
};

use crate::error::Result;
use crate::transport::Transport;

/// Executes batches directly against an in-memory [`Workbook`].
///
/// Behaves like a spreadsheet host: sheet and table names are
/// case-insensitive, a batch stops at its first failing operation (earlier
/// operations stay applied), and a batch that deletes and re-creates the same
/// sheet name is rejected as a whole.
#[derive(Debug)]
pub struct LocalHost {
    workbook: Workbook,
    info: HostInfo,
}

impl LocalHost {
    pub fn new(workbook: Workbook) -> Self {
        Self {
            workbook,
            info: HostInfo {
                host: HostKind::Excel,
                platform: "local".to_string(),
            },
        }
    }

    /// Report a different identity from `hello`.
    pub fn with_info(mut self, info: HostInfo) -> Self {
        self.info = info;
        self
    }

    pub fn info(&self) -> &HostInfo {
        &self.info
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn into_workbook(self) -> Workbook {
        self.workbook
    }

    /// Apply one batch, in order.
    pub fn execute(
        &mut self,
        operations: &[Operation],
    ) -> std::result::Result<Vec<OperationResult>, HostError> {
        check_name_reuse(operations)?;

        let mut results = Vec::with_capacity(operations.len());
        for (index, operation) in operations.iter().enumerate() {
            match self.apply(operation) {
                Ok(result) => results.push(result),
                Err(e) => {
                    let error = host_error(&e).with_debug_info(DebugInfo {
                        error_location: location(operation),
                        statement: operation.name().to_string(),
                        operation_index: index,
                    });
                    tracing::warn!(
                        "{} failed at operation {index}: {}",
                        operation.name(),
                        error.message
                    );
                    return Err(error);
                }
            }
        }

        tracing::debug!("Applied batch of {} operation(s)", operations.len());
        Ok(results)
    }

    fn apply(&mut self, operation: &Operation) -> gpm_core::Result<OperationResult> {
        let wb = &mut self.workbook;
        let result = match operation {
            Operation::GetTableDataBody { sheet, table } => {
                let body = wb.table(sheet, table)?.data_body_range();
                let ws = sheet_ref(wb, sheet)?;
                let values = body
                    .map(|range| {
                        ws.range_values(&range)
                            .into_iter()
                            .map(|row| row.iter().map(to_wire).collect())
                            .collect()
                    })
                    .unwrap_or_default();
                OperationResult::Values { values }
            }
            Operation::GetSheetOrNull { name } => OperationResult::Sheet {
                exists: wb.sheet_index(name).is_some(),
            },
            Operation::DeleteSheet { name } => {
                wb.remove_worksheet_by_name(name)?;
                OperationResult::Done
            }
            Operation::AddSheet { name } => {
                wb.add_worksheet_with_name(name)?;
                OperationResult::Done
            }
            Operation::SetValues {
                sheet,
                range,
                values,
            } => {
                let range = CellRange::parse(range)?;
                let values: Vec<Vec<gpm_core::CellValue>> = values
                    .iter()
                    .map(|row| row.iter().map(from_wire).collect())
                    .collect();
                sheet_mut(wb, sheet)?.set_range_values(&range, &values)?;
                OperationResult::Done
            }
            Operation::SetNumberFormat {
                sheet,
                range,
                format,
            } => {
                let range = CellRange::parse(range)?;
                let format = NumberFormat::from_string(format.as_str());
                sheet_mut(wb, sheet)?.set_range_number_format(&range, &format);
                OperationResult::Done
            }
            Operation::SetBold { sheet, range, bold } => {
                let range = CellRange::parse(range)?;
                sheet_mut(wb, sheet)?.set_range_bold(&range, *bold);
                OperationResult::Done
            }
            Operation::AutofitColumns { sheet, range } => {
                let range = CellRange::parse(range)?;
                sheet_mut(wb, sheet)?.autofit_columns(&range);
                OperationResult::Done
            }
            Operation::ActivateSheet { name } => {
                let index = wb
                    .sheet_index(name)
                    .ok_or_else(|| gpm_core::Error::SheetNotFound(name.clone()))?;
                wb.set_active_sheet(index)?;
                OperationResult::Done
            }
        };
        Ok(result)
    }
}

impl Transport for LocalHost {
    async fn hello(&mut self) -> Result<HostInfo> {
        Ok(self.info.clone())
    }

    async fn sync(&mut self, operations: Vec<Operation>) -> Result<Vec<OperationResult>> {
        Ok(self.execute(&operations)?)
    }
}

/// Reject batches that delete and add the same sheet name.
fn check_name_reuse(operations: &[Operation]) -> std::result::Result<(), HostError> {
    for (index, operation) in operations.iter().enumerate() {
        let Operation::AddSheet { name } = operation else {
            continue;
        };
        let lower = name.to_lowercase();
        let deleted = operations.iter().any(
            |op| matches!(op, Operation::DeleteSheet { name: n } if n.to_lowercase() == lower),
        );
        if deleted {
            return Err(HostError::new(
                error_codes::INVALID_OPERATION,
                format!("Sheet '{name}' is deleted and added in the same batch"),
            )
            .with_debug_info(DebugInfo {
                error_location: format!("Worksheet '{name}'"),
                statement: operation.name().to_string(),
                operation_index: index,
            }));
        }
    }
    Ok(())
}

fn sheet_ref<'a>(wb: &'a Workbook, name: &str) -> gpm_core::Result<&'a Worksheet> {
    wb.worksheet_by_name(name)
        .ok_or_else(|| gpm_core::Error::SheetNotFound(name.to_string()))
}

fn sheet_mut<'a>(wb: &'a mut Workbook, name: &str) -> gpm_core::Result<&'a mut Worksheet> {
    wb.worksheet_by_name_mut(name)
        .ok_or_else(|| gpm_core::Error::SheetNotFound(name.to_string()))
}

fn location(operation: &Operation) -> String {
    match operation {
        Operation::GetTableDataBody { sheet, table } => format!("{sheet}!{table}"),
        Operation::GetSheetOrNull { name }
        | Operation::DeleteSheet { name }
        | Operation::AddSheet { name }
        | Operation::ActivateSheet { name } => format!("Worksheet '{name}'"),
        Operation::SetValues { sheet, range, .. }
        | Operation::SetNumberFormat { sheet, range, .. }
        | Operation::SetBold { sheet, range, .. }
        | Operation::AutofitColumns { sheet, range } => format!("{sheet}!{range}"),
    }
}

fn host_error(e: &gpm_core::Error) -> HostError {
    use gpm_core::Error as E;

    let code = match e {
        E::SheetNotFound(_) | E::TableNotFound { .. } => error_codes::ITEM_NOT_FOUND,
        E::DuplicateSheetName(_) | E::DuplicateTableName(_) => error_codes::ITEM_ALREADY_EXISTS,
        E::LastSheet => error_codes::INVALID_OPERATION,
        E::InvalidAddress(_)
        | E::InvalidRange(_)
        | E::InvalidSheetName(_)
        | E::InvalidTableName(_)
        | E::ShapeMismatch { .. }
        | E::RowOutOfBounds(..)
        | E::ColumnOutOfBounds(..)
        | E::SheetOutOfBounds(..) => error_codes::INVALID_ARGUMENT,
        _ => error_codes::GENERAL_EXCEPTION,
    };
    HostError::new(code, e.to_string())
}

fn to_wire(value: &gpm_core::CellValue) -> CellValue {
    match value {
        gpm_core::CellValue::Empty => CellValue::Null,
        gpm_core::CellValue::Boolean(b) => CellValue::Bool(*b),
        gpm_core::CellValue::Number(n) => CellValue::Number(*n),
        gpm_core::CellValue::String(s) => CellValue::String(s.clone()),
        gpm_core::CellValue::Error(e) => CellValue::Error(CellError {
            code: e.as_str().to_string(),
        }),
    }
}

fn from_wire(value: &CellValue) -> gpm_core::CellValue {
    match value {
        CellValue::Null => gpm_core::CellValue::Empty,
        CellValue::Bool(b) => gpm_core::CellValue::Boolean(*b),
        CellValue::Number(n) => gpm_core::CellValue::Number(*n),
        CellValue::String(s) if s.is_empty() => gpm_core::CellValue::Empty,
        CellValue::String(s) => gpm_core::CellValue::String(s.clone()),
        CellValue::Error(e) => gpm_core::CellError::parse(&e.code)
            .map(gpm_core::CellValue::Error)
            .unwrap_or_else(|| gpm_core::CellValue::String(e.code.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn data_workbook() -> Workbook {
        let mut wb = Workbook::new();
        wb.add_worksheet_with_name("DataSheet").unwrap();
        let ws = wb.worksheet_by_name_mut("DataSheet").unwrap();
        ws.set_cell_value("A1", "Account").unwrap();
        ws.set_cell_value("B1", "Period").unwrap();
        ws.set_cell_value("C1", "Amount").unwrap();
        ws.set_cell_value("A2", "Revenue").unwrap();
        ws.set_cell_value("B2", "Q1").unwrap();
        ws.set_cell_value("C2", 1000.0).unwrap();
        ws.set_cell_value("A3", "COGS").unwrap();
        ws.set_cell_value("B3", "Q1").unwrap();
        wb.add_table("DataSheet", "InputData", CellRange::parse("A1:C3").unwrap())
            .unwrap();
        wb
    }

    #[test]
    fn test_reads_data_body_without_header() {
        let mut host = LocalHost::new(data_workbook());
        let results = host
            .execute(&[Operation::GetTableDataBody {
                sheet: "DataSheet".into(),
                table: "InputData".into(),
            }])
            .unwrap();

        assert_eq!(
            results,
            vec![OperationResult::Values {
                values: vec![
                    vec!["Revenue".into(), "Q1".into(), 1000.0.into()],
                    vec!["COGS".into(), "Q1".into(), CellValue::Null],
                ]
            }]
        );
    }

    #[test]
    fn test_missing_table_reports_debug_info() {
        let mut host = LocalHost::new(data_workbook());
        let err = host
            .execute(&[
                Operation::GetSheetOrNull {
                    name: "DataSheet".into(),
                },
                Operation::GetTableDataBody {
                    sheet: "DataSheet".into(),
                    table: "Missing".into(),
                },
            ])
            .unwrap_err();

        assert_eq!(err.code, error_codes::ITEM_NOT_FOUND);
        let debug = err.debug_info.unwrap();
        assert_eq!(debug.error_location, "DataSheet!Missing");
        assert_eq!(debug.statement, "GetTableDataBody");
        assert_eq!(debug.operation_index, 1);
    }

    #[test]
    fn test_batch_stops_at_first_failure() {
        let mut host = LocalHost::new(Workbook::new());
        let err = host
            .execute(&[
                Operation::AddSheet {
                    name: "Out".into(),
                },
                Operation::SetValues {
                    sheet: "Out".into(),
                    range: "A1:B1".into(),
                    values: vec![vec!["only one".into()]],
                },
                Operation::AddSheet {
                    name: "Never".into(),
                },
            ])
            .unwrap_err();

        assert_eq!(err.code, error_codes::INVALID_ARGUMENT);
        assert!(host.workbook().worksheet_by_name("Out").is_some());
        assert!(host.workbook().worksheet_by_name("Never").is_none());
    }

    #[test]
    fn test_delete_and_add_in_one_batch_is_rejected() {
        let mut wb = Workbook::new();
        wb.add_worksheet_with_name("GPM_Q1").unwrap();
        let mut host = LocalHost::new(wb);

        let err = host
            .execute(&[
                Operation::DeleteSheet {
                    name: "GPM_Q1".into(),
                },
                Operation::AddSheet {
                    name: "GPM_Q1".into(),
                },
            ])
            .unwrap_err();

        assert_eq!(err.code, error_codes::INVALID_OPERATION);
        // Nothing was applied
        assert_eq!(host.workbook().sheet_count(), 2);
    }

    #[test]
    fn test_writes_formats_and_activates() {
        let mut host = LocalHost::new(Workbook::new());
        host.execute(&[
            Operation::AddSheet {
                name: "Out".into(),
            },
            Operation::SetValues {
                sheet: "Out".into(),
                range: "A1:B1".into(),
                values: vec![vec!["Revenue".into(), 1000.0.into()]],
            },
            Operation::SetNumberFormat {
                sheet: "Out".into(),
                range: "B1".into(),
                format: "$#,##0.00".into(),
            },
            Operation::SetBold {
                sheet: "Out".into(),
                range: "A1".into(),
                bold: true,
            },
            Operation::AutofitColumns {
                sheet: "Out".into(),
                range: "A:B".into(),
            },
            Operation::ActivateSheet {
                name: "out".into(),
            },
        ])
        .unwrap();

        let wb = host.workbook();
        let ws = wb.active_worksheet().unwrap();
        assert_eq!(ws.name(), "Out");
        assert_eq!(ws.display_text_at(0, 1), "$1,000.00");
        assert!(ws.is_bold_at(0, 0));
        assert_eq!(ws.column_width(1), 9.71);
    }

    #[test]
    fn test_empty_strings_clear_cells() {
        let mut host = LocalHost::new(Workbook::new());
        host.execute(&[Operation::SetValues {
            sheet: "Sheet1".into(),
            range: "A1:B1".into(),
            values: vec![vec!["".into(), "x".into()]],
        }])
        .unwrap();

        let ws = host.workbook().worksheet(0).unwrap();
        assert!(ws.cell_at(0, 0).is_none());
        assert_eq!(ws.used_range().unwrap().to_string(), "B1");
    }
}
