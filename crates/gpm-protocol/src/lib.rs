//! Shared protocol types for communication between the add-in runtime and the
//! spreadsheet host.
//!
//! The protocol is JSON-over-stdio: one JSON object per line in each direction.
//! Document access is batched: the add-in queues [`Operation`]s and ships them
//! in a single [`Command::Sync`]; the host applies them in order and answers
//! with one [`OperationResult`] per operation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A command sent from the add-in to the host process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Monotonically increasing request ID for correlating responses.
    pub id: u64,
    /// The command to execute.
    #[serde(flatten)]
    pub command: Command,
}

/// Commands the add-in can send to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "params")]
pub enum Command {
    /// Ask the host to identify itself. Answered with [`ResponseData::Ready`].
    Hello,

    /// Apply a batch of queued operations, in order.
    Sync { operations: Vec<Operation> },

    /// Shut down the host: persist the document and exit.
    Shutdown,
}

/// One queued document operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Operation {
    /// Read the data body (header excluded) of a table.
    GetTableDataBody { sheet: String, table: String },

    /// Check whether a worksheet exists.
    GetSheetOrNull { name: String },

    /// Delete a worksheet.
    DeleteSheet { name: String },

    /// Add a worksheet at the end of the workbook.
    AddSheet { name: String },

    /// Write a block of values; the shape must match the range.
    SetValues {
        sheet: String,
        range: String,
        values: Vec<Vec<CellValue>>,
    },

    /// Apply a number format code (e.g. `$#,##0.00`) to a range.
    SetNumberFormat {
        sheet: String,
        range: String,
        format: String,
    },

    /// Set or clear bold on a range.
    SetBold {
        sheet: String,
        range: String,
        bold: bool,
    },

    /// Size the columns of a range to fit their content.
    AutofitColumns { sheet: String, range: String },

    /// Make a worksheet the active one.
    ActivateSheet { name: String },
}

impl Operation {
    /// Short name used in diagnostics (`statement` in [`DebugInfo`]).
    pub fn name(&self) -> &'static str {
        match self {
            Operation::GetTableDataBody { .. } => "GetTableDataBody",
            Operation::GetSheetOrNull { .. } => "GetSheetOrNull",
            Operation::DeleteSheet { .. } => "DeleteSheet",
            Operation::AddSheet { .. } => "AddSheet",
            Operation::SetValues { .. } => "SetValues",
            Operation::SetNumberFormat { .. } => "SetNumberFormat",
            Operation::SetBold { .. } => "SetBold",
            Operation::AutofitColumns { .. } => "AutofitColumns",
            Operation::ActivateSheet { .. } => "ActivateSheet",
        }
    }
}

/// The result of one operation of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum OperationResult {
    /// Values read from a range, row-major.
    Values { values: Vec<Vec<CellValue>> },
    /// Whether a looked-up sheet exists.
    Sheet { exists: bool },
    /// The operation has no result payload.
    Done,
}

/// A cell value that can be sent to/from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Error(CellError),
}

/// Spreadsheet error values (`#N/A`, `#VALUE!`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellError {
    pub code: String,
}

/// Which application a host is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostKind {
    Excel,
    Word,
    PowerPoint,
    Outlook,
    Other,
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostKind::Excel => "Excel",
            HostKind::Word => "Word",
            HostKind::PowerPoint => "PowerPoint",
            HostKind::Outlook => "Outlook",
            HostKind::Other => "Other",
        };
        f.write_str(name)
    }
}

/// What the host reports once it is ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    pub host: HostKind,
    pub platform: String,
}

/// A response sent from the host back to the add-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// The request ID this response corresponds to.
    pub id: u64,
    /// The result of the command.
    #[serde(flatten)]
    pub result: ResponseResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ResponseResult {
    #[serde(rename = "ok")]
    Ok {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<ResponseData>,
    },
    #[serde(rename = "error")]
    Error { error: HostError },
}

/// Data returned in successful responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    /// Answer to [`Command::Hello`].
    Ready { info: HostInfo },
    /// Answer to [`Command::Sync`], one entry per operation.
    Results { results: Vec<OperationResult> },
}

/// An error reported by the host.
///
/// `debug_info` carries the host's diagnostic payload; it is meant for logs,
/// not for end users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostError {
    /// Stable error code (see [`error_codes`]).
    pub code: String,
    /// Human-readable message.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<DebugInfo>,
}

/// Where in a batch a host error happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
    /// Object path the failing operation addressed (e.g. `DataSheet!InputData`).
    pub error_location: String,
    /// The failing operation.
    pub statement: String,
    /// Index of the failing operation within its batch.
    pub operation_index: usize,
}

impl HostError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            debug_info: None,
        }
    }

    pub fn with_debug_info(mut self, debug_info: DebugInfo) -> Self {
        self.debug_info = Some(debug_info);
        self
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl std::error::Error for HostError {}

/// Error codes a host may report.
pub mod error_codes {
    pub const ITEM_NOT_FOUND: &str = "ItemNotFound";
    pub const ITEM_ALREADY_EXISTS: &str = "ItemAlreadyExists";
    pub const INVALID_ARGUMENT: &str = "InvalidArgument";
    pub const INVALID_OPERATION: &str = "InvalidOperation";
    pub const INVALID_REQUEST: &str = "InvalidRequest";
    pub const GENERAL_EXCEPTION: &str = "GeneralException";
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, "<empty>"),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Error(e) => write!(f, "{}", e.code),
        }
    }
}
