//! Add-in configuration

use gpm_protocol::HostKind;
use serde::{Deserialize, Serialize};

/// Where the add-in reads its ledger and how it names its output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddinConfig {
    /// Worksheet holding the ledger table
    pub data_sheet: String,
    /// Table with `[account, period, amount]` columns
    pub table: String,
    /// Prepended to the period to name the output sheet
    pub output_prefix: String,
    /// The only host application the button is attached in
    pub expected_host: HostKind,
}

impl Default for AddinConfig {
    fn default() -> Self {
        Self {
            data_sheet: "DataSheet".to_string(),
            table: "InputData".to_string(),
            output_prefix: "GPM_".to_string(),
            expected_host: HostKind::Excel,
        }
    }
}
