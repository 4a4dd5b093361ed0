//! CSV options

/// Options for importing a ledger CSV
#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Sheet that receives the data (default: `DataSheet`)
    pub sheet_name: String,
    /// Table spanning the header and data rows (default: `InputData`)
    pub table_name: String,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            sheet_name: "DataSheet".to_string(),
            table_name: "InputData".to_string(),
        }
    }
}
