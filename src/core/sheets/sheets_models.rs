// Wire shapes for the Sheets v4 API.
// Only the fields we read or write are modelled; serde ignores the rest.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// SPREADSHEET STRUCTURE (spreadsheets.get)
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spreadsheet {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    /// The first sheet of a new spreadsheet has id 0, and the API omits zero values.
    #[serde(default)]
    pub sheet_id: i64,
    #[serde(default)]
    pub title: String,
}

// ============================================================================
// CELL TARGET
// ============================================================================

/// A single resolved cell, as half-open zero-based ranges of width one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellTarget {
    pub sheet_id: i64,
    pub sheet_title: String,
    pub start_row_index: u32,
    pub end_row_index: u32,
    pub start_column_index: u32,
    pub end_column_index: u32,
    /// Normalized address, e.g. `'My Sheet'!C3`.
    pub a1: String,
}

impl CellTarget {
    pub fn grid_range(&self) -> GridRange {
        GridRange {
            sheet_id: self.sheet_id,
            start_row_index: self.start_row_index,
            end_row_index: self.end_row_index,
            start_column_index: self.start_column_index,
            end_column_index: self.end_column_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    pub sheet_id: i64,
    pub start_row_index: u32,
    pub end_row_index: u32,
    pub start_column_index: u32,
    pub end_column_index: u32,
}

// ============================================================================
// BATCH UPDATE REQUESTS (spreadsheets.batchUpdate)
// ============================================================================

/// One entry of a `requests` array. Serializes to `{"updateCells": {...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetsRequest {
    UpdateCells(UpdateCellsRequest),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCellsRequest {
    pub range: GridRange,
    pub rows: Vec<RowData>,
    /// Field mask limiting what the update touches.
    pub fields: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowData {
    pub values: Vec<CellData>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub user_entered_value: ExtendedValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtendedValue {
    StringValue(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchUpdateSpreadsheetRequest {
    pub requests: Vec<SheetsRequest>,
}

impl SheetsRequest {
    /// Writes `text` as a literal string into the target cell.
    pub fn write_string(target: &CellTarget, text: &str) -> Self {
        SheetsRequest::UpdateCells(UpdateCellsRequest {
            range: target.grid_range(),
            rows: vec![RowData {
                values: vec![CellData {
                    user_entered_value: ExtendedValue::StringValue(text.to_string()),
                }],
            }],
            fields: "userEnteredValue".to_string(),
        })
    }
}

// ============================================================================
// VALUES API (spreadsheets.values.*)
// ============================================================================

/// Body of `values.update` / `values.append`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    pub range: String,
    pub major_dimension: String,
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    pub fn rows(range: &str, values: Vec<Vec<Value>>) -> Self {
        Self {
            range: range.to_string(),
            major_dimension: "ROWS".to_string(),
            values,
        }
    }
}

/// How `values.get` renders cell values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueRenderOption {
    #[default]
    FormattedValue,
    UnformattedValue,
    Formula,
}

impl ValueRenderOption {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueRenderOption::FormattedValue => "FORMATTED_VALUE",
            ValueRenderOption::UnformattedValue => "UNFORMATTED_VALUE",
            ValueRenderOption::Formula => "FORMULA",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "FORMATTED_VALUE" => Some(Self::FormattedValue),
            "UNFORMATTED_VALUE" => Some(Self::UnformattedValue),
            "FORMULA" => Some(Self::Formula),
            _ => None,
        }
    }
}

/// How `values.get` renders dates when values are unformatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateTimeRenderOption {
    #[default]
    FormattedString,
    SerialNumber,
}

impl DateTimeRenderOption {
    pub fn as_str(self) -> &'static str {
        match self {
            DateTimeRenderOption::FormattedString => "FORMATTED_STRING",
            DateTimeRenderOption::SerialNumber => "SERIAL_NUMBER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "FORMATTED_STRING" => Some(Self::FormattedString),
            "SERIAL_NUMBER" => Some(Self::SerialNumber),
            _ => None,
        }
    }
}
