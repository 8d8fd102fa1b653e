use serde_json::{json, Value};

use super::a1_notation::resolve_cell_target;
use super::sheets_models::{
    BatchUpdateSpreadsheetRequest, CellTarget, DateTimeRenderOption, SheetsRequest, Spreadsheet,
    ValueRange, ValueRenderOption,
};
use crate::core::errors::WorkspaceError;
use crate::core::workspace_api::{
    expect_payload, path_segment, query_pairs, ApiMethod, WorkspaceApi,
};

/// Result of a single-cell write: where it landed plus the raw batch response.
#[derive(Debug, Clone)]
pub struct CellWrite {
    pub target: CellTarget,
    pub response: Value,
}

/// Spreadsheet reads and writes on top of any `WorkspaceApi`.
pub struct SheetsService<C: WorkspaceApi> {
    api: C,
    base_url: String,
}

impl<C: WorkspaceApi> SheetsService<C> {
    pub fn new(api: C, base_url: impl Into<String>) -> Self {
        Self {
            api,
            base_url: base_url.into(),
        }
    }

    /// Fetches the spreadsheet's sheet list (titles and ids only).
    pub async fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<Value, WorkspaceError> {
        let response = self
            .api
            .request(
                &self.base_url,
                &format!("/spreadsheets/{}", path_segment(spreadsheet_id)),
                ApiMethod::Get,
                &query_pairs(&[("fields", "spreadsheetId,properties.title,sheets.properties")]),
                None,
            )
            .await?;
        expect_payload(response, "spreadsheets.get")
    }

    /// Reads a range with the requested rendering of values and dates.
    pub async fn read_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        value_render: ValueRenderOption,
        date_render: DateTimeRenderOption,
    ) -> Result<Value, WorkspaceError> {
        let response = self
            .api
            .request(
                &self.base_url,
                &format!(
                    "/spreadsheets/{}/values/{}",
                    path_segment(spreadsheet_id),
                    path_segment(range)
                ),
                ApiMethod::Get,
                &query_pairs(&[
                    ("valueRenderOption", value_render.as_str()),
                    ("dateTimeRenderOption", date_render.as_str()),
                ]),
                None,
            )
            .await?;
        expect_payload(response, "values.get")
    }

    /// Writes `text` as a literal string into one cell.
    ///
    /// The address is resolved against a fresh copy of the sheet list, so a
    /// sheet renamed since the last call is still found by its new title.
    pub async fn write_cell(
        &self,
        spreadsheet_id: &str,
        text: &str,
        address: &str,
    ) -> Result<CellWrite, WorkspaceError> {
        let structure: Spreadsheet =
            serde_json::from_value(self.get_spreadsheet(spreadsheet_id).await?)?;
        let target = resolve_cell_target(&structure, address)?;

        tracing::info!(
            "Writing cell {} (sheet id {}) in spreadsheet {}",
            target.a1,
            target.sheet_id,
            spreadsheet_id
        );

        let batch = BatchUpdateSpreadsheetRequest {
            requests: vec![SheetsRequest::write_string(&target, text)],
        };
        let body = serde_json::to_value(&batch)?;

        let response = self
            .api
            .request(
                &self.base_url,
                &format!("/spreadsheets/{}:batchUpdate", path_segment(spreadsheet_id)),
                ApiMethod::Post,
                &[],
                Some(&body),
            )
            .await?;

        Ok(CellWrite {
            target,
            response: expect_payload(response, "spreadsheets.batchUpdate")?,
        })
    }

    /// Writes a matrix of values as if typed by a user, so numbers, dates and
    /// formulas are interpreted. The API grows the range to fit the matrix.
    pub async fn write_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<Value>>,
    ) -> Result<Value, WorkspaceError> {
        tracing::info!(
            "Updating {} row(s) at {} in spreadsheet {}",
            rows.len(),
            range,
            spreadsheet_id
        );
        let body = serde_json::to_value(ValueRange::rows(range, rows))?;

        let response = self
            .api
            .request(
                &self.base_url,
                &format!(
                    "/spreadsheets/{}/values/{}",
                    path_segment(spreadsheet_id),
                    path_segment(range)
                ),
                ApiMethod::Put,
                &query_pairs(&[("valueInputOption", "USER_ENTERED")]),
                Some(&body),
            )
            .await?;
        expect_payload(response, "values.update")
    }

    /// Appends rows after the last row of the table found in `range`.
    pub async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<Value>>,
    ) -> Result<Value, WorkspaceError> {
        tracing::info!(
            "Appending {} row(s) to {} in spreadsheet {}",
            rows.len(),
            range,
            spreadsheet_id
        );
        let body = serde_json::to_value(ValueRange::rows(range, rows))?;

        let response = self
            .api
            .request(
                &self.base_url,
                &format!(
                    "/spreadsheets/{}/values/{}:append",
                    path_segment(spreadsheet_id),
                    path_segment(range)
                ),
                ApiMethod::Post,
                &query_pairs(&[
                    ("valueInputOption", "USER_ENTERED"),
                    ("insertDataOption", "INSERT_ROWS"),
                ]),
                Some(&body),
            )
            .await?;
        expect_payload(response, "values.append")
    }

    /// Clears values (not formatting) in a range.
    pub async fn clear_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Value, WorkspaceError> {
        let response = self
            .api
            .request(
                &self.base_url,
                &format!(
                    "/spreadsheets/{}/values/{}:clear",
                    path_segment(spreadsheet_id),
                    path_segment(range)
                ),
                ApiMethod::Post,
                &[],
                Some(&json!({})),
            )
            .await?;
        expect_payload(response, "values.clear")
    }
}
