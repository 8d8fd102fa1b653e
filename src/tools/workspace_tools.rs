// =============================================================================
// WORKSPACE TOOL HANDLER
// =============================================================================
//
// Maps named tool calls with JSON arguments onto the Drive, Docs and Sheets
// services. Two failure channels:
//
// - `Err(String)`: the call itself is malformed (unknown tool, bad arguments).
// - `Ok({"success": false, "error": ...})`: the operation ran and failed.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use super::tool_args::{
    document_id_arg, normalize_args, optional_str, optional_u32, required_str, required_text,
    string_list, value_rows, ToolArgs,
};
use super::tool_catalog::tool_definitions;
use crate::core::docs::DocsService;
use crate::core::drive::drive_models::{
    DOCUMENT_MIME_TYPE, FOLDER_MIME_TYPE, SPREADSHEET_MIME_TYPE,
};
use crate::core::drive::{DriveService, FileMetadata, FileMetadataPatch, ListFilesQuery};
use crate::core::errors::WorkspaceError;
use crate::core::sheets::{DateTimeRenderOption, SheetsService, ValueRenderOption};
use crate::core::workspace_api::{WorkspaceApi, WorkspaceEndpoints};

/// Something that executes named tool calls.
#[async_trait]
pub trait ToolCallHandler: Send + Sync {
    async fn handle_tool_call(&self, name: &str, args: &Value) -> Result<Value, String>;

    fn supported_tools(&self) -> Vec<String>;
}

pub struct WorkspaceToolHandler<C: WorkspaceApi + Clone> {
    drive: DriveService<C>,
    docs: DocsService<C>,
    sheets: SheetsService<C>,
}

impl<C: WorkspaceApi + Clone> WorkspaceToolHandler<C> {
    pub fn new(api: C, endpoints: &WorkspaceEndpoints) -> Self {
        Self {
            drive: DriveService::new(api.clone(), endpoints.drive.clone()),
            docs: DocsService::new(api.clone(), endpoints.docs.clone()),
            sheets: SheetsService::new(api, endpoints.sheets.clone()),
        }
    }

    async fn dispatch(&self, name: &str, args: &ToolArgs) -> Result<ToolOutcome, String> {
        let outcome = match name {
            "drive_list_files" => {
                let query = ListFilesQuery {
                    page_size: optional_u32(args, "page_size")?,
                    page_token: optional_str(args, "page_token")?.map(String::from),
                    q: optional_str(args, "query")?.map(String::from),
                    order_by: optional_str(args, "order_by")?.map(String::from),
                    fields: optional_str(args, "fields")?.map(String::from),
                };
                ToolOutcome::from(self.drive.list_files(&query).await.and_then(|list| {
                    Ok(json!({
                        "files": serde_json::to_value(&list.files)?,
                        "next_page_token": list.next_page_token,
                    }))
                }))
            }

            "drive_get_file" => {
                let file_id = required_str(args, "file_id")?;
                let fields = optional_str(args, "fields")?;
                ToolOutcome::from(
                    self.drive
                        .get_file(file_id, fields)
                        .await
                        .map(|file| json!({ "file": file })),
                )
            }

            "drive_create_file" => {
                let metadata = FileMetadata {
                    name: required_str(args, "name")?.to_string(),
                    mime_type: resolve_mime_type(required_str(args, "mime_type")?),
                    parents: string_list(args, "parents")?,
                    description: optional_str(args, "description")?.map(String::from),
                };
                ToolOutcome::from(
                    self.drive
                        .create_file(&metadata)
                        .await
                        .map(|file| json!({ "file": file })),
                )
            }

            "drive_update_file" => {
                let file_id = required_str(args, "file_id")?;
                let patch = FileMetadataPatch {
                    name: optional_str(args, "name")?.map(String::from),
                    description: optional_str(args, "description")?.map(String::from),
                    add_parents: string_list(args, "add_parents")?,
                    remove_parents: string_list(args, "remove_parents")?,
                };
                if patch.is_empty() {
                    return Err("Nothing to update: pass name, description, add_parents or remove_parents".to_string());
                }
                ToolOutcome::from(
                    self.drive
                        .update_file(file_id, &patch)
                        .await
                        .map(|file| json!({ "file": file })),
                )
            }

            "drive_delete_file" => {
                let file_id = required_str(args, "file_id")?;
                ToolOutcome::from(
                    self.drive
                        .delete_file(file_id)
                        .await
                        .map(|()| json!({ "deleted": file_id })),
                )
            }

            "docs_create" => {
                let title = required_str(args, "title")?;
                ToolOutcome::from(self.docs.create_document(title).await.map(|doc| {
                    json!({
                        "document_id": doc.get("documentId").cloned().unwrap_or(Value::Null),
                        "title": doc.get("title").cloned().unwrap_or(Value::Null),
                    })
                }))
            }

            "docs_read" => {
                let document_id = document_id_arg(args, "document_id")?;
                ToolOutcome::from(self.docs.read_text(document_id).await.map(|doc| {
                    json!({
                        "document_id": doc.document_id,
                        "title": doc.title,
                        "content": doc.text,
                    })
                }))
            }

            "docs_replace_body" => {
                let document_id = document_id_arg(args, "document_id")?;
                let text = required_text(args, "text")?;
                ToolOutcome::from(
                    self.docs
                        .replace_body(document_id, text)
                        .await
                        .map(|response| json!({ "document_id": document_id, "response": response })),
                )
            }

            "docs_append_text" => {
                let document_id = document_id_arg(args, "document_id")?;
                let text = required_str(args, "text")?;
                ToolOutcome::from(
                    self.docs
                        .append_text(document_id, text)
                        .await
                        .map(|response| json!({ "document_id": document_id, "response": response })),
                )
            }

            "sheets_read_values" => {
                let spreadsheet_id = required_str(args, "spreadsheet_id")?;
                let range = required_str(args, "range")?;
                let value_render = match optional_str(args, "value_render_option")? {
                    Some(raw) => ValueRenderOption::parse(raw)
                        .ok_or_else(|| format!("Unknown value_render_option '{}'", raw))?,
                    None => ValueRenderOption::default(),
                };
                let date_render = match optional_str(args, "date_time_render_option")? {
                    Some(raw) => DateTimeRenderOption::parse(raw)
                        .ok_or_else(|| format!("Unknown date_time_render_option '{}'", raw))?,
                    None => DateTimeRenderOption::default(),
                };
                ToolOutcome::from(
                    self.sheets
                        .read_values(spreadsheet_id, range, value_render, date_render)
                        .await
                        .map(|values| {
                            json!({
                                "range": values.get("range").cloned().unwrap_or(Value::Null),
                                "values": values.get("values").cloned().unwrap_or_else(|| json!([])),
                            })
                        }),
                )
            }

            "sheets_write_cell" => {
                let spreadsheet_id = required_str(args, "spreadsheet_id")?;
                let address = required_str(args, "address")?;
                let text = required_text(args, "text")?;
                ToolOutcome::from(
                    self.sheets
                        .write_cell(spreadsheet_id, text, address)
                        .await
                        .map(|write| {
                            json!({
                                "updated_cell": write.target.a1,
                                "sheet_id": write.target.sheet_id,
                                "sheet_title": write.target.sheet_title,
                                "response": write.response,
                            })
                        }),
                )
            }

            "sheets_write_values" => {
                let spreadsheet_id = required_str(args, "spreadsheet_id")?;
                let range = required_str(args, "range")?;
                let rows = value_rows(args, "values")?;
                ToolOutcome::from(
                    self.sheets
                        .write_values(spreadsheet_id, range, rows)
                        .await
                        .map(|response| json!({ "response": response })),
                )
            }

            "sheets_append_values" => {
                let spreadsheet_id = required_str(args, "spreadsheet_id")?;
                let range = required_str(args, "range")?;
                let rows = value_rows(args, "values")?;
                ToolOutcome::from(
                    self.sheets
                        .append_values(spreadsheet_id, range, rows)
                        .await
                        .map(|response| json!({ "response": response })),
                )
            }

            "sheets_clear_values" => {
                let spreadsheet_id = required_str(args, "spreadsheet_id")?;
                let range = required_str(args, "range")?;
                ToolOutcome::from(
                    self.sheets
                        .clear_values(spreadsheet_id, range)
                        .await
                        .map(|response| json!({ "response": response })),
                )
            }

            _ => return Err(format!("Unknown tool: {}", name)),
        };

        Ok(outcome)
    }
}

#[async_trait]
impl<C: WorkspaceApi + Clone> ToolCallHandler for WorkspaceToolHandler<C> {
    async fn handle_tool_call(&self, name: &str, args: &Value) -> Result<Value, String> {
        let args = normalize_args(args)?;
        let outcome = self.dispatch(name, &args).await?;
        if let ToolOutcome::Failed(err) = &outcome {
            tracing::warn!("Tool {} failed: {}", name, err);
        }
        Ok(outcome.into_json())
    }

    fn supported_tools(&self) -> Vec<String> {
        tool_definitions()
            .into_iter()
            .map(|def| def.name.to_string())
            .collect()
    }
}

/// Result of running an operation, before formatting.
enum ToolOutcome {
    Done(Value),
    Failed(WorkspaceError),
}

impl From<Result<Value, WorkspaceError>> for ToolOutcome {
    fn from(result: Result<Value, WorkspaceError>) -> Self {
        match result {
            Ok(value) => ToolOutcome::Done(value),
            Err(err) => ToolOutcome::Failed(err),
        }
    }
}

impl ToolOutcome {
    /// `{"success": true, ...payload}` or `{"success": false, "error": msg}`.
    fn into_json(self) -> Value {
        match self {
            ToolOutcome::Done(payload) => {
                let mut out = Map::new();
                out.insert("success".to_string(), Value::Bool(true));
                match payload {
                    Value::Object(fields) => out.extend(fields),
                    other => {
                        out.insert("result".to_string(), other);
                    }
                }
                Value::Object(out)
            }
            ToolOutcome::Failed(err) => json!({
                "success": false,
                "error": err.to_string(),
            }),
        }
    }
}

/// Short aliases for the Google-native types; anything else passes through.
fn resolve_mime_type(raw: &str) -> String {
    match raw.trim().to_ascii_lowercase().as_str() {
        "document" | "doc" => DOCUMENT_MIME_TYPE.to_string(),
        "spreadsheet" | "sheet" => SPREADSHEET_MIME_TYPE.to_string(),
        "folder" => FOLDER_MIME_TYPE.to_string(),
        _ => raw.trim().to_string(),
    }
}
