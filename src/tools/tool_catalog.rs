// Self-description of every tool, printed by `--list-tools`.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ParamDef {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub param_type: &'static str,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ParamDef>,
}

const fn required(
    name: &'static str,
    param_type: &'static str,
    description: &'static str,
) -> ParamDef {
    ParamDef {
        name,
        param_type,
        description,
        required: true,
    }
}

const fn optional(
    name: &'static str,
    param_type: &'static str,
    description: &'static str,
) -> ParamDef {
    ParamDef {
        name,
        param_type,
        description,
        required: false,
    }
}

pub fn tool_definitions() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "drive_list_files",
            description: "Lists Drive files, optionally filtered with Drive search syntax.",
            parameters: vec![
                optional("page_size", "integer", "Files per page (1-1000, default 100)."),
                optional("page_token", "string", "Token from a previous page."),
                optional("query", "string", "Drive search query, e.g. \"trashed = false\"."),
                optional("order_by", "string", "Sort order, e.g. \"modifiedTime desc\"."),
                optional("fields", "string", "Field mask for the response."),
            ],
        },
        ToolDef {
            name: "drive_get_file",
            description: "Gets one file's metadata.",
            parameters: vec![
                required("file_id", "string", "The Drive file ID."),
                optional("fields", "string", "Field mask for the response."),
            ],
        },
        ToolDef {
            name: "drive_create_file",
            description: "Creates an empty Doc, Sheet, folder or other file by MIME type.",
            parameters: vec![
                required("name", "string", "File name."),
                required(
                    "mime_type",
                    "string",
                    "Full MIME type, or one of: document, spreadsheet, folder.",
                ),
                optional("parents", "array", "Parent folder IDs."),
                optional("description", "string", "File description."),
            ],
        },
        ToolDef {
            name: "drive_update_file",
            description: "Renames, re-describes or moves a file.",
            parameters: vec![
                required("file_id", "string", "The Drive file ID."),
                optional("name", "string", "New name."),
                optional("description", "string", "New description."),
                optional("add_parents", "array", "Folder IDs to add."),
                optional("remove_parents", "array", "Folder IDs to remove."),
            ],
        },
        ToolDef {
            name: "drive_delete_file",
            description: "Permanently deletes a file (skips the trash).",
            parameters: vec![required("file_id", "string", "The Drive file ID.")],
        },
        ToolDef {
            name: "docs_create",
            description: "Creates an empty Google Doc.",
            parameters: vec![required("title", "string", "Document title.")],
        },
        ToolDef {
            name: "docs_read",
            description: "Reads a Google Doc's body as plain text.",
            parameters: vec![required("document_id", "string", "The document ID or its Google Docs URL.")],
        },
        ToolDef {
            name: "docs_replace_body",
            description: "Replaces the entire body of a Google Doc with new text.",
            parameters: vec![
                required("document_id", "string", "The document ID or its Google Docs URL."),
                required("text", "string", "The new body text."),
            ],
        },
        ToolDef {
            name: "docs_append_text",
            description: "Appends text to the end of a Google Doc.",
            parameters: vec![
                required("document_id", "string", "The document ID or its Google Docs URL."),
                required("text", "string", "Text to append."),
            ],
        },
        ToolDef {
            name: "sheets_read_values",
            description: "Reads cell values from a range in A1 notation.",
            parameters: vec![
                required("spreadsheet_id", "string", "The spreadsheet ID."),
                required("range", "string", "A1 range, e.g. \"Sheet1!A1:C10\"."),
                optional(
                    "value_render_option",
                    "string",
                    "FORMATTED_VALUE (default), UNFORMATTED_VALUE or FORMULA.",
                ),
                optional(
                    "date_time_render_option",
                    "string",
                    "FORMATTED_STRING (default) or SERIAL_NUMBER.",
                ),
            ],
        },
        ToolDef {
            name: "sheets_write_cell",
            description: "Writes text as a literal string into a single cell.",
            parameters: vec![
                required("spreadsheet_id", "string", "The spreadsheet ID."),
                required("address", "string", "Single cell, e.g. \"B2\" or \"'My Sheet'!C3\"."),
                required("text", "string", "The text to write."),
            ],
        },
        ToolDef {
            name: "sheets_write_values",
            description: "Writes rows of values to a range, interpreted as if typed by a user.",
            parameters: vec![
                required("spreadsheet_id", "string", "The spreadsheet ID."),
                required("range", "string", "Top-left cell or A1 range."),
                required("values", "array", "Array of rows, each an array of scalars."),
            ],
        },
        ToolDef {
            name: "sheets_append_values",
            description: "Appends rows after the last row of the table in a range.",
            parameters: vec![
                required("spreadsheet_id", "string", "The spreadsheet ID."),
                required("range", "string", "A1 range locating the table."),
                required("values", "array", "Array of rows, each an array of scalars."),
            ],
        },
        ToolDef {
            name: "sheets_clear_values",
            description: "Clears the values in a range, keeping formatting.",
            parameters: vec![
                required("spreadsheet_id", "string", "The spreadsheet ID."),
                required("range", "string", "A1 range to clear."),
            ],
        },
    ]
}
