use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
pub const DOCUMENT_MIME_TYPE: &str = "application/vnd.google-apps.document";
pub const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

pub const DEFAULT_LIST_FIELDS: &str =
    "nextPageToken, files(id, name, mimeType, modifiedTime, size, parents)";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Filters and paging for `files.list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilesQuery {
    pub page_size: Option<u32>,
    pub page_token: Option<String>,
    /// Drive search syntax, e.g. `name contains 'report' and trashed = false`.
    pub q: Option<String>,
    pub order_by: Option<String>,
    pub fields: Option<String>,
}

impl ListFilesQuery {
    /// Query-string pairs with defaults applied and the page size clamped.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let mut query = vec![
            ("pageSize".to_string(), page_size.to_string()),
            (
                "fields".to_string(),
                self.fields
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LIST_FIELDS.to_string()),
            ),
        ];
        if let Some(token) = &self.page_token {
            query.push(("pageToken".to_string(), token.clone()));
        }
        if let Some(q) = &self.q {
            query.push(("q".to_string(), q.clone()));
        }
        if let Some(order_by) = &self.order_by {
            query.push(("orderBy".to_string(), order_by.clone()));
        }
        query
    }
}

/// A file as listed by Drive. Fields outside the common set are kept in `extra`
/// so custom field masks lose nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: Option<String>,
    pub name: Option<String>,
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<DateTime<Utc>>,
    /// Drive reports sizes as decimal strings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Metadata for `files.create`. Creating with a Google MIME type makes an
/// empty Doc, Sheet or folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub name: String,
    pub mime_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Changes for `files.update`. Parent moves travel as query parameters,
/// everything else in the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMetadataPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub add_parents: Vec<String>,
    pub remove_parents: Vec<String>,
}

impl FileMetadataPatch {
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        if let Some(name) = &self.name {
            body.insert("name".to_string(), Value::String(name.clone()));
        }
        if let Some(description) = &self.description {
            body.insert(
                "description".to_string(),
                Value::String(description.clone()),
            );
        }
        Value::Object(body)
    }

    pub fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if !self.add_parents.is_empty() {
            query.push(("addParents".to_string(), self.add_parents.join(",")));
        }
        if !self.remove_parents.is_empty() {
            query.push(("removeParents".to_string(), self.remove_parents.join(",")));
        }
        query
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.add_parents.is_empty()
            && self.remove_parents.is_empty()
    }
}
