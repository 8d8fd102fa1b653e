use serde_json::{json, Value};

use super::body_text::{append_index, body_end_index, extract_plain_text, plan_body_replace};
use super::docs_models::{BatchUpdateDocumentRequest, Document, DocsRequest, Location};
use crate::core::errors::WorkspaceError;
use crate::core::workspace_api::{expect_payload, path_segment, ApiMethod, WorkspaceApi};

/// Plain text of a document plus its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentText {
    pub document_id: String,
    pub title: String,
    pub text: String,
}

/// Rich-text document reads and whole-body writes.
///
/// Every write is read-then-write: the current structure is fetched right
/// before the batch so indices are never stale.
pub struct DocsService<C: WorkspaceApi> {
    api: C,
    base_url: String,
}

impl<C: WorkspaceApi> DocsService<C> {
    pub fn new(api: C, base_url: impl Into<String>) -> Self {
        Self {
            api,
            base_url: base_url.into(),
        }
    }

    /// Fetches the full document structure as returned by the API.
    pub async fn get_document(&self, document_id: &str) -> Result<Value, WorkspaceError> {
        tracing::debug!("Fetching document structure: {}", document_id);
        let response = self
            .api
            .request(
                &self.base_url,
                &format!("/documents/{}", path_segment(document_id)),
                ApiMethod::Get,
                &[],
                None,
            )
            .await?;
        expect_payload(response, "documents.get")
    }

    async fn fetch_document(&self, document_id: &str) -> Result<Document, WorkspaceError> {
        Ok(serde_json::from_value(self.get_document(document_id).await?)?)
    }

    pub async fn read_text(&self, document_id: &str) -> Result<DocumentText, WorkspaceError> {
        let document = self.fetch_document(document_id).await?;
        Ok(DocumentText {
            document_id: document
                .document_id
                .clone()
                .unwrap_or_else(|| document_id.to_string()),
            title: document.title.clone().unwrap_or_default(),
            text: extract_plain_text(&document),
        })
    }

    /// Creates an empty document and returns its structure.
    pub async fn create_document(&self, title: &str) -> Result<Value, WorkspaceError> {
        tracing::info!("Creating document '{}'", title);
        let response = self
            .api
            .request(
                &self.base_url,
                "/documents",
                ApiMethod::Post,
                &[],
                Some(&json!({ "title": title })),
            )
            .await?;
        expect_payload(response, "documents.create")
    }

    /// Replaces the entire body with `new_text` in one atomic batch.
    pub async fn replace_body(
        &self,
        document_id: &str,
        new_text: &str,
    ) -> Result<Value, WorkspaceError> {
        let document = self.fetch_document(document_id).await?;
        let end_index = body_end_index(&document)?;
        let requests = plan_body_replace(end_index, new_text);

        tracing::info!(
            "Replacing body of document {} (end index {}, {} request(s))",
            document_id,
            end_index,
            requests.len()
        );

        self.batch_update(document_id, requests).await
    }

    /// Inserts `text` at the end of the body.
    pub async fn append_text(&self, document_id: &str, text: &str) -> Result<Value, WorkspaceError> {
        let document = self.fetch_document(document_id).await?;
        let index = append_index(body_end_index(&document)?);

        tracing::info!("Appending {} char(s) to document {}", text.len(), document_id);

        self.batch_update(
            document_id,
            vec![DocsRequest::InsertText {
                location: Location { index },
                text: text.to_string(),
            }],
        )
        .await
    }

    async fn batch_update(
        &self,
        document_id: &str,
        requests: Vec<DocsRequest>,
    ) -> Result<Value, WorkspaceError> {
        let body = serde_json::to_value(BatchUpdateDocumentRequest { requests })?;
        let response = self
            .api
            .request(
                &self.base_url,
                &format!("/documents/{}:batchUpdate", path_segment(document_id)),
                ApiMethod::Post,
                &[],
                Some(&body),
            )
            .await?;
        expect_payload(response, "documents.batchUpdate")
    }
}
