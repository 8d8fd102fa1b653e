use serde_json::Value;

use super::drive_models::{FileList, FileMetadata, FileMetadataPatch, ListFilesQuery};
use crate::core::errors::WorkspaceError;
use crate::core::workspace_api::{
    expect_payload, path_segment, query_pairs, ApiMethod, WorkspaceApi,
};

/// File metadata operations against Drive v3.
pub struct DriveService<C: WorkspaceApi> {
    api: C,
    base_url: String,
}

impl<C: WorkspaceApi> DriveService<C> {
    pub fn new(api: C, base_url: impl Into<String>) -> Self {
        Self {
            api,
            base_url: base_url.into(),
        }
    }

    pub async fn list_files(&self, query: &ListFilesQuery) -> Result<FileList, WorkspaceError> {
        let response = self
            .api
            .request(&self.base_url, "/files", ApiMethod::Get, &query.to_query(), None)
            .await?;
        let list: FileList = serde_json::from_value(expect_payload(response, "files.list")?)?;
        tracing::debug!("Listed {} file(s)", list.files.len());
        Ok(list)
    }

    /// Fetches one file's metadata, projected through `fields` when given.
    pub async fn get_file(
        &self,
        file_id: &str,
        fields: Option<&str>,
    ) -> Result<Value, WorkspaceError> {
        let query = fields
            .map(|f| query_pairs(&[("fields", f)]))
            .unwrap_or_default();
        let response = self
            .api
            .request(
                &self.base_url,
                &format!("/files/{}", path_segment(file_id)),
                ApiMethod::Get,
                &query,
                None,
            )
            .await?;
        expect_payload(response, "files.get")
    }

    pub async fn create_file(&self, metadata: &FileMetadata) -> Result<Value, WorkspaceError> {
        tracing::info!(
            "Creating Drive file '{}' ({})",
            metadata.name,
            metadata.mime_type
        );
        let body = serde_json::to_value(metadata)?;
        let response = self
            .api
            .request(
                &self.base_url,
                "/files",
                ApiMethod::Post,
                &query_pairs(&[("fields", "id, name, mimeType, parents, webViewLink")]),
                Some(&body),
            )
            .await?;
        expect_payload(response, "files.create")
    }

    pub async fn update_file(
        &self,
        file_id: &str,
        patch: &FileMetadataPatch,
    ) -> Result<Value, WorkspaceError> {
        tracing::info!("Updating Drive file {}", file_id);
        let response = self
            .api
            .request(
                &self.base_url,
                &format!("/files/{}", path_segment(file_id)),
                ApiMethod::Patch,
                &patch.query(),
                Some(&patch.body()),
            )
            .await?;
        expect_payload(response, "files.update")
    }

    /// Permanently deletes a file. Success carries no payload.
    pub async fn delete_file(&self, file_id: &str) -> Result<(), WorkspaceError> {
        tracing::info!("Deleting Drive file {}", file_id);
        self.api
            .request(
                &self.base_url,
                &format!("/files/{}", path_segment(file_id)),
                ApiMethod::Delete,
                &[],
                None,
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::drive::drive_models::FOLDER_MIME_TYPE;
    use crate::core::workspace_api::test_support::FakeApi;
    use serde_json::json;
    use std::sync::Arc;

    const BASE: &str = "https://drive.test/drive/v3";

    #[tokio::test]
    async fn list_files_forwards_paging_and_filters() {
        let api = Arc::new(FakeApi::new().respond(json!({
            "files": [{"id": "a", "name": "A"}, {"id": "b", "name": "B"}],
            "nextPageToken": "next"
        })));
        let service = DriveService::new(api.clone(), BASE);

        let list = service
            .list_files(&ListFilesQuery {
                page_size: Some(2),
                page_token: Some("prev".into()),
                q: Some("trashed = false".into()),
                order_by: Some("modifiedTime desc".into()),
                fields: None,
            })
            .await
            .unwrap();

        assert_eq!(list.files.len(), 2);
        assert_eq!(list.next_page_token.as_deref(), Some("next"));

        let call = &api.calls()[0];
        assert_eq!(call.base_url, BASE);
        assert_eq!(call.path, "/files");
        assert_eq!(call.query_value("pageSize"), Some("2"));
        assert_eq!(call.query_value("pageToken"), Some("prev"));
        assert_eq!(call.query_value("q"), Some("trashed = false"));
        assert_eq!(call.query_value("orderBy"), Some("modifiedTime desc"));
        assert!(call.body.is_none());
    }

    #[tokio::test]
    async fn create_sends_metadata_body() {
        let api = Arc::new(FakeApi::new().respond(json!({"id": "new", "name": "Reports"})));
        let service = DriveService::new(api.clone(), BASE);

        let created = service
            .create_file(&FileMetadata {
                name: "Reports".into(),
                mime_type: FOLDER_MIME_TYPE.into(),
                parents: vec!["root".into()],
                description: None,
            })
            .await
            .unwrap();

        assert_eq!(created["id"], "new");
        let call = &api.calls()[0];
        assert_eq!(call.method, ApiMethod::Post);
        assert_eq!(
            call.body,
            Some(json!({"name": "Reports", "mimeType": FOLDER_MIME_TYPE, "parents": ["root"]}))
        );
    }

    #[tokio::test]
    async fn update_moves_parents_through_query() {
        let api = Arc::new(FakeApi::new().respond(json!({"id": "f"})));
        let service = DriveService::new(api.clone(), BASE);

        service
            .update_file(
                "f",
                &FileMetadataPatch {
                    add_parents: vec!["new-parent".into()],
                    remove_parents: vec!["old-parent".into()],
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let call = &api.calls()[0];
        assert_eq!(call.method, ApiMethod::Patch);
        assert_eq!(call.path, "/files/f");
        assert_eq!(call.query_value("addParents"), Some("new-parent"));
        assert_eq!(call.query_value("removeParents"), Some("old-parent"));
        assert_eq!(call.body, Some(json!({})));
    }

    #[tokio::test]
    async fn delete_yields_no_payload() {
        let api = Arc::new(FakeApi::new().respond_empty());
        let service = DriveService::new(api.clone(), BASE);

        service.delete_file("gone").await.unwrap();

        let call = &api.calls()[0];
        assert_eq!(call.method, ApiMethod::Delete);
        assert_eq!(call.path, "/files/gone");
        assert!(call.body.is_none());
    }

    #[tokio::test]
    async fn get_file_projects_fields() {
        let api = Arc::new(FakeApi::new().respond(json!({"id": "f", "name": "N"})));
        let service = DriveService::new(api.clone(), BASE);

        service.get_file("f", Some("id,name")).await.unwrap();
        assert_eq!(api.calls()[0].query_value("fields"), Some("id,name"));
    }

    #[tokio::test]
    async fn file_ids_stay_inside_the_files_path() {
        let api = Arc::new(FakeApi::new().respond(json!({"id": "x"})).respond_empty());
        let service = DriveService::new(api.clone(), BASE);

        service.get_file("../about", None).await.unwrap();
        service.delete_file("a/b?c").await.unwrap();

        let calls = api.calls();
        assert_eq!(calls[0].path, "/files/..%2Fabout");
        assert_eq!(calls[1].path, "/files/a%2Fb%3Fc");
    }
}
