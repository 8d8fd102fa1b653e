// The seam between the core services and the HTTP layer.
// Services build paths, query pairs and bodies; an implementation of
// `WorkspaceApi` (see infra/google_api) attaches the bearer token and talks HTTP.

use async_trait::async_trait;
use serde_json::Value;

use super::errors::WorkspaceError;

/// HTTP verbs the Google REST surfaces use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl ApiMethod {
    /// Only create/update style calls carry a JSON payload.
    pub fn accepts_body(self) -> bool {
        matches!(self, ApiMethod::Post | ApiMethod::Put | ApiMethod::Patch)
    }
}

/// Base URLs for the three REST hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceEndpoints {
    pub drive: String,
    pub docs: String,
    pub sheets: String,
}

impl Default for WorkspaceEndpoints {
    fn default() -> Self {
        Self {
            drive: "https://www.googleapis.com/drive/v3".to_string(),
            docs: "https://docs.googleapis.com/v1".to_string(),
            sheets: "https://sheets.googleapis.com/v4".to_string(),
        }
    }
}

impl WorkspaceEndpoints {
    /// Defaults, with any `GOOGLE_*_BASE_URL` override applied.
    pub fn from_env() -> Self {
        let mut endpoints = Self::default();
        if let Ok(url) = std::env::var("GOOGLE_DRIVE_BASE_URL") {
            endpoints.drive = url;
        }
        if let Ok(url) = std::env::var("GOOGLE_DOCS_BASE_URL") {
            endpoints.docs = url;
        }
        if let Ok(url) = std::env::var("GOOGLE_SHEETS_BASE_URL") {
            endpoints.sheets = url;
        }
        endpoints
    }
}

/// An authenticated request against a Google REST host.
///
/// Returns `Ok(None)` for delete calls and `Ok(Some(json))` for everything else.
/// Non-2xx responses must surface as [`WorkspaceError::Api`] with the raw body.
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    async fn request(
        &self,
        base_url: &str,
        path: &str,
        method: ApiMethod,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Option<Value>, WorkspaceError>;
}

// Lets services hold either a concrete client or a shared reference to one.
#[async_trait]
impl<T: WorkspaceApi + ?Sized> WorkspaceApi for std::sync::Arc<T> {
    async fn request(
        &self,
        base_url: &str,
        path: &str,
        method: ApiMethod,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Option<Value>, WorkspaceError> {
        (**self).request(base_url, path, method, query, body).await
    }
}

/// Shorthand for services building query strings from borrowed pairs.
pub fn query_pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Percent-encodes a caller-supplied ID so it stays one path segment.
pub fn path_segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// Unwraps a non-delete response, treating a missing payload as a structure problem.
pub fn expect_payload(response: Option<Value>, what: &str) -> Result<Value, WorkspaceError> {
    response.ok_or_else(|| WorkspaceError::Structure(format!("{} returned no body", what)))
}

#[cfg(test)]
pub(crate) mod test_support {
    //! A recording fake of `WorkspaceApi` used by the service tests.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    impl WorkspaceEndpoints {
        /// Every host pointed at one base URL.
        pub fn all_at(base_url: &str) -> Self {
            Self {
                drive: base_url.to_string(),
                docs: base_url.to_string(),
                sheets: base_url.to_string(),
            }
        }
    }

    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub base_url: String,
        pub path: String,
        pub method: ApiMethod,
        pub query: Vec<(String, String)>,
        pub body: Option<Value>,
    }

    impl RecordedCall {
        pub fn query_value(&self, key: &str) -> Option<&str> {
            self.query
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        }
    }

    /// Replies with queued responses in order and records every call.
    #[derive(Default)]
    pub struct FakeApi {
        responses: Mutex<VecDeque<Result<Option<Value>, WorkspaceError>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl FakeApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, value: Value) -> Self {
            self.responses.lock().unwrap().push_back(Ok(Some(value)));
            self
        }

        pub fn respond_empty(self) -> Self {
            self.responses.lock().unwrap().push_back(Ok(None));
            self
        }

        pub fn fail(self, err: WorkspaceError) -> Self {
            self.responses.lock().unwrap().push_back(Err(err));
            self
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WorkspaceApi for FakeApi {
        async fn request(
            &self,
            base_url: &str,
            path: &str,
            method: ApiMethod,
            query: &[(String, String)],
            body: Option<&Value>,
        ) -> Result<Option<Value>, WorkspaceError> {
            self.calls.lock().unwrap().push(RecordedCall {
                base_url: base_url.to_string(),
                path: path.to_string(),
                method,
                query: query.to_vec(),
                body: body.cloned(),
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("FakeApi got an unexpected call to {}", path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_write_methods_carry_a_body() {
        assert!(!ApiMethod::Get.accepts_body());
        assert!(!ApiMethod::Delete.accepts_body());
        assert!(ApiMethod::Post.accepts_body());
        assert!(ApiMethod::Put.accepts_body());
        assert!(ApiMethod::Patch.accepts_body());
    }

    #[test]
    fn default_endpoints_point_at_google() {
        let endpoints = WorkspaceEndpoints::default();
        assert!(endpoints.drive.starts_with("https://www.googleapis.com/drive"));
        assert!(endpoints.docs.starts_with("https://docs.googleapis.com"));
        assert!(endpoints.sheets.starts_with("https://sheets.googleapis.com"));
    }

    #[test]
    fn missing_payload_is_a_structure_error() {
        let err = expect_payload(None, "documents.get").unwrap_err();
        assert!(matches!(err, WorkspaceError::Structure(_)));
    }

    #[test]
    fn path_segments_cannot_escape_their_slot() {
        assert_eq!(path_segment("1AbC-d_9"), "1AbC-d_9");
        assert_eq!(path_segment("../about"), "..%2Fabout");
        assert_eq!(path_segment("id?fields=x"), "id%3Ffields%3Dx");
    }
}
