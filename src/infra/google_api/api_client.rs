use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::core::errors::WorkspaceError;
use crate::core::workspace_api::{ApiMethod, WorkspaceApi};
use crate::infra::google_auth::TokenProvider;

/// Authenticated REST client shared by the Drive, Docs and Sheets services.
///
/// Every call resolves a token first; no request leaves without one.
#[derive(Clone)]
pub struct GoogleApiClient {
    client: Client,
    tokens: Arc<dyn TokenProvider>,
}

impl GoogleApiClient {
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            client: Client::new(),
            tokens,
        }
    }

    fn http_method(method: ApiMethod) -> Method {
        match method {
            ApiMethod::Get => Method::GET,
            ApiMethod::Post => Method::POST,
            ApiMethod::Put => Method::PUT,
            ApiMethod::Patch => Method::PATCH,
            ApiMethod::Delete => Method::DELETE,
        }
    }
}

#[async_trait]
impl WorkspaceApi for GoogleApiClient {
    async fn request(
        &self,
        base_url: &str,
        path: &str,
        method: ApiMethod,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Option<Value>, WorkspaceError> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}{}", base_url.trim_end_matches('/'), path);

        tracing::debug!("{:?} {}", method, url);

        let mut request = self
            .client
            .request(Self::http_method(method), &url)
            .bearer_auth(token);

        if !query.is_empty() {
            request = request.query(query);
        }

        // `json` also sets `Content-Type: application/json`.
        if method.accepts_body() {
            let empty = json!({});
            request = request.json(body.unwrap_or(&empty));
        }

        let response = request
            .send()
            .await
            .map_err(|e| WorkspaceError::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| WorkspaceError::Http(e.to_string()))?;

        if status == StatusCode::UNAUTHORIZED {
            // The token was revoked or expired early; the next call re-exchanges.
            self.tokens.invalidate().await;
        }

        if !status.is_success() {
            tracing::warn!("{:?} {} failed with {}", method, url, status);
            return Err(WorkspaceError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        if method == ApiMethod::Delete {
            return Ok(None);
        }

        if text.trim().is_empty() {
            return Ok(Some(Value::Null));
        }

        Ok(Some(serde_json::from_str(&text)?))
    }
}
