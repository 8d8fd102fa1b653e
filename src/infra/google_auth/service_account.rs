// =============================================================================
// SERVICE ACCOUNT AUTHENTICATION
// =============================================================================
//
// Turns a service-account key into short-lived bearer tokens:
//
// 1. Sign a JWT-bearer assertion with the account's private key.
// 2. POST it to the key's `token_uri`.
// 3. Cache the returned token until five minutes before it expires.
//
// The cache belongs to one `ServiceAccountAuth`. Two callers that both miss the
// cache will both run the exchange; Google hands out independent tokens, so
// the last one written simply wins.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

use super::assertion::build_assertion;
use super::clock::{unix_seconds, Clock, SystemClock};
use super::credentials::{ScopeSet, ServiceAccountCredentials};
use super::TokenProvider;
use crate::core::errors::WorkspaceError;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Tokens this close to expiry are treated as already expired.
pub const EXPIRY_SAFETY_MARGIN: Duration = Duration::from_secs(5 * 60);

/// Upper bound on a reported token lifetime. Google issues one-hour tokens.
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

fn default_expires_in() -> u64 {
    3600
}

/// Response from Google's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

impl TokenResponse {
    fn lifetime(&self) -> Duration {
        Duration::from_secs(self.expires_in).min(MAX_TOKEN_LIFETIME)
    }
}

/// Cached access token with expiration.
struct CachedToken {
    token: String,
    expires_at: SystemTime,
}

/// Authenticator that handles OAuth2 with service account credentials.
pub struct ServiceAccountAuth {
    credentials: ServiceAccountCredentials,
    scopes: ScopeSet,
    client: Client,
    clock: Arc<dyn Clock>,
    cached_token: RwLock<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(credentials: ServiceAccountCredentials) -> Result<Self, WorkspaceError> {
        credentials.validate()?;
        Ok(Self {
            credentials,
            scopes: ScopeSet::default(),
            client: Client::new(),
            clock: Arc::new(SystemClock),
            cached_token: RwLock::new(None),
        })
    }

    /// Key from the environment, scopes from `GOOGLE_SCOPES` or the defaults.
    pub async fn from_env() -> Result<Self, WorkspaceError> {
        let credentials = ServiceAccountCredentials::from_env().await?;
        Ok(Self::new(credentials)?.with_scopes(ScopeSet::from_env()))
    }

    pub fn with_scopes(mut self, scopes: ScopeSet) -> Self {
        self.scopes = scopes;
        self
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn client_email(&self) -> &str {
        &self.credentials.client_email
    }

    /// Gets a valid access token, exchanging a fresh assertion if necessary.
    pub async fn get_access_token(&self) -> Result<String, WorkspaceError> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if self.clock.now() + EXPIRY_SAFETY_MARGIN < token.expires_at {
                    return Ok(token.token.clone());
                }
            }
        }

        let response = self.fetch_new_token().await?;
        let token = response.access_token.clone();

        {
            let mut cached = self.cached_token.write().await;
            *cached = Some(CachedToken {
                token: token.clone(),
                expires_at: self.clock.now() + response.lifetime(),
            });
        }

        Ok(token)
    }

    /// Drops the cached token so the next call performs a fresh exchange.
    pub async fn invalidate(&self) {
        *self.cached_token.write().await = None;
    }

    async fn fetch_new_token(&self) -> Result<TokenResponse, WorkspaceError> {
        let issued_at = unix_seconds(self.clock.now());
        let assertion = build_assertion(&self.credentials, &self.scopes, issued_at)?;

        tracing::debug!(
            "Exchanging assertion for {} at {}",
            self.credentials.client_email,
            self.credentials.token_uri
        );

        let response = self
            .client
            .post(&self.credentials.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| WorkspaceError::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| WorkspaceError::Http(e.to_string()))?;

        if !status.is_success() {
            tracing::error!("Token exchange rejected with {}", status);
            return Err(WorkspaceError::Auth {
                status: status.as_u16(),
                body: text,
            });
        }

        let token_response: TokenResponse = serde_json::from_str(&text)?;
        tracing::info!(
            "Obtained access token for {} (expires in {}s)",
            self.credentials.client_email,
            token_response.expires_in
        );
        Ok(token_response)
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountAuth {
    async fn access_token(&self) -> Result<String, WorkspaceError> {
        self.get_access_token().await
    }

    async fn invalidate(&self) {
        ServiceAccountAuth::invalidate(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::google_auth::assertion::test_support::test_credentials;
    use crate::infra::google_auth::clock::test_support::ManualClock;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn token_body(token: &str, expires_in: u64) -> serde_json::Value {
        json!({"access_token": token, "expires_in": expires_in, "token_type": "Bearer"})
    }

    async fn auth_against(server: &MockServer, clock: Arc<ManualClock>) -> ServiceAccountAuth {
        ServiceAccountAuth::new(test_credentials(&format!("{}/token", server.uri())))
            .unwrap()
            .with_clock(clock)
    }

    #[tokio::test]
    async fn cached_token_is_reused_within_margin() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-1", 3600)))
            .expect(1)
            .mount(&server)
            .await;

        let clock = Arc::new(ManualClock::starting_now());
        let auth = auth_against(&server, clock.clone()).await;

        let first = auth.get_access_token().await.unwrap();
        clock.advance(Duration::from_secs(60));
        let second = auth.get_access_token().await.unwrap();

        assert_eq!(first, "tok-1");
        assert_eq!(first, second);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn token_inside_safety_margin_is_refreshed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-1", 3600)))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-2", 3600)))
            .mount(&server)
            .await;

        let clock = Arc::new(ManualClock::starting_now());
        let auth = auth_against(&server, clock.clone()).await;

        assert_eq!(auth.get_access_token().await.unwrap(), "tok-1");

        // Just outside the margin: still cached.
        clock.advance(Duration::from_secs(3600 - 300 - 1));
        assert_eq!(auth.get_access_token().await.unwrap(), "tok-1");
        assert_eq!(server.received_requests().await.unwrap().len(), 1);

        // Inside the margin: one new exchange.
        clock.advance(Duration::from_secs(2));
        assert_eq!(auth.get_access_token().await.unwrap(), "tok-2");
        assert_eq!(auth.get_access_token().await.unwrap(), "tok-2");
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_expires_in_defaults_to_an_hour() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "t"})))
            .mount(&server)
            .await;

        let clock = Arc::new(ManualClock::starting_now());
        let auth = auth_against(&server, clock.clone()).await;

        auth.get_access_token().await.unwrap();
        clock.advance(Duration::from_secs(3000));
        auth.get_access_token().await.unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), 1);

        clock.advance(Duration::from_secs(400));
        auth.get_access_token().await.unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn huge_expires_in_is_capped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "t", "expires_in": u64::MAX})),
            )
            .mount(&server)
            .await;

        let clock = Arc::new(ManualClock::starting_now());
        let auth = auth_against(&server, clock.clone()).await;

        assert_eq!(auth.get_access_token().await.unwrap(), "t");

        clock.advance(MAX_TOKEN_LIFETIME - EXPIRY_SAFETY_MARGIN - Duration::from_secs(1));
        auth.get_access_token().await.unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), 1);

        clock.advance(Duration::from_secs(2));
        auth.get_access_token().await.unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn exchange_posts_jwt_bearer_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains(
                "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
            ))
            .and(body_string_contains("assertion="))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok", 3600)))
            .expect(1)
            .mount(&server)
            .await;

        let auth = auth_against(&server, Arc::new(ManualClock::starting_now())).await;
        auth.get_access_token().await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8(requests[0].body.clone()).unwrap();
        let assertion = body
            .split('&')
            .find_map(|pair| pair.strip_prefix("assertion="))
            .unwrap();
        assert_eq!(assertion.split('.').count(), 3);
    }

    #[tokio::test]
    async fn rejected_exchange_is_an_auth_error_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"error":"invalid_grant","error_description":"Invalid JWT"}"#),
            )
            .mount(&server)
            .await;

        let auth = auth_against(&server, Arc::new(ManualClock::starting_now())).await;
        let err = auth.get_access_token().await.unwrap_err();

        match err {
            WorkspaceError::Auth { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("invalid_grant"));
            }
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_exchange_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("ok", 3600)))
            .mount(&server)
            .await;

        let auth = auth_against(&server, Arc::new(ManualClock::starting_now())).await;

        assert!(auth.get_access_token().await.is_err());
        assert_eq!(auth.get_access_token().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn invalidate_forces_a_new_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok", 3600)))
            .expect(2)
            .mount(&server)
            .await;

        let auth = auth_against(&server, Arc::new(ManualClock::starting_now())).await;
        auth.get_access_token().await.unwrap();
        auth.invalidate().await;
        auth.get_access_token().await.unwrap();
    }

    #[test]
    fn incomplete_credentials_are_rejected_up_front() {
        let mut creds = test_credentials("https://oauth2.example/token");
        creds.token_uri = " ".into();
        assert!(matches!(
            ServiceAccountAuth::new(creds),
            Err(WorkspaceError::Credential(_))
        ));
    }
}
