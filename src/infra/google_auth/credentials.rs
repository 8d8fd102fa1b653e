// Service-account key material and the scopes requested with it.

use serde::Deserialize;
use std::fmt;

use crate::core::errors::WorkspaceError;

pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";
pub const DOCUMENTS_SCOPE: &str = "https://www.googleapis.com/auth/documents";
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Environment variables holding a path to the JSON key file, checked in order.
const KEY_PATH_VARS: [&str; 2] = ["GOOGLE_SERVICE_ACCOUNT_KEY", "GOOGLE_APPLICATION_CREDENTIALS"];
/// Environment variables holding the JSON key itself, checked in order.
const KEY_JSON_VARS: [&str; 2] = ["GOOGLE_SERVICE_ACCOUNT_JSON", "GOOGLE_CREDENTIALS"];

/// Service account credentials from the JSON key file.
///
/// Missing fields deserialize as empty strings so `validate` can report
/// which one is absent instead of a generic parse error.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountCredentials {
    /// The service account email (used as issuer in the assertion).
    #[serde(default)]
    pub client_email: String,

    /// The private key in PEM format.
    #[serde(default)]
    pub private_key: String,

    /// Where the signed assertion is exchanged for an access token.
    #[serde(default)]
    pub token_uri: String,
}

// Hand-written so the private key never ends up in logs.
impl fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountCredentials {
    pub fn from_json(json: &str) -> Result<Self, WorkspaceError> {
        let credentials: Self = serde_json::from_str(json).map_err(|e| {
            WorkspaceError::Credential(format!("key is not valid JSON: {}", e))
        })?;
        credentials.validate()?;
        Ok(credentials)
    }

    pub async fn from_file(path: &str) -> Result<Self, WorkspaceError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            WorkspaceError::Credential(format!("cannot read key file {}: {}", path, e))
        })?;
        Self::from_json(&content)
    }

    /// Loads the key from the first configured environment variable.
    /// Path variables win over inline JSON.
    pub async fn from_env() -> Result<Self, WorkspaceError> {
        for var in KEY_PATH_VARS {
            if let Ok(path) = std::env::var(var) {
                tracing::debug!("Loading service account key from ${}", var);
                return Self::from_file(&path).await;
            }
        }

        for var in KEY_JSON_VARS {
            if let Ok(json) = std::env::var(var) {
                tracing::debug!("Loading service account key from ${}", var);
                return Self::from_json(&json);
            }
        }

        Err(WorkspaceError::Credential(format!(
            "none of {} is set",
            KEY_PATH_VARS
                .iter()
                .chain(KEY_JSON_VARS.iter())
                .copied()
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }

    pub fn validate(&self) -> Result<(), WorkspaceError> {
        let missing: Vec<&str> = [
            ("client_email", &self.client_email),
            ("private_key", &self.private_key),
            ("token_uri", &self.token_uri),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(WorkspaceError::Credential(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }
}

/// Ordered capability URIs requested during the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSet(Vec<String>);

impl Default for ScopeSet {
    fn default() -> Self {
        Self(vec![
            DRIVE_SCOPE.to_string(),
            DOCUMENTS_SCOPE.to_string(),
            SPREADSHEETS_SCOPE.to_string(),
        ])
    }
}

impl ScopeSet {
    /// Keeps the given order and drops blanks and duplicates.
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for scope in scopes {
            let scope = scope.into().trim().to_string();
            if !scope.is_empty() && !unique.contains(&scope) {
                unique.push(scope);
            }
        }
        Self(unique)
    }

    /// `GOOGLE_SCOPES` (comma-separated) if set and non-empty, otherwise the defaults.
    pub fn from_env() -> Self {
        match std::env::var("GOOGLE_SCOPES") {
            Ok(raw) => {
                let scopes = Self::new(raw.split(','));
                if scopes.0.is_empty() {
                    Self::default()
                } else {
                    scopes
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Space-joined, as the `scope` claim expects.
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}
