// Error kinds shared by every layer.
// The core never sees HTTP types, so transport failures arrive here as strings.

use thiserror::Error;

/// Everything that can go wrong while talking to Drive, Docs or Sheets.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The service-account key is missing fields or holds an unusable private key.
    #[error("Invalid service account credential: {0}")]
    Credential(String),

    /// The token endpoint rejected our signed assertion.
    #[error("Token exchange failed ({status}): {body}")]
    Auth { status: u16, body: String },

    /// A remote API answered with a non-success status.
    /// `body` is the response text exactly as the service sent it.
    #[error("Google API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error(transparent)]
    Address(#[from] AddressError),

    /// A fetched document or spreadsheet lacks a field we need.
    #[error("Unexpected document structure: {0}")]
    Structure(String),

    #[error("HTTP transport error: {0}")]
    Http(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why a spreadsheet address could not be resolved to a single cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("Spreadsheet has no sheets")]
    NoSheets,

    #[error("No sheet titled '{0}'")]
    SheetNotFound(String),

    #[error("'{0}' is not a single-cell address like B2")]
    NotSingleCell(String),

    #[error("Row number in '{0}' must be a positive integer")]
    InvalidRow(String),

    #[error("Column letters in '{0}' must be A-Z")]
    InvalidColumn(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_keeps_remote_body_verbatim() {
        let body = r#"{"error":{"code":404,"message":"Requested entity was not found."}}"#;
        let err = WorkspaceError::Api {
            status: 404,
            body: body.to_string(),
        };
        assert!(err.to_string().contains(body));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn address_errors_convert_transparently() {
        let err: WorkspaceError = AddressError::SheetNotFound("Budget".into()).into();
        assert_eq!(err.to_string(), "No sheet titled 'Budget'");
    }
}
