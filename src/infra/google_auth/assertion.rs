// JWT-bearer assertion for the service-account token exchange.
//
// header.payload are compact JSON, base64url without padding; the signature is
// RSA-SHA256 over "header.payload", also base64url. The three parts are joined
// with dots.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{crypto, Algorithm, EncodingKey};
use serde::Serialize;

use super::credentials::{ScopeSet, ServiceAccountCredentials};
use crate::core::errors::WorkspaceError;

/// Assertions are valid for one hour, the most Google accepts.
pub const ASSERTION_LIFETIME_SECS: u64 = 3600;

#[derive(Debug, Serialize)]
struct AssertionHeader {
    alg: &'static str,
    typ: &'static str,
}

/// JWT claims for Google OAuth2.
#[derive(Debug, Serialize)]
struct JwtClaims<'a> {
    /// Issuer (service account email).
    iss: &'a str,

    /// Space-joined scopes.
    scope: String,

    /// Audience (token endpoint).
    aud: &'a str,

    /// Issued at (Unix timestamp).
    iat: u64,

    /// Expiration (Unix timestamp).
    exp: u64,
}

fn encode_part<T: Serialize>(part: &T) -> Result<String, WorkspaceError> {
    Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(part)?))
}

/// Builds and signs the assertion, issued at `issued_at` (Unix seconds).
pub fn build_assertion(
    credentials: &ServiceAccountCredentials,
    scopes: &ScopeSet,
    issued_at: u64,
) -> Result<String, WorkspaceError> {
    let header = encode_part(&AssertionHeader {
        alg: "RS256",
        typ: "JWT",
    })?;
    let claims = encode_part(&JwtClaims {
        iss: &credentials.client_email,
        scope: scopes.joined(),
        aud: &credentials.token_uri,
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME_SECS,
    })?;

    let signing_input = format!("{}.{}", header, claims);

    let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
        .map_err(|e| WorkspaceError::Credential(format!("unusable private key: {}", e)))?;
    // `crypto::sign` already returns the signature base64url-encoded.
    let signature = crypto::sign(signing_input.as_bytes(), &key, Algorithm::RS256)
        .map_err(|e| WorkspaceError::Credential(format!("signing failed: {}", e)))?;

    Ok(format!("{}.{}", signing_input, signature))
}
