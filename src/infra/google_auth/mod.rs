// =============================================================================
// GOOGLE SERVICE ACCOUNT AUTH
// =============================================================================
//
// Everything needed to turn a service-account JSON key into bearer tokens.
// The request client only depends on the `TokenProvider` trait, so tests can
// hand it a fixed token instead of running the exchange.

pub mod assertion;
pub mod clock;
pub mod credentials;
pub mod service_account;

use async_trait::async_trait;

use crate::core::errors::WorkspaceError;

pub use service_account::ServiceAccountAuth;

/// Anything that can produce a bearer token for the next request.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, WorkspaceError>;

    /// Forget any cached token, e.g. after the API answered 401.
    async fn invalidate(&self) {}
}
