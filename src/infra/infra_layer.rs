// The infra module contains implementations of core traits.
// Here that means the token exchange and the HTTP client.

#[path = "google_auth/mod.rs"]
pub mod google_auth;

#[path = "google_api/mod.rs"]
pub mod google_api;
