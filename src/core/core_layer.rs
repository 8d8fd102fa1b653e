// The core module contains the addressing logic and the services built on it.
// Nothing in here knows about HTTP clients or tokens; it talks to the remote
// APIs only through the `WorkspaceApi` trait.

pub mod errors;
pub mod workspace_api;

#[path = "docs/mod.rs"]
pub mod docs;

#[path = "drive/mod.rs"]
pub mod drive;

#[path = "sheets/mod.rs"]
pub mod sheets;
