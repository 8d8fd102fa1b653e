// HTTP implementation of the core `WorkspaceApi` trait.

pub mod api_client;

pub use api_client::GoogleApiClient;
