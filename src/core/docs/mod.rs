// Rich-text documents: plain-text reads and full-body replacement.

pub mod body_text;
pub mod docs_models;
pub mod docs_service;

pub use docs_service::DocsService;
