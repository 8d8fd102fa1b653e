// Drive file metadata: list, get, create, update, delete.

pub mod drive_models;
pub mod drive_service;

pub use drive_models::{FileMetadata, FileMetadataPatch, ListFilesQuery};
pub use drive_service::DriveService;
