// Spreadsheet addressing and value writes.

pub mod a1_notation;
pub mod sheets_models;
pub mod sheets_service;

pub use sheets_models::{DateTimeRenderOption, ValueRenderOption};
pub use sheets_service::SheetsService;
