// The tool boundary: named operations with JSON arguments, dispatched onto
// the core services. This is the surface an agent or the CLI talks to.

pub mod tool_args;
pub mod tool_catalog;
pub mod workspace_tools;

pub use tool_catalog::tool_definitions;
pub use workspace_tools::{ToolCallHandler, WorkspaceToolHandler};
