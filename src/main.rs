// This is the entry point of the workspace bridge.
//
// **Architecture Overview:**
// - `core/` = Drive, Docs and Sheets logic behind the `WorkspaceApi` seam
// - `infra/` = Service-account token exchange and the HTTP client
// - `tools/` = Named tool calls with JSON arguments
//
// Usage:
//   google_workspace_bridge --list-tools
//   google_workspace_bridge <tool> ['{"json": "arguments"}']
//
// The result is printed to stdout as JSON. Logs go to stderr.

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with a handful of mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;
#[path = "tools/tools_layer.rs"]
mod tools;

use anyhow::{bail, Context};
use clap::Parser;
use serde_json::Value;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::core::workspace_api::WorkspaceEndpoints;
use crate::infra::google_api::GoogleApiClient;
use crate::infra::google_auth::ServiceAccountAuth;
use crate::tools::{tool_definitions, ToolCallHandler, WorkspaceToolHandler};

#[derive(Parser, Debug)]
#[command(about = "Google Drive, Docs and Sheets operations as JSON tool calls")]
struct Cli {
    /// Print every tool with its parameters and exit.
    #[arg(long)]
    list_tools: bool,

    /// Tool to run, e.g. `sheets_write_cell`.
    #[arg(required_unless_present = "list_tools")]
    tool: Option<String>,

    /// Tool arguments as a JSON object.
    #[arg(default_value = "{}")]
    args: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout is reserved for tool output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    if cli.list_tools {
        println!("{}", serde_json::to_string_pretty(&tool_definitions())?);
        return Ok(());
    }

    let tool = match cli.tool {
        Some(tool) => tool,
        None => bail!("No tool given; pass a tool name or --list-tools"),
    };

    let tool_args: Value = serde_json::from_str(&cli.args)
        .with_context(|| format!("Arguments for {} are not valid JSON", tool))?;

    let auth = ServiceAccountAuth::from_env()
        .await
        .context("Failed to load service account credentials")?;
    tracing::info!("Authenticating as {}", auth.client_email());

    let api = GoogleApiClient::new(Arc::new(auth));
    let handler = WorkspaceToolHandler::new(api, &WorkspaceEndpoints::from_env());

    match handler.handle_tool_call(&tool, &tool_args).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            if result.get("success") == Some(&Value::Bool(false)) {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(message) => {
            tracing::error!("Rejected call to {}: {}", tool, message);
            bail!("{}", message)
        }
    }
}
