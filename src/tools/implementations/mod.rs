// Tool implementations
//
// The four sandboxed tools exposed to the model

use serde_json::Value;

use crate::config::ScriptConfig;
use crate::errors::ToolError;
use crate::tools::registry::ToolRegistry;
use crate::tools::sandbox::Sandbox;

// Filesystem tools
pub mod list_directory;
pub mod read_file;
pub mod write_file;

// Script execution
pub mod run_script;

// Re-exports for convenience
pub use list_directory::ListDirectoryTool;
pub use read_file::ReadFileTool;
pub use run_script::RunScriptTool;
pub use write_file::WriteFileTool;

/// Build the registry holding the four built-in tools
pub fn builtin_registry(
    sandbox: &Sandbox,
    file_read_max_size: usize,
    script: &ScriptConfig,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(ListDirectoryTool::new(sandbox.clone())));
    registry.register(Box::new(ReadFileTool::new(
        sandbox.clone(),
        file_read_max_size,
    )));
    registry.register(Box::new(RunScriptTool::new(sandbox.clone(), script)));
    registry.register(Box::new(WriteFileTool::new(sandbox.clone())));
    registry
}

pub(crate) fn required_str<'a>(input: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    input
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::InvalidInput(format!("Missing {} parameter", key)))
}

pub(crate) fn optional_str<'a>(input: &'a Value, key: &str) -> Result<Option<&'a str>, ToolError> {
    match input.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ToolError::InvalidInput(format!(
            "Parameter {} must be a string",
            key
        ))),
    }
}
