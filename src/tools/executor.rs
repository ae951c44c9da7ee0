// Tool execution engine
//
// Dispatches model-issued function calls to registered tools. Nothing raised
// by a tool escapes: every call produces a ToolResult.

use crate::errors::ToolError;
use crate::tools::registry::ToolRegistry;
use crate::tools::types::{ToolCall, ToolDefinition, ToolResult};
use tracing::{debug, info, instrument, warn};

/// Tool executor - the dispatcher between the model and the tools
pub struct ToolExecutor {
    registry: ToolRegistry,
    verbose: bool,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry, verbose: bool) -> Self {
        Self { registry, verbose }
    }

    /// Execute a single function call.
    ///
    /// Unknown tool names come back as an error result. Tool failures are
    /// already text ("Error: ...") and come back as a normal result.
    #[instrument(skip(self, call), fields(tool = %call.name))]
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        if self.verbose {
            println!(" - Calling function: {}({})", call.name, call.args);
        } else {
            println!(" - Calling function: {}", call.name);
        }

        let Some(tool) = self.registry.get(&call.name) else {
            warn!("Model requested an unregistered tool");
            return ToolResult::error(
                call.name.clone(),
                ToolError::UnknownTool(call.name.clone()).to_string(),
            );
        };

        match tool.execute(call.args.clone()).await {
            Ok(output) => {
                info!("Tool executed successfully");
                ToolResult::success(call.name.clone(), output)
            }
            Err(e) => {
                debug!(error = %e, "Tool reported an error");
                ToolResult::success(call.name.clone(), e.to_result_text())
            }
        }
    }

    /// Execute function calls strictly in order, one at a time
    pub async fn dispatch_all(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        info!("Executing {} tool(s)", calls.len());

        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.dispatch(call).await);
        }
        results
    }

    /// Declarations for every registered tool
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    /// Get reference to registry
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}
