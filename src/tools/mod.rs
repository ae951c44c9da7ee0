// Tool execution system
//
// Lets the model read, write, list and run files inside the working
// directory. Every path goes through the sandbox resolver.

pub mod executor;
pub mod implementations;
pub mod registry;
pub mod sandbox;
pub mod types;

pub use executor::ToolExecutor;
pub use implementations::builtin_registry;
pub use registry::{Tool, ToolRegistry};
pub use sandbox::Sandbox;
pub use types::{ToolCall, ToolDefinition, ToolInputSchema, ToolResult};
