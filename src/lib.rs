// genagent - Gemini-driven command-line agent
// Library exports

// Core modules
pub mod agent; // Conversation driver and retry policy
pub mod cli;
pub mod config;
pub mod errors;
pub mod providers; // Remote model access (Gemini)
pub mod tools; // Sandboxed tool execution system
