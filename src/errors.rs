// Error types and user-friendly error messages
//
// ToolError is the taxonomy for everything that can go wrong inside a tool.
// The helpers below turn configuration problems into actionable messages.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Failure inside the sandboxed tool layer.
///
/// Never escapes the dispatcher: it is rendered into the tool result text so
/// the model can see it and adapt.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Path escapes the working directory: {0}")]
    PathEscape(String),

    #[error("{context}: {message}")]
    ExecutionFailure { context: String, message: String },

    #[error("{context}: timed out after {}s", .timeout.as_secs())]
    Timeout { context: String, timeout: Duration },

    #[error("Unknown function: {0}")]
    UnknownTool(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ToolError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Text fed back into the conversation for this error
    pub fn to_result_text(&self) -> String {
        format!("Error: {}", self)
    }
}

/// Format a missing API key error with helpful suggestions
pub fn api_key_missing_error() -> String {
    "Gemini API key is missing\n\n\
    \x1b[1;33mPossible causes:\x1b[0m\n\
    • GEMINI_API_KEY is not exported\n\
    • api_key is not set in ~/.genagent/config.toml\n\n\
    \x1b[1;32mTry:\x1b[0m\n\
    1. Export the key for this shell:\n\
       \x1b[36mexport GEMINI_API_KEY=\"AI...\"\x1b[0m\n\n\
    2. Or add it to your config file:\n\
       \x1b[36mecho 'api_key = \"AI...\"' >> ~/.genagent/config.toml\x1b[0m\n\n\
    3. Get a key:\n\
       • https://aistudio.google.com/app/apikey"
        .to_string()
}

/// Format a bad working directory error with helpful suggestions
pub fn working_dir_error(path: &str) -> String {
    format!(
        "Working directory is not usable: {}\n\n\
        \x1b[1;33mPossible causes:\x1b[0m\n\
        • Directory does not exist\n\
        • Path points to a file\n\
        • Permissions issue\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Check the directory:\n\
           \x1b[36mls -ld {}\x1b[0m\n\n\
        2. Create it:\n\
           \x1b[36mmkdir -p {}\x1b[0m",
        path, path, path
    )
}

/// Wrap a generic error with suggestions
pub fn wrap_error_with_suggestion(error: impl fmt::Display, suggestion: &str) -> String {
    format!(
        "{}\n\n\
        \x1b[1;33mSuggestion:\x1b[0m {}",
        error, suggestion
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_text_is_prefixed() {
        let err = ToolError::NotFound("The file is not found or not a file: a.txt".to_string());
        assert_eq!(
            err.to_result_text(),
            "Error: The file is not found or not a file: a.txt"
        );
    }

    #[test]
    fn test_unknown_tool_message() {
        let err = ToolError::UnknownTool("delete_everything".to_string());
        assert_eq!(err.to_string(), "Unknown function: delete_everything");
    }

    #[test]
    fn test_timeout_message() {
        let err = ToolError::Timeout {
            context: "There is an error running the script slow.py".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert!(err.to_string().ends_with("timed out after 30s"));
    }

    #[test]
    fn test_api_key_missing_has_suggestions() {
        let msg = api_key_missing_error();
        assert!(msg.contains("GEMINI_API_KEY"));
        assert!(msg.contains("config.toml"));
    }

    #[test]
    fn test_working_dir_error_mentions_path() {
        let msg = working_dir_error("/nope");
        assert!(msg.contains("/nope"));
        assert!(msg.contains("mkdir -p"));
    }
}
