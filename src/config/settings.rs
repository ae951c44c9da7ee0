// Configuration structs

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-001";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_FILE_READ_MAX_SIZE: usize = 1000;
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key
    pub api_key: String,

    /// Model name (e.g. "gemini-2.0-flash-001")
    pub model: String,

    /// Gemini REST base URL, without trailing slash
    pub base_url: String,

    /// Sandbox root; canonical absolute path
    pub working_dir: PathBuf,

    /// Maximum characters returned by the read tool (default: 1000)
    pub file_read_max_size: usize,

    /// Maximum model rounds per user prompt (default: 20)
    pub max_iterations: usize,

    /// Print tool arguments and token counts
    pub verbose: bool,

    pub script: ScriptConfig,

    pub retry: RetryConfig,
}

/// How the run-script tool launches scripts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Interpreter binary, looked up on PATH
    pub interpreter: String,

    /// Required file extension, without the dot
    pub extension: String,

    /// Wall-clock limit per invocation
    pub timeout_secs: u64,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            extension: "py".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Backoff settings for failed remote calls
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub initial_backoff_secs: u64,
    pub max_backoff_secs: u64,
    pub max_retries: u32,
    /// Ignore `max_retries` and keep retrying until the call succeeds
    pub retry_forever: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_backoff_secs: 10,
            max_backoff_secs: 160,
            max_retries: 5,
            retry_forever: false,
        }
    }
}

impl Config {
    /// Config with defaults for everything except the key and sandbox root
    pub fn new(api_key: String, working_dir: PathBuf) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            working_dir,
            file_read_max_size: DEFAULT_FILE_READ_MAX_SIZE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            verbose: false,
            script: ScriptConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}
