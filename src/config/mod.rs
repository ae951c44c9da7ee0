// Configuration module
// Public interface for configuration loading

mod loader;
mod settings;

pub use loader::{load_config, resolve_config, ConfigOverrides, FileConfig};
pub use settings::{
    Config, RetryConfig, ScriptConfig, DEFAULT_BASE_URL, DEFAULT_FILE_READ_MAX_SIZE,
    DEFAULT_MAX_ITERATIONS, DEFAULT_MODEL,
};
