// Configuration loader
// Merges ~/.genagent/config.toml, environment variables and CLI flags

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::{Config, RetryConfig, ScriptConfig};
use crate::errors::{api_key_missing_error, working_dir_error};

/// Contents of ~/.genagent/config.toml. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub file_read_max_size: Option<usize>,
    pub max_iterations: Option<usize>,
    pub script: Option<ScriptConfig>,
    pub retry: Option<RetryConfig>,
}

/// Values taken from the command line; these win over everything else
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub working_dir: PathBuf,
    pub model: Option<String>,
    pub verbose: bool,
}

/// Load configuration from the config file, environment and CLI flags
pub fn load_config(overrides: ConfigOverrides) -> Result<Config> {
    let file = try_load_config_file()?.unwrap_or_default();
    resolve_config(file, |key| std::env::var(key).ok(), overrides)
}

fn try_load_config_file() -> Result<Option<FileConfig>> {
    let Some(home) = dirs::home_dir() else {
        return Ok(None);
    };
    let config_path = home.join(".genagent/config.toml");

    if !config_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    let file: FileConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "Loaded config file");
    Ok(Some(file))
}

/// Merge the three configuration sources.
///
/// Precedence: CLI flag > environment variable > config file > default.
pub fn resolve_config<F>(file: FileConfig, env: F, overrides: ConfigOverrides) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let api_key = match non_empty("GEMINI_API_KEY").or(file.api_key) {
        Some(key) => key,
        None => bail!(api_key_missing_error()),
    };

    let working_dir = canonical_working_dir(&overrides.working_dir)?;
    let mut config = Config::new(api_key, working_dir);

    if let Some(model) = overrides
        .model
        .or_else(|| non_empty("GEMINI_AI_MODEL"))
        .or(file.model)
    {
        config.model = model;
    }

    if let Some(base_url) = non_empty("GEMINI_BASE_URL").or(file.base_url) {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }

    if let Some(raw) = non_empty("FILE_READ_MAX_SIZE") {
        config.file_read_max_size = raw
            .trim()
            .parse()
            .with_context(|| format!("FILE_READ_MAX_SIZE must be a positive integer, got {:?}", raw))?;
    } else if let Some(size) = file.file_read_max_size {
        config.file_read_max_size = size;
    }

    if let Some(max_iterations) = file.max_iterations {
        config.max_iterations = max_iterations;
    }
    if let Some(script) = file.script {
        config.script = script;
    }
    if let Some(retry) = file.retry {
        config.retry = retry;
    }
    config.verbose = overrides.verbose;

    if config.file_read_max_size == 0 {
        bail!("file_read_max_size must be greater than zero");
    }
    if config.max_iterations == 0 {
        bail!("max_iterations must be greater than zero");
    }

    Ok(config)
}

fn canonical_working_dir(path: &Path) -> Result<PathBuf> {
    let canonical = path
        .canonicalize()
        .with_context(|| working_dir_error(&path.display().to_string()))?;
    if !canonical.is_dir() {
        bail!(working_dir_error(&path.display().to_string()));
    }
    Ok(canonical)
}
