// Script tool - runs a script from the working directory under an interpreter

use super::required_str;
use crate::config::ScriptConfig;
use crate::errors::ToolError;
use crate::tools::registry::Tool;
use crate::tools::sandbox::Sandbox;
use crate::tools::types::ToolInputSchema;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

pub struct RunScriptTool {
    sandbox: Sandbox,
    interpreter: String,
    extension: String,
    timeout: Duration,
    description: String,
}

impl RunScriptTool {
    pub fn new(sandbox: Sandbox, config: &ScriptConfig) -> Self {
        let description = format!(
            "Executes a .{} file within the working directory with {} and returns the output from the interpreter.",
            config.extension, config.interpreter
        );
        Self {
            sandbox,
            interpreter: config.interpreter.clone(),
            extension: config.extension.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            description,
        }
    }
}

#[async_trait]
impl Tool for RunScriptTool {
    fn name(&self) -> &str {
        "run_script"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> ToolInputSchema {
        ToolInputSchema::empty()
            .with_string(
                "file_path",
                "Path to the script to execute, relative to the working directory.",
                true,
            )
            .with_string_array(
                "args",
                "Optional arguments to pass to the script.",
                false,
            )
    }

    async fn execute(&self, input: Value) -> Result<String, ToolError> {
        let file_path = required_str(&input, "file_path")?;
        let args = script_args(&input)?;
        let path = self.sandbox.resolve(file_path)?;

        if path.is_dir() {
            return Err(ToolError::NotFound(format!(
                "The file is a directory: {}",
                file_path
            )));
        }
        if !path.is_file() {
            return Err(ToolError::NotFound(format!(
                "The file is not found: {}",
                file_path
            )));
        }
        if Path::new(file_path).extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
            return Err(ToolError::InvalidInput(format!(
                "The file is not a .{} file: {}",
                self.extension, file_path
            )));
        }

        let context = format!("There is an error running the script {}", file_path);

        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(&path)
            .args(&args)
            .current_dir(self.sandbox.root())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        tracing::debug!(
            interpreter = %self.interpreter,
            script = %path.display(),
            ?args,
            "Spawning script"
        );

        // Dropping the output future on timeout kills the child
        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ToolError::ExecutionFailure {
                    context,
                    message: e.to_string(),
                })
            }
            Err(_) => {
                tracing::warn!(script = file_path, "Script timed out");
                return Err(ToolError::Timeout {
                    context,
                    timeout: self.timeout,
                });
            }
        };

        Ok(format_output(&output))
    }
}

fn script_args(input: &Value) -> Result<Vec<String>, ToolError> {
    match input.get("args") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                // Models sometimes send numbers for numeric arguments
                Value::Number(n) => Ok(n.to_string()),
                _ => Err(ToolError::InvalidInput(
                    "Parameter args must be a list of strings".to_string(),
                )),
            })
            .collect(),
        Some(_) => Err(ToolError::InvalidInput(
            "Parameter args must be a list of strings".to_string(),
        )),
    }
}

fn format_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let mut sections = Vec::new();

    if !stdout.is_empty() {
        sections.push(format!("stdout: {}", stdout));
    }
    if !stderr.is_empty() {
        sections.push(format!("stderr: {}", stderr));
    }

    match output.status.code() {
        Some(0) => {}
        Some(code) => sections.push(format!("Process exited with return code {}", code)),
        None => sections.push("Process was terminated by a signal".to_string()),
    }

    if sections.is_empty() {
        "No output from the script.".to_string()
    } else {
        sections.join("\n")
    }
}
