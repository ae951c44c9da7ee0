// Write tool - creates or overwrites files in the working directory

use super::required_str;
use crate::errors::ToolError;
use crate::tools::registry::Tool;
use crate::tools::sandbox::Sandbox;
use crate::tools::types::ToolInputSchema;
use async_trait::async_trait;
use serde_json::Value;

pub struct WriteFileTool {
    sandbox: Sandbox,
}

impl WriteFileTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Writes content to a file within the working directory. Creates the file if it doesn't exist."
    }

    fn input_schema(&self) -> ToolInputSchema {
        ToolInputSchema::simple(vec![
            (
                "file_path",
                "Path to the file to write, relative to the working directory.",
            ),
            ("content", "Content to write to the file"),
        ])
    }

    async fn execute(&self, input: Value) -> Result<String, ToolError> {
        let file_path = required_str(&input, "file_path")?;
        let content = required_str(&input, "content")?;
        let path = self.sandbox.resolve(file_path)?;

        // Checked before any directory is created
        if path.is_dir() {
            return Err(ToolError::Conflict(format!(
                "The file is a directory: {}",
                file_path
            )));
        }

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    ToolError::io(
                        format!("There is an error creating the directory {}", file_path),
                        e,
                    )
                })?;
            }
        }

        tokio::fs::write(&path, content).await.map_err(|e| {
            ToolError::io(format!("There is an error writing the file {}", file_path), e)
        })?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote file");

        Ok(format!(
            "Successfully wrote file \"{}\". ({} characters written)",
            file_path,
            content.chars().count()
        ))
    }
}
