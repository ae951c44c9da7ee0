// Directory listing tool - non-recursive listing with sizes

use super::optional_str;
use crate::errors::ToolError;
use crate::tools::registry::Tool;
use crate::tools::sandbox::Sandbox;
use crate::tools::types::ToolInputSchema;
use async_trait::async_trait;
use serde_json::Value;

pub struct ListDirectoryTool {
    sandbox: Sandbox,
}

impl ListDirectoryTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for ListDirectoryTool {
    fn name(&self) -> &str {
        "get_directory_info"
    }

    fn description(&self) -> &str {
        "Lists files in the specified directory along with their sizes, constrained to the working directory."
    }

    fn input_schema(&self) -> ToolInputSchema {
        ToolInputSchema::empty().with_string(
            "directory",
            "The directory to list files from, relative to the working directory. If not provided, lists files in the working directory itself.",
            false,
        )
    }

    async fn execute(&self, input: Value) -> Result<String, ToolError> {
        let directory = optional_str(&input, "directory")?.unwrap_or(".");
        let path = self.sandbox.resolve(directory)?;

        if !path.is_dir() {
            return Err(ToolError::NotFound(format!(
                "The directory is not found or not a directory: {}",
                directory
            )));
        }

        let read_error =
            |e| ToolError::io(format!("There is an error reading the directory {}", directory), e);

        let mut entries = tokio::fs::read_dir(&path).await.map_err(read_error)?;
        let mut lines = Vec::new();

        // Filesystem enumeration order, not sorted
        while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
            let name = entry.file_name().to_string_lossy().into_owned();
            // Follow symlinks; fall back to the link itself when dangling
            let metadata = match tokio::fs::metadata(entry.path()).await {
                Ok(metadata) => metadata,
                Err(_) => entry.metadata().await.map_err(read_error)?,
            };
            let is_dir = metadata.is_dir();
            let file_size = if is_dir { 0 } else { metadata.len() };
            lines.push(format!(
                "- {}: file_size={} bytes, is_dir={}",
                name, file_size, is_dir
            ));
        }

        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tool() -> (TempDir, ListDirectoryTool) {
        let dir = TempDir::new().unwrap();
        let sandbox = Sandbox::new(dir.path()).unwrap();
        (dir, ListDirectoryTool::new(sandbox))
    }

    #[tokio::test]
    async fn test_list_reports_sizes_and_kinds() {
        let (dir, tool) = tool();
        fs::write(dir.path().join("a"), "0123456789").unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b/inner.txt"), "not counted").unwrap();

        let result = tool.execute(serde_json::json!({})).await.unwrap();
        let mut lines: Vec<&str> = result.lines().collect();
        lines.sort();

        assert_eq!(
            lines,
            vec![
                "- a: file_size=10 bytes, is_dir=false",
                "- b: file_size=0 bytes, is_dir=true",
            ]
        );
    }

    #[tokio::test]
    async fn test_list_subdirectory() {
        let (dir, tool) = tool();
        fs::create_dir(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg/calc.py"), "x = 1").unwrap();

        let result = tool
            .execute(serde_json::json!({"directory": "pkg"}))
            .await
            .unwrap();
        assert_eq!(result, "- calc.py: file_size=5 bytes, is_dir=false");
    }

    #[tokio::test]
    async fn test_list_empty_directory() {
        let (_dir, tool) = tool();
        let result = tool
            .execute(serde_json::json!({"directory": "."}))
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_list_file_is_not_found() {
        let (dir, tool) = tool();
        fs::write(dir.path().join("a.txt"), "x").unwrap();

        let err = tool
            .execute(serde_json::json!({"directory": "a.txt"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_outside_rejected() {
        let (_dir, tool) = tool();
        let err = tool
            .execute(serde_json::json!({"directory": "../"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::PathEscape(_)));
    }
}
