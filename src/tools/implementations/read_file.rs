// Read tool - reads file contents from the working directory

use super::required_str;
use crate::errors::ToolError;
use crate::tools::registry::Tool;
use crate::tools::sandbox::Sandbox;
use crate::tools::types::ToolInputSchema;
use async_trait::async_trait;
use serde_json::Value;
use std::io;
use tokio::io::AsyncReadExt;

pub struct ReadFileTool {
    sandbox: Sandbox,
    max_chars: usize,
    description: String,
}

impl ReadFileTool {
    pub fn new(sandbox: Sandbox, max_chars: usize) -> Self {
        let description = format!(
            "Reads and returns the first {} characters of the content from a specified file within the working directory.",
            max_chars
        );
        Self {
            sandbox,
            max_chars,
            description,
        }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "get_file_content"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> ToolInputSchema {
        ToolInputSchema::simple(vec![(
            "file_path",
            "The path to the file whose content should be read, relative to the working directory.",
        )])
    }

    async fn execute(&self, input: Value) -> Result<String, ToolError> {
        let file_path = required_str(&input, "file_path")?;
        let path = self.sandbox.resolve(file_path)?;

        if !path.is_file() {
            return Err(ToolError::NotFound(format!(
                "The file is not found or not a file: {}",
                file_path
            )));
        }

        let read_error =
            |e| ToolError::io(format!("There is an error reading the file {}", file_path), e);

        // At most 4 bytes per char, plus one more char to detect truncation
        let limit = (self.max_chars as u64).saturating_add(1).saturating_mul(4);
        let file = tokio::fs::File::open(&path).await.map_err(read_error)?;
        let mut prefix = Vec::new();
        file.take(limit)
            .read_to_end(&mut prefix)
            .await
            .map_err(read_error)?;

        truncate_prefix(&prefix, self.max_chars, file_path).map_err(read_error)
    }
}

/// Decode the first `max_chars` characters of `prefix` and append the
/// truncation marker when anything was cut.
///
/// Bytes past the first `max_chars` characters are never decoded.
fn truncate_prefix(prefix: &[u8], max_chars: usize, file_path: &str) -> io::Result<String> {
    let (valid, fully_valid) = match std::str::from_utf8(prefix) {
        Ok(text) => (text, true),
        Err(e) => {
            let (head, _) = prefix.split_at(e.valid_up_to());
            // valid_up_to guarantees this slice is UTF-8
            (std::str::from_utf8(head).unwrap_or_default(), false)
        }
    };

    match valid.char_indices().nth(max_chars) {
        Some((cut, _)) => Ok(truncated(&valid[..cut], file_path, max_chars)),
        // Undecodable bytes start exactly after the limit
        None if !fully_valid && valid.chars().count() == max_chars => {
            Ok(truncated(valid, file_path, max_chars))
        }
        None if !fully_valid => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "stream did not contain valid UTF-8",
        )),
        None => Ok(valid.to_string()),
    }
}

fn truncated(kept: &str, file_path: &str, max_chars: usize) -> String {
    format!(
        "{}[...File {} is truncated at {} characters]",
        kept, file_path, max_chars
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tool(max_chars: usize) -> (TempDir, ReadFileTool) {
        let dir = TempDir::new().unwrap();
        let sandbox = Sandbox::new(dir.path()).unwrap();
        (dir, ReadFileTool::new(sandbox, max_chars))
    }

    #[tokio::test]
    async fn test_read_small_file_exact() {
        let (dir, tool) = tool(1000);
        fs::write(dir.path().join("lorem.txt"), "wait, this isn't lorem ipsum").unwrap();

        let result = tool
            .execute(serde_json::json!({"file_path": "lorem.txt"}))
            .await
            .unwrap();
        assert_eq!(result, "wait, this isn't lorem ipsum");
    }

    #[tokio::test]
    async fn test_read_exactly_limit_not_truncated() {
        let (dir, tool) = tool(5);
        fs::write(dir.path().join("five.txt"), "12345").unwrap();

        let result = tool
            .execute(serde_json::json!({"file_path": "five.txt"}))
            .await
            .unwrap();
        assert_eq!(result, "12345");
    }

    #[tokio::test]
    async fn test_read_large_file_truncated() {
        let (dir, tool) = tool(10);
        fs::create_dir(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg/big.txt"), "abcdefghijklmnopqrstuvwxyz").unwrap();

        let result = tool
            .execute(serde_json::json!({"file_path": "pkg/big.txt"}))
            .await
            .unwrap();
        assert_eq!(
            result,
            "abcdefghij[...File pkg/big.txt is truncated at 10 characters]"
        );
    }

    #[tokio::test]
    async fn test_truncation_counts_characters() {
        let (dir, tool) = tool(3);
        fs::write(dir.path().join("utf8.txt"), "héllo").unwrap();

        let result = tool
            .execute(serde_json::json!({"file_path": "utf8.txt"}))
            .await
            .unwrap();
        assert!(result.starts_with("hél[...File utf8.txt"));
    }

    #[tokio::test]
    async fn test_bytes_past_limit_are_not_decoded() {
        let (dir, tool) = tool(5);
        let mut bytes = b"0123456789".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, 0xfd]);
        fs::write(dir.path().join("log.txt"), bytes).unwrap();

        let result = tool
            .execute(serde_json::json!({"file_path": "log.txt"}))
            .await
            .unwrap();
        assert_eq!(result, "01234[...File log.txt is truncated at 5 characters]");
    }

    #[tokio::test]
    async fn test_invalid_bytes_right_after_limit() {
        let (dir, tool) = tool(3);
        fs::write(dir.path().join("bin.dat"), [b'a', b'b', b'c', 0xff]).unwrap();

        let result = tool
            .execute(serde_json::json!({"file_path": "bin.dat"}))
            .await
            .unwrap();
        assert_eq!(result, "abc[...File bin.dat is truncated at 3 characters]");
    }

    #[tokio::test]
    async fn test_invalid_bytes_within_limit_is_error() {
        let (dir, tool) = tool(100);
        fs::write(dir.path().join("bin.dat"), [b'a', 0xff, b'b']).unwrap();

        let err = tool
            .execute(serde_json::json!({"file_path": "bin.dat"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Io { .. }));
        assert!(err.to_string().contains("There is an error reading the file bin.dat"));
    }

    #[tokio::test]
    async fn test_large_file_reads_only_prefix() {
        let (dir, tool) = tool(10);
        fs::write(dir.path().join("big.log"), "x".repeat(1_000_000)).unwrap();

        let result = tool
            .execute(serde_json::json!({"file_path": "big.log"}))
            .await
            .unwrap();
        assert_eq!(
            result,
            format!("{}[...File big.log is truncated at 10 characters]", "x".repeat(10))
        );
    }

    #[tokio::test]
    async fn test_read_nonexistent_file() {
        let (_dir, tool) = tool(1000);
        let err = tool
            .execute(serde_json::json!({"file_path": "missing.txt"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_read_directory_is_not_found() {
        let (dir, tool) = tool(1000);
        fs::create_dir(dir.path().join("pkg")).unwrap();
        let err = tool
            .execute(serde_json::json!({"file_path": "pkg"}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not a file: pkg"));
    }

    #[tokio::test]
    async fn test_read_outside_rejected() {
        let (_dir, tool) = tool(1000);
        let err = tool
            .execute(serde_json::json!({"file_path": "../../etc/passwd"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::PathEscape(_)));
    }

    #[tokio::test]
    async fn test_read_requires_file_path() {
        let (_dir, tool) = tool(1000);
        let err = tool.execute(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }
}
