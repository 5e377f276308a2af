use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::error;

use super::{Tool, required_str, string_params_schema};
use crate::inspect;

/// Tool for listing the immediate children of a directory
pub struct ListDirectoryTool;

#[async_trait]
impl Tool for ListDirectoryTool {
    fn name(&self) -> &str {
        "list_directory"
    }

    fn description(&self) -> &str {
        "List files and directories within a specified directory path. \
         Files are listed first, directories end with '/'."
    }

    fn schema(&self) -> Value {
        string_params_schema(&[("directory_path", "Path to the directory to read")])
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let outcome = match required_str(&params, "directory_path") {
            Ok(path) => inspect::list_directory(path)
                .await
                .map(|listing| listing.to_string())
                .map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };

        Ok(outcome.unwrap_or_else(|e| {
            error!(tool = self.name(), error = %e, "listing failed");
            format!("Error listing directory: {}", e)
        }))
    }
}

/// Tool for reading a whole text file
pub struct ReadFileLinesTool;

#[async_trait]
impl Tool for ReadFileLinesTool {
    fn name(&self) -> &str {
        "read_file_lines"
    }

    fn description(&self) -> &str {
        "Read lines from a specified file."
    }

    fn schema(&self) -> Value {
        string_params_schema(&[("file_path", "Path to the file to read")])
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let outcome = match required_str(&params, "file_path") {
            Ok(path) => inspect::read_file(path)
                .await
                .map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };

        Ok(outcome.unwrap_or_else(|e| {
            error!(tool = self.name(), error = %e, "read failed");
            format!("Error reading file: {}", e)
        }))
    }
}
