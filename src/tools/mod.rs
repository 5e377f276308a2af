mod bio;
mod fs;
mod registry;

pub use bio::{FastqcTool, SalmonIndexTool, SalmonQuantTool};
pub use fs::{ListDirectoryTool, ReadFileLinesTool};
pub use registry::ToolRegistry;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value, json};

/// A tool that can be executed by an agent or a remote caller
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool
    fn name(&self) -> &str;

    /// A description of what this tool does
    fn description(&self) -> &str;

    /// JSON schema for the tool's parameters
    fn schema(&self) -> Value;

    /// Execute the tool with the given parameters
    async fn execute(&self, params: Value) -> Result<String>;
}

/// Build an object schema where every listed parameter is a required string
fn string_params_schema(params: &[(&str, &str)]) -> Value {
    let properties: Map<String, Value> = params
        .iter()
        .map(|(name, description)| {
            (
                name.to_string(),
                json!({ "type": "string", "description": description }),
            )
        })
        .collect();
    let required: Vec<&str> = params.iter().map(|(name, _)| *name).collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn required_str<'a>(params: &'a Value, key: &str) -> Result<&'a str> {
    params[key]
        .as_str()
        .with_context(|| format!("missing '{}' parameter", key))
}
