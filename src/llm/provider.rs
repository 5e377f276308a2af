use anyhow::Result;
use async_trait::async_trait;

use super::{Message, ToolCall};
use crate::tools::Tool;

/// Response from an LLM
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub message: Message,
    /// Tool calls requested by the LLM; empty when the model answered in text
    pub tool_calls: Vec<ToolCall>,
}

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the conversation and the offered tools, get the next turn back.
    /// An empty `tools` slice asks for a plain text answer.
    async fn chat(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[&dyn Tool],
    ) -> Result<LlmResponse>;

    fn name(&self) -> &str;
}
