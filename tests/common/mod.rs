#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use biotools::{BinaryConfig, LlmProvider, LlmResponse, Message, ToolCall, ToolRegistry};

/// One recorded `chat` call: how many tools were offered and the last message
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub tools_offered: usize,
    pub last_message: String,
}

/// A mock LLM provider that replays scripted responses in order.
///
/// Like the hosted backends, it rejects a request whose history holds tool
/// calls or tool results but which defines no tools.
pub struct MockLlmProvider {
    responses: Mutex<VecDeque<LlmResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLlmProvider {
    /// Create a mock that returns a single text response with no tool calls.
    pub fn single_response(text: &str) -> Self {
        Self::with_responses(vec![text_response(text)])
    }

    /// Create a mock from a sequence of responses (popped in order).
    pub fn with_responses(responses: Vec<LlmResponse>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(responses)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn chat(
        &self,
        _system: &str,
        messages: &[Message],
        tools: &[&dyn biotools::Tool],
    ) -> Result<LlmResponse> {
        let has_tool_history = messages
            .iter()
            .any(|m| !m.tool_calls.is_empty() || m.tool_result.is_some());
        if has_tool_history && tools.is_empty() {
            anyhow::bail!("MockLlmProvider: request carries tool history but offers no tools");
        }

        let last_message = messages
            .last()
            .map(|m| match &m.tool_result {
                Some(result) => result.result.clone(),
                None => m.content.clone(),
            })
            .unwrap_or_default();
        self.calls.lock().unwrap().push(RecordedCall {
            tools_offered: tools.len(),
            last_message,
        });

        let mut queue = self.responses.lock().unwrap();
        queue
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("MockLlmProvider: no more responses in queue"))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

pub fn text_response(text: &str) -> LlmResponse {
    LlmResponse {
        message: Message::assistant(text),
        tool_calls: vec![],
    }
}

pub fn tool_response(text: &str, name: &str, arguments: serde_json::Value) -> LlmResponse {
    LlmResponse {
        message: Message::assistant(text),
        tool_calls: vec![ToolCall {
            id: "call_1".to_string(),
            name: name.to_string(),
            arguments,
        }],
    }
}

/// The real registry with `ls` standing in for both external binaries, so
/// calls on missing paths fail the way the real tools do.
pub fn create_test_tool_registry() -> ToolRegistry {
    ToolRegistry::bioinformatics(&BinaryConfig {
        fastqc: "ls".to_string(),
        salmon: "ls".to_string(),
    })
}
