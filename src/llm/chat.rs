use anyhow::{Context, Result};
use async_trait::async_trait;
use llm::builder::{FunctionBuilder, LLMBackend, LLMBuilder};
use llm::chat::{ChatMessage, ChatRole, FunctionTool, MessageType, Tool as LlmTool};
use tokio::time::{Duration, timeout};
use tracing::{debug, warn};

use super::{LlmProvider, LlmResponse, Message, MessageRole, ToolCall};
use crate::config::{LlmConfig, ProviderKind};
use crate::error::BiotoolsError;
use crate::tools::Tool;

const API_TIMEOUT_SECS: u64 = 120;

/// Model service reached through the llm crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Anthropic,
    OpenAI,
    Azure {
        endpoint: String,
        api_version: String,
    },
}

impl Backend {
    fn label(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAI => "openai",
            Self::Azure { .. } => "azure",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            Self::Anthropic => "claude-sonnet-4-20250514",
            Self::OpenAI => "gpt-4o",
            Self::Azure { .. } => "gpt-4o-mini",
        }
    }

    fn key_env_var(kind: ProviderKind) -> &'static str {
        match kind {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Azure => "AZURE_OPENAI_API_KEY",
        }
    }
}

/// Read the API key once: from the configured key file when set, otherwise
/// from the provider's environment variable.
pub fn resolve_api_key(config: &LlmConfig) -> Result<String, BiotoolsError> {
    let key = match &config.api_key_file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| {
                BiotoolsError::Config(format!(
                    "failed to read API key file {}: {}",
                    path.display(),
                    e
                ))
            })?
            .trim()
            .to_string(),
        None => {
            let var = Backend::key_env_var(config.provider);
            std::env::var(var)
                .map_err(|_| BiotoolsError::Config(format!("{} environment variable not set", var)))?
        }
    };

    if key.is_empty() {
        return Err(BiotoolsError::Config("API key is empty".to_string()));
    }
    Ok(key)
}

/// Chat provider for Anthropic, OpenAI and Azure OpenAI
pub struct ChatProvider {
    backend: Backend,
    model: String,
    api_key: String,
    max_tokens: u32,
}

impl ChatProvider {
    pub fn new(backend: Backend, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
            api_key: api_key.into(),
            max_tokens: 8192,
        }
    }

    /// Build a provider from configuration. The API key is resolved here and
    /// held for the provider's lifetime.
    pub fn from_config(config: &LlmConfig) -> Result<Self, BiotoolsError> {
        let backend = match config.provider {
            ProviderKind::Anthropic => Backend::Anthropic,
            ProviderKind::OpenAI => Backend::OpenAI,
            ProviderKind::Azure => Backend::Azure {
                endpoint: config.endpoint.clone().ok_or_else(|| {
                    BiotoolsError::Config("azure provider requires llm.endpoint".to_string())
                })?,
                api_version: config.api_version.clone().ok_or_else(|| {
                    BiotoolsError::Config("azure provider requires llm.api_version".to_string())
                })?,
            },
        };

        let model = config
            .model
            .clone()
            .unwrap_or_else(|| backend.default_model().to_string());
        let api_key = resolve_api_key(config)?;

        Ok(Self {
            max_tokens: config.max_tokens,
            ..Self::new(backend, model, api_key)
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    fn builder(&self, system: &str) -> LLMBuilder {
        let builder = LLMBuilder::new()
            .api_key(&self.api_key)
            .model(&self.model)
            .system(system)
            .max_tokens(self.max_tokens);

        match &self.backend {
            Backend::Anthropic => builder.backend(LLMBackend::Anthropic),
            Backend::OpenAI => builder.backend(LLMBackend::OpenAI),
            Backend::Azure {
                endpoint,
                api_version,
            } => builder
                .backend(LLMBackend::AzureOpenAI)
                .base_url(endpoint)
                .api_version(api_version)
                .deployment_id(&self.model),
        }
    }
}

fn to_llm_tool_call(id: &str, name: &str, arguments: String) -> llm::ToolCall {
    llm::ToolCall {
        id: id.to_string(),
        call_type: "function".to_string(),
        function: llm::FunctionCall {
            name: name.to_string(),
            arguments,
        },
    }
}

fn to_chat_messages(messages: &[Message]) -> Vec<ChatMessage> {
    messages
        .iter()
        .filter_map(|msg| match msg.role {
            MessageRole::User => Some(ChatMessage {
                role: ChatRole::User,
                message_type: MessageType::Text,
                content: msg.content.clone(),
            }),
            MessageRole::Assistant if msg.tool_calls.is_empty() => Some(ChatMessage {
                role: ChatRole::Assistant,
                message_type: MessageType::Text,
                content: msg.content.clone(),
            }),
            MessageRole::Assistant => {
                let calls = msg
                    .tool_calls
                    .iter()
                    .map(|tc| to_llm_tool_call(&tc.id, &tc.name, tc.arguments.to_string()))
                    .collect();
                Some(ChatMessage {
                    role: ChatRole::Assistant,
                    message_type: MessageType::ToolUse(calls),
                    content: msg.content.clone(),
                })
            }
            // The result text travels in the arguments slot; the name is unused
            MessageRole::Tool => msg.tool_result.as_ref().map(|result| ChatMessage {
                role: ChatRole::User,
                message_type: MessageType::ToolResult(vec![to_llm_tool_call(
                    &result.tool_call_id,
                    "",
                    result.result.clone(),
                )]),
                content: String::new(),
            }),
        })
        .collect()
}

#[async_trait]
impl LlmProvider for ChatProvider {
    fn name(&self) -> &str {
        self.backend.label()
    }

    async fn chat(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[&dyn Tool],
    ) -> Result<LlmResponse> {
        let llm_tools: Vec<LlmTool> = tools
            .iter()
            .map(|t| LlmTool {
                tool_type: "function".to_string(),
                function: FunctionTool {
                    name: t.name().to_string(),
                    description: t.description().to_string(),
                    parameters: t.schema(),
                },
                cache_control: None,
            })
            .collect();

        // The llm crate fixes tools at build time, so the client is rebuilt per call
        let mut builder = self.builder(system);
        for tool in &llm_tools {
            builder = builder.function(
                FunctionBuilder::new(&tool.function.name)
                    .description(&tool.function.description)
                    .json_schema(tool.function.parameters.clone()),
            );
        }
        let client = builder.build().context("failed to build LLM client")?;

        let chat_messages = to_chat_messages(messages);
        let provider = self.backend.label();
        debug!(provider, model = %self.model, messages = chat_messages.len(), "calling model");

        let api_timeout = Duration::from_secs(API_TIMEOUT_SECS);
        let response = if llm_tools.is_empty() {
            timeout(api_timeout, client.chat(&chat_messages))
                .await
                .with_context(|| {
                    format!("{} API call timed out after {}s", provider, API_TIMEOUT_SECS)
                })?
                .with_context(|| format!("failed to call {} API", provider))?
        } else {
            timeout(
                api_timeout,
                client.chat_with_tools(&chat_messages, Some(&llm_tools)),
            )
            .await
            .with_context(|| format!("{} API call timed out after {}s", provider, API_TIMEOUT_SECS))?
            .with_context(|| format!("failed to call {} API with tools", provider))?
        };

        let content = response.text().unwrap_or_else(|| {
            warn!(provider, "model returned no response text");
            String::new()
        });

        let tool_calls = response
            .tool_calls()
            .map(|calls| {
                calls
                    .iter()
                    .map(|tc| ToolCall {
                        id: tc.id.clone(),
                        name: tc.function.name.clone(),
                        arguments: serde_json::from_str(&tc.function.arguments).unwrap_or_else(
                            |e| {
                                warn!(error = %e, "failed to parse tool call arguments as JSON");
                                serde_json::Value::Null
                            },
                        ),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(LlmResponse {
            message: Message::assistant(content),
            tool_calls,
        })
    }
}
