mod chat;
mod message;
mod provider;

pub use chat::{Backend, ChatProvider, resolve_api_key};
pub use message::{Message, MessageRole, ToolCall, ToolResult};
pub use provider::{LlmProvider, LlmResponse};
