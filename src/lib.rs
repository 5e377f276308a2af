pub mod agents;
pub mod config;
pub mod error;
pub mod inspect;
pub mod llm;
pub mod process;
pub mod runtime;
pub mod server;
pub mod tools;

pub use agents::{Agent, BioAgent};
pub use config::{AgentConfig, BinaryConfig, Config, LlmConfig, ProviderKind};
pub use error::BiotoolsError;
pub use inspect::DirectoryListing;
pub use llm::{
    Backend, ChatProvider, LlmProvider, LlmResponse, Message, MessageRole, ToolCall, ToolResult,
};
pub use process::{InvocationResult, ProcessRunner};
pub use runtime::Executor;
pub use server::{BiotoolsServer, serve_stdio};
pub use tools::{
    FastqcTool, ListDirectoryTool, ReadFileLinesTool, SalmonIndexTool, SalmonQuantTool, Tool,
    ToolRegistry,
};
