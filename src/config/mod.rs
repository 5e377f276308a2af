mod binaries;
mod project;

pub use binaries::BinaryConfig;
pub use project::{AgentConfig, Config, DEFAULT_CONFIG_FILE, LlmConfig, ProviderKind};
