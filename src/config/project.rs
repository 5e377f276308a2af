use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::BinaryConfig;
use crate::error::BiotoolsError;

/// File picked up from the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "biotools.toml";

/// Run-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model access
    #[serde(default)]
    pub llm: LlmConfig,

    /// Agent loop limits
    #[serde(default)]
    pub agent: AgentConfig,

    /// External executables
    #[serde(default)]
    pub binaries: BinaryConfig,
}

impl Config {
    /// Parse a configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, BiotoolsError> {
        toml::from_str(text).map_err(|e| BiotoolsError::Config(e.to_string()))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `biotools.toml` in the
    /// working directory is used if present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, BiotoolsError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    debug!("no config file found, using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|e| {
            BiotoolsError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_toml(&text)
    }
}

/// Which model service to talk to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Anthropic,
    OpenAI,
    #[default]
    Azure,
}

impl std::str::FromStr for ProviderKind {
    type Err = BiotoolsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAI),
            "azure" => Ok(Self::Azure),
            other => Err(BiotoolsError::Config(format!("unknown provider: {}", other))),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anthropic => write!(f, "anthropic"),
            Self::OpenAI => write!(f, "openai"),
            Self::Azure => write!(f, "azure"),
        }
    }
}

/// Model access settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    /// Model name (deployment id for Azure); provider default when unset
    #[serde(default)]
    pub model: Option<String>,

    /// Service endpoint, required for Azure
    #[serde(default)]
    pub endpoint: Option<String>,

    /// API version, required for Azure
    #[serde(default)]
    pub api_version: Option<String>,

    /// File holding the API key. Falls back to the provider's environment
    /// variable when unset.
    #[serde(default)]
    pub api_key_file: Option<PathBuf>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_max_tokens() -> u32 {
    8192
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: None,
            endpoint: None,
            api_version: None,
            api_key_file: None,
            max_tokens: default_max_tokens(),
        }
    }
}

/// Agent loop limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum number of tool rounds before a final answer is forced
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Re-plan every N steps; `None` or 0 disables planning
    #[serde(default = "default_planning_interval")]
    pub planning_interval: Option<usize>,
}

fn default_max_steps() -> usize {
    10
}

fn default_planning_interval() -> Option<usize> {
    Some(1)
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            planning_interval: default_planning_interval(),
        }
    }
}
