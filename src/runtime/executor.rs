use anyhow::Result;
use tracing::{error, info};

use crate::agents::Agent;
use crate::llm::LlmProvider;
use crate::tools::ToolRegistry;

/// Runs agents against one tool registry
pub struct Executor {
    tools: ToolRegistry,
}

impl Executor {
    pub fn new(tools: ToolRegistry) -> Self {
        Self { tools }
    }

    /// Run an agent on a goal and return its final answer
    pub async fn run(
        &self,
        agent: &dyn Agent,
        goal: &str,
        provider: &dyn LlmProvider,
    ) -> Result<String> {
        info!(
            agent = agent.name(),
            provider = provider.name(),
            tools = self.tools.len(),
            goal,
            "starting agent execution"
        );

        match agent.run(goal, provider, &self.tools).await {
            Ok(answer) => {
                info!(agent = agent.name(), "agent execution completed");
                Ok(answer)
            }
            Err(e) => {
                error!(agent = agent.name(), error = %e, "agent execution failed");
                Err(e)
            }
        }
    }
}
