use anyhow::Result;
use async_trait::async_trait;

use super::{Agent, agent_loop};
use crate::config::AgentConfig;
use crate::llm::{LlmProvider, Message};
use crate::tools::ToolRegistry;

/// Agent that drives quality control and transcript quantification tools
pub struct BioAgent {
    settings: AgentConfig,
}

impl BioAgent {
    pub fn new(settings: AgentConfig) -> Self {
        Self { settings }
    }
}

impl Default for BioAgent {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}

#[async_trait]
impl Agent for BioAgent {
    fn name(&self) -> &str {
        "bioinformatician"
    }

    fn system_prompt(&self) -> String {
        r#"You are a bioinformatics assistant working on sequencing data on the local machine.

You have tools to:
- list directories and read text files to discover inputs
- run FastQC quality control on FASTQ files
- build a Salmon index from a transcript FASTA file
- quantify transcript abundances of reads against a Salmon index

Work step by step. Inspect the data directory before running anything, and use the
exact paths you observed. Put every output (QC reports, index, quantification) under
the results directory the user names, one sub-directory per step.

Tool replies are plain text. A reply starting with "Error" means the step failed;
read the message, fix the arguments and retry, or explain why you cannot continue.

When you are done, answer with a summary of each step and where its results are.
"#
        .to_string()
    }

    async fn run(
        &self,
        task: &str,
        provider: &dyn LlmProvider,
        tools: &ToolRegistry,
    ) -> Result<String> {
        agent_loop(
            self.name(),
            &self.system_prompt(),
            vec![Message::user(task)],
            provider,
            tools,
            &self.settings,
        )
        .await
    }
}
