use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info, warn};

use super::{Tool, required_str, string_params_schema};
use crate::process::{InvocationResult, ProcessRunner};

const FASTQC_FAILED: &str = "Error running FastQC: ";
const INDEX_FAILED: &str = "Error creating Salmon index: ";
const QUANT_FAILED: &str = "Error running Salmon quantification: ";

/// Turn a finished process into the reply text: the success message on a zero
/// exit status, otherwise the failure prefix followed by captured stderr.
fn report(
    tool: &str,
    result: InvocationResult,
    success: impl FnOnce() -> String,
    failure_prefix: &str,
) -> String {
    if result.success() {
        info!(tool, "external tool succeeded");
        success()
    } else {
        warn!(tool, exit_status = result.exit_status, "external tool failed");
        format!("{}{}", failure_prefix, result.stderr)
    }
}

/// Errors never leave a tool: they become reply text
fn contain(tool: &str, failure_prefix: &str, outcome: Result<String>) -> String {
    outcome.unwrap_or_else(|e| {
        error!(tool, error = %e, "tool invocation failed");
        format!("{}{}", failure_prefix, e)
    })
}

/// Quality control of a FASTQ file with FastQC
pub struct FastqcTool {
    runner: Arc<ProcessRunner>,
}

impl FastqcTool {
    pub fn new(runner: Arc<ProcessRunner>) -> Self {
        Self { runner }
    }

    async fn invoke(&self, params: &Value) -> Result<String> {
        let input_file = required_str(params, "input_file")?;
        let output_dir = required_str(params, "output_dir")?;

        let result = self.runner.fastqc(input_file, output_dir).await?;
        Ok(report(
            self.name(),
            result,
            || {
                format!(
                    "FastQC analysis completed successfully. Results stored in {}",
                    output_dir
                )
            },
            FASTQC_FAILED,
        ))
    }
}

#[async_trait]
impl Tool for FastqcTool {
    fn name(&self) -> &str {
        "get_fastqc"
    }

    fn description(&self) -> &str {
        "Perform quality control using FastQC on FASTQ files."
    }

    fn schema(&self) -> Value {
        string_params_schema(&[
            ("input_file", "Path to the FASTQ file"),
            ("output_dir", "Directory where FastQC results will be stored"),
        ])
    }

    async fn execute(&self, params: Value) -> Result<String> {
        Ok(contain(self.name(), FASTQC_FAILED, self.invoke(&params).await))
    }
}

/// Salmon index construction from a transcript FASTA
pub struct SalmonIndexTool {
    runner: Arc<ProcessRunner>,
}

impl SalmonIndexTool {
    pub fn new(runner: Arc<ProcessRunner>) -> Self {
        Self { runner }
    }

    async fn invoke(&self, params: &Value) -> Result<String> {
        let transcript_fasta = required_str(params, "transcript_fasta")?;
        let index_dir = required_str(params, "index_dir")?;

        let result = self
            .runner
            .salmon_index(transcript_fasta, index_dir)
            .await?;
        Ok(report(
            self.name(),
            result,
            || format!("Salmon index created successfully in {}", index_dir),
            INDEX_FAILED,
        ))
    }
}

#[async_trait]
impl Tool for SalmonIndexTool {
    fn name(&self) -> &str {
        "create_salmon_index"
    }

    fn description(&self) -> &str {
        "Create a Salmon index from a transcript FASTA file."
    }

    fn schema(&self) -> Value {
        string_params_schema(&[
            ("transcript_fasta", "Path to the transcript FASTA file"),
            ("index_dir", "Directory where the Salmon index will be created"),
        ])
    }

    async fn execute(&self, params: Value) -> Result<String> {
        Ok(contain(self.name(), INDEX_FAILED, self.invoke(&params).await))
    }
}

/// Transcript quantification of a reads file against a Salmon index
pub struct SalmonQuantTool {
    runner: Arc<ProcessRunner>,
}

impl SalmonQuantTool {
    pub fn new(runner: Arc<ProcessRunner>) -> Self {
        Self { runner }
    }

    async fn invoke(&self, params: &Value) -> Result<String> {
        let index_dir = required_str(params, "index_dir")?;
        let reads = required_str(params, "reads")?;
        let output_dir = required_str(params, "output_dir")?;

        let result = self
            .runner
            .salmon_quant(index_dir, reads, output_dir)
            .await?;
        Ok(report(
            self.name(),
            result,
            || {
                format!(
                    "Salmon quantification completed successfully. Results stored in {}",
                    output_dir
                )
            },
            QUANT_FAILED,
        ))
    }
}

#[async_trait]
impl Tool for SalmonQuantTool {
    fn name(&self) -> &str {
        "quantify_with_salmon"
    }

    fn description(&self) -> &str {
        "Quantify transcript abundances using Salmon."
    }

    fn schema(&self) -> Value {
        string_params_schema(&[
            ("index_dir", "Path to the Salmon index directory"),
            ("reads", "Path to the FASTQ reads file"),
            (
                "output_dir",
                "Directory where the quantification results will be stored",
            ),
        ])
    }

    async fn execute(&self, params: Value) -> Result<String> {
        Ok(contain(self.name(), QUANT_FAILED, self.invoke(&params).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BinaryConfig;
    use serde_json::json;

    fn runner(fastqc: &str, salmon: &str) -> Arc<ProcessRunner> {
        Arc::new(ProcessRunner::new(BinaryConfig {
            fastqc: fastqc.to_string(),
            salmon: salmon.to_string(),
        }))
    }

    #[tokio::test]
    async fn fastqc_success_names_output_dir() {
        let tool = FastqcTool::new(runner("true", "true"));
        let reply = tool
            .execute(json!({ "input_file": "r1.fastq", "output_dir": "results/qc" }))
            .await
            .unwrap();
        assert_eq!(
            reply,
            "FastQC analysis completed successfully. Results stored in results/qc"
        );
    }

    #[tokio::test]
    async fn fastqc_failure_carries_stderr() {
        let tool = FastqcTool::new(runner("ls", "ls"));
        let reply = tool
            .execute(json!({
                "input_file": "/nonexistent/r1.fastq",
                "output_dir": "/nonexistent/qc"
            }))
            .await
            .unwrap();
        assert!(reply.starts_with("Error running FastQC: "));
        assert!(reply.len() > FASTQC_FAILED.len());
    }

    #[tokio::test]
    async fn index_on_missing_fasta_reports_error() {
        let tool = SalmonIndexTool::new(runner("ls", "ls"));
        let reply = tool
            .execute(json!({
                "transcript_fasta": "/nonexistent/tx.fa",
                "index_dir": "/nonexistent/idx"
            }))
            .await
            .unwrap();
        assert!(reply.starts_with("Error creating Salmon index:"));
    }

    #[tokio::test]
    async fn quant_success_names_output_dir() {
        let tool = SalmonQuantTool::new(runner("true", "true"));
        let reply = tool
            .execute(json!({
                "index_dir": "idx",
                "reads": "r1.fastq",
                "output_dir": "results/quant"
            }))
            .await
            .unwrap();
        assert_eq!(
            reply,
            "Salmon quantification completed successfully. Results stored in results/quant"
        );
    }

    #[tokio::test]
    async fn spawn_failure_is_contained() {
        let tool = SalmonQuantTool::new(runner("fastqc", "biotools-no-such-binary"));
        let reply = tool
            .execute(json!({ "index_dir": "idx", "reads": "r.fq", "output_dir": "out" }))
            .await
            .unwrap();
        assert!(reply.starts_with("Error running Salmon quantification: failed to spawn"));
    }

    #[tokio::test]
    async fn missing_parameter_is_contained() {
        let tool = SalmonIndexTool::new(runner("true", "true"));
        let reply = tool
            .execute(json!({ "transcript_fasta": "tx.fa" }))
            .await
            .unwrap();
        assert_eq!(
            reply,
            "Error creating Salmon index: missing 'index_dir' parameter"
        );
    }
}
