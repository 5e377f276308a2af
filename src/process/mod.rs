use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use crate::config::BinaryConfig;
use crate::error::BiotoolsError;

/// Captured outcome of one external process run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResult {
    pub stdout: String,
    pub stderr: String,
    /// Process exit code; `-1` when the process was terminated by a signal
    pub exit_status: i32,
}

impl InvocationResult {
    /// Whether the tool reported success through its exit code
    pub fn success(&self) -> bool {
        self.exit_status == 0
    }
}

/// `<fastqc> <input-file> -o <output-dir>`
pub fn fastqc_args(input_file: &str, output_dir: &str) -> Vec<String> {
    vec![input_file.into(), "-o".into(), output_dir.into()]
}

/// `<salmon> index -t <fasta-file> -i <index-dir>`
pub fn salmon_index_args(transcript_fasta: &str, index_dir: &str) -> Vec<String> {
    vec![
        "index".into(),
        "-t".into(),
        transcript_fasta.into(),
        "-i".into(),
        index_dir.into(),
    ]
}

/// `<salmon> quant -i <index-dir> -l A -r <reads-file> -o <output-dir>`
pub fn salmon_quant_args(index_dir: &str, reads: &str, output_dir: &str) -> Vec<String> {
    vec![
        "quant".into(),
        "-i".into(),
        index_dir.into(),
        "-l".into(),
        "A".into(),
        "-r".into(),
        reads.into(),
        "-o".into(),
        output_dir.into(),
    ]
}

/// Runs the external bioinformatics executables.
///
/// Every call spawns exactly one process and waits for it to exit. A non-zero
/// exit status is returned inside the [`InvocationResult`]; only a failure to
/// spawn is an error.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    binaries: BinaryConfig,
}

impl ProcessRunner {
    pub fn new(binaries: BinaryConfig) -> Self {
        Self { binaries }
    }

    /// Run `program` with `args` to completion and capture its output
    pub async fn run(
        &self,
        program: &str,
        args: &[String],
    ) -> Result<InvocationResult, BiotoolsError> {
        debug!(program, ?args, "spawning process");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| BiotoolsError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let result = InvocationResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_status: output.status.code().unwrap_or(-1),
        };

        debug!(program, exit_status = result.exit_status, "process exited");
        Ok(result)
    }

    /// Quality-control check of a reads file
    pub async fn fastqc(
        &self,
        input_file: &str,
        output_dir: &str,
    ) -> Result<InvocationResult, BiotoolsError> {
        self.run(&self.binaries.fastqc, &fastqc_args(input_file, output_dir))
            .await
    }

    /// Build a transcript index from a FASTA file
    pub async fn salmon_index(
        &self,
        transcript_fasta: &str,
        index_dir: &str,
    ) -> Result<InvocationResult, BiotoolsError> {
        self.run(
            &self.binaries.salmon,
            &salmon_index_args(transcript_fasta, index_dir),
        )
        .await
    }

    /// Quantify transcript abundances of a reads file against an index
    pub async fn salmon_quant(
        &self,
        index_dir: &str,
        reads: &str,
        output_dir: &str,
    ) -> Result<InvocationResult, BiotoolsError> {
        self.run(
            &self.binaries.salmon,
            &salmon_quant_args(index_dir, reads, output_dir),
        )
        .await
    }
}
