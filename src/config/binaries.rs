use serde::{Deserialize, Serialize};

/// External executables, by name on `PATH` or by absolute path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryConfig {
    /// Quality-control tool
    #[serde(default = "default_fastqc")]
    pub fastqc: String,

    /// Transcript index and quantification tool
    #[serde(default = "default_salmon")]
    pub salmon: String,
}

fn default_fastqc() -> String {
    "fastqc".to_string()
}

fn default_salmon() -> String {
    "salmon".to_string()
}

impl Default for BinaryConfig {
    fn default() -> Self {
        Self {
            fastqc: default_fastqc(),
            salmon: default_salmon(),
        }
    }
}
