use std::io;

#[derive(Debug, thiserror::Error)]
pub enum BiotoolsError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{path}: {source}")]
    Inspect {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}
