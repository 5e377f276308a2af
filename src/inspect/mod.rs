use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::BiotoolsError;

/// Immediate children of a directory, files first then sub-directories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DirectoryListing {
    pub entries: Vec<String>,
}

impl DirectoryListing {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for DirectoryListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.entries).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Normalize a user-supplied directory path into a listing prefix.
///
/// Leading `./` components are dropped, a leading `/` is enforced and any
/// trailing `/` is removed, so `./data/` becomes `/data`.
pub fn normalize_prefix(path: &str) -> String {
    let mut rest = path;
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped.trim_start_matches('/');
        } else if rest == "." {
            rest = "";
        } else {
            break;
        }
    }

    let prefixed = if rest.starts_with('/') {
        rest.to_string()
    } else {
        format!("/{}", rest)
    };
    prefixed.trim_end_matches('/').to_string()
}

/// List the immediate children of `path` without recursing.
///
/// Entries keep the order the filesystem returns them in. Children that are
/// neither regular files nor directories (after following symlinks) are
/// skipped.
pub async fn list_directory(path: &str) -> Result<DirectoryListing, BiotoolsError> {
    let inspect_err = |source| BiotoolsError::Inspect {
        path: path.to_string(),
        source,
    };

    let prefix = normalize_prefix(path);
    let mut files = Vec::new();
    let mut directories = Vec::new();

    let mut reader = tokio::fs::read_dir(path).await.map_err(inspect_err)?;
    while let Some(entry) = reader.next_entry().await.map_err(inspect_err)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let Ok(metadata) = tokio::fs::metadata(entry.path()).await else {
            debug!(path, name = %name, "skipping unreadable entry");
            continue;
        };

        if metadata.is_file() {
            files.push(format!("{}/{}", prefix, name));
        } else if metadata.is_dir() {
            directories.push(format!("{}/{}/", prefix, name));
        }
    }

    debug!(
        path,
        files = files.len(),
        directories = directories.len(),
        "listed directory"
    );

    files.append(&mut directories);
    Ok(DirectoryListing { entries: files })
}

/// Read the whole file as text, line terminators preserved
pub async fn read_file(path: &str) -> Result<String, BiotoolsError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| BiotoolsError::Inspect {
            path: path.to_string(),
            source,
        })
}
