//! Policy documents read from local files
//!
//! Useful for comparing exported policies (e.g. synthesized CDK templates
//! against Terraform plans) without AWS credentials.

use log::{info, warn};
use std::path::PathBuf;
use tokio::fs;

use crate::error::{SourceError, SourceResult};

/// Read every file matching a glob pattern, in sorted path order.
///
/// A pattern that matches nothing yields no documents.
pub async fn read_policy_files(pattern: &str) -> SourceResult<Vec<String>> {
    let paths = matching_paths(pattern)?;
    if paths.is_empty() {
        warn!("No policy files match '{pattern}'");
    }

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        info!("Reading policy file {}", path.display());
        let document = fs::read_to_string(&path)
            .await
            .map_err(|source| SourceError::Io { path, source })?;
        documents.push(document);
    }
    Ok(documents)
}

fn matching_paths(pattern: &str) -> SourceResult<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|source| SourceError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SourceError::Io {
            path: e.path().to_path_buf(),
            source: e.into(),
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
