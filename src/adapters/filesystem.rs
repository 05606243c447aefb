use crate::ports::FileSourcePort;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Expands glob patterns against the filesystem, covering shells that pass
/// patterns through unexpanded. A pattern that matches nothing contributes
/// no files; a malformed pattern fails the whole resolution.
pub struct GlobSourceAdapter;

impl GlobSourceAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl FileSourcePort for GlobSourceAdapter {
    fn resolve_files(&self, patterns: &[String]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for pattern in patterns {
            let matches =
                glob::glob(pattern).with_context(|| format!("invalid pattern '{pattern}'"))?;
            for entry in matches {
                let path = entry
                    .with_context(|| format!("failed to read a match for '{pattern}'"))?;
                files.push(path);
            }
        }
        Ok(files)
    }
}
