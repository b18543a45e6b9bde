//! Path filtering
//!
//! Decides which paths survive the exclude patterns and which files are
//! eligible for content inclusion by extension. Patterns are matched
//! against the whole '/'-normalized relative path; `*` and `?` never
//! cross a path separator, so `dir/*` excludes the immediate children of
//! `dir` but not deeper descendants.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::core::config::BundleConfig;
use crate::core::paths::normalize_separators;

/// Errors raised while compiling the exclude pattern set
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid exclude pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("cannot compile exclude patterns: {0}")]
    Compile(#[from] globset::Error),
}

/// Compiled exclusion patterns plus the extension set
#[derive(Debug)]
pub struct PathFilter {
    excludes: GlobSet,
    extensions: BTreeSet<String>,
}

impl PathFilter {
    /// Compile the configured exclude patterns into a matcher.
    ///
    /// An invalid user-supplied pattern is a configuration error and
    /// fails the run before anything is written.
    pub fn new(config: &BundleConfig) -> Result<Self, FilterError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &config.exclude_patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|source| FilterError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            builder.add(glob);
        }
        Ok(Self {
            excludes: builder.build()?,
            extensions: config.extensions.clone(),
        })
    }

    /// True if the path matches none of the exclude patterns
    pub fn should_process_path(&self, path: &str) -> bool {
        let normalized = normalize_separators(path);
        !self.excludes.is_match(normalized.as_str())
    }

    /// True if the path survives the exclude patterns and its extension
    /// is a member of the configured set
    pub fn should_process_file(&self, path: &str) -> bool {
        if !self.should_process_path(path) {
            return false;
        }
        match file_extension(path) {
            Some(ext) => self.extensions.contains(ext),
            None => false,
        }
    }
}

/// Text after the final `.` of the last path segment, if any
fn file_extension(path: &str) -> Option<&str> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => Some(&name[idx + 1..]),
        _ => None,
    }
}
