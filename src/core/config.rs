//! Run configuration
//!
//! The extension set, exclude patterns and output target are built once
//! from the CLI arguments and are read-only for the rest of the run.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default output file name
pub const DEFAULT_OUTPUT_FILE: &str = "concatenated_output.txt";

/// Extensions eligible for content inclusion when no override is given
pub static DEFAULT_EXTENSIONS: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    [
        // Web and styling
        "html", "htm", "css",
        // JavaScript family
        "js", "jsx", "ts", "tsx",
        // Python
        "py", "pyw", "pyx",
        // Java
        "java", "jsp", "jspx",
        // Config formats
        "yaml", "yml", "json", "xml", "toml", "ini",
        // Documentation
        "md", "txt", "rst", "log",
        // Other source files
        "sh", "bash", "sql", "go", "rs", "rb", "php",
    ]
    .into_iter()
    .collect()
});

/// Always-excluded path patterns: VCS, dependency and build directories,
/// IDE config, lockfiles, and the tool's own default output file.
pub const BASELINE_EXCLUDES: &[&str] = &[
    "node_modules/*",
    "src/test/*",
    "*.min.js",
    ".git/*",
    "__pycache__/*",
    ".env/*",
    "dist/*",
    "build/*",
    "venv/*",
    ".idea/*",
    ".vscode/*",
    "package-lock.json",
    DEFAULT_OUTPUT_FILE,
];

/// Configuration for a single bundle run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Extension suffixes (no leading dot) eligible for content inclusion
    pub extensions: BTreeSet<String>,

    /// Exclude patterns: baseline + user patterns + output file + own binary
    pub exclude_patterns: Vec<String>,

    /// Output file path
    pub output_file: String,

    /// Whether the directory tree section is written
    pub show_tree: bool,
}

impl BundleConfig {
    /// Build the configuration from CLI inputs.
    ///
    /// User exclude patterns are merged with the baseline; the output file
    /// and the running binary's own name are appended so a bundle never
    /// consumes its own output or executable. Duplicates are collapsed
    /// while preserving first-seen order.
    pub fn new(
        extensions: Option<Vec<String>>,
        user_excludes: Vec<String>,
        output_file: String,
        show_tree: bool,
    ) -> Self {
        let extensions = match extensions {
            Some(exts) => exts.into_iter().collect(),
            None => DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        };

        let mut exclude_patterns: Vec<String> = Vec::new();
        let candidates = BASELINE_EXCLUDES
            .iter()
            .map(|p| p.to_string())
            .chain(user_excludes)
            .chain(std::iter::once(output_file.replace('\\', "/")))
            .chain(own_binary_name());
        for pattern in candidates {
            if !exclude_patterns.contains(&pattern) {
                exclude_patterns.push(pattern);
            }
        }

        Self {
            extensions,
            exclude_patterns,
            output_file,
            show_tree,
        }
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self::new(None, Vec::new(), DEFAULT_OUTPUT_FILE.to_string(), true)
    }
}

/// File name of the running executable, if it can be determined
fn own_binary_name() -> Option<String> {
    let exe = std::env::current_exe().ok()?;
    exe.file_name().map(|n| n.to_string_lossy().into_owned())
}
