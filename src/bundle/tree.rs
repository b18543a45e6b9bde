//! Directory tree rendering
//!
//! Produces the annotated tree section written at the top of the bundle.
//! Pruning here is independent of the concatenation traversal: an entry
//! that fails the exclude patterns is dropped together with its whole
//! subtree, and excluded directories are never recursed into.

use std::fs;
use std::path::Path;

use crate::core::filter::PathFilter;

/// Render the annotated directory tree for `root`.
///
/// Entries are listed in lexicographic order, directories before files.
/// Files eligible for content inclusion are marked 📄, files kept in the
/// listing but skipped by extension are marked 📎. An unlistable
/// directory is reported on stderr and its subtree is skipped.
pub fn generate_tree(root: &Path, filter: &PathFilter) -> String {
    let base_name = root
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string());

    let mut lines = vec![
        "Directory Structure:".to_string(),
        "==================".to_string(),
        format!("📁 {}", base_name),
    ];
    render_level(root, "", "", filter, &mut lines);
    lines.join("\n")
}

fn render_level(
    dir: &Path,
    rel_prefix: &str,
    indent: &str,
    filter: &PathFilter,
    lines: &mut Vec<String>,
) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            eprintln!("Warning: cannot list {}: {}", dir.display(), err);
            return;
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    names.sort();

    let mut directories = Vec::new();
    let mut files = Vec::new();
    for name in names {
        let rel = if rel_prefix.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", rel_prefix, name)
        };
        if !filter.should_process_path(&rel) {
            continue;
        }
        if dir.join(&name).is_dir() {
            directories.push((name, rel));
        } else {
            files.push((name, rel));
        }
    }

    let dir_count = directories.len();
    let file_count = files.len();

    for (i, (name, rel)) in directories.into_iter().enumerate() {
        let is_last = i == dir_count - 1 && file_count == 0;
        let connector = if is_last { "└── " } else { "├── " };
        let child_indent = if is_last { "    " } else { "│   " };
        lines.push(format!("{}{}📁 {}", indent, connector, name));
        render_level(
            &dir.join(&name),
            &rel,
            &format!("{}{}", indent, child_indent),
            filter,
            lines,
        );
    }

    for (i, (name, rel)) in files.into_iter().enumerate() {
        let connector = if i == file_count - 1 { "└── " } else { "├── " };
        let icon = if filter.should_process_file(&rel) {
            "📄"
        } else {
            "📎"
        };
        lines.push(format!("{}{}{} {}", indent, connector, icon, name));
    }
}
