//! Content concatenation
//!
//! Walks the full tree and streams matching file contents into the output
//! file. Unlike the tree renderer, this traversal never prunes excluded
//! directories: every directory is visited and the exclude patterns are
//! applied per file.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use walkdir::WalkDir;

use crate::bundle::tree::generate_tree;
use crate::core::config::BundleConfig;
use crate::core::filter::PathFilter;
use crate::core::paths::make_relative;

/// Counters reported at the end of a run and appended to the output file
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Number of files whose content was written
    pub files_processed: usize,

    /// Cumulative content length in characters (not bytes)
    pub total_chars: usize,
}

/// Write the bundle for `root` and return the run counters.
///
/// Failure to create the output file is fatal. An unreadable or
/// non-UTF-8 candidate file is reported on stderr and skipped; the run
/// continues and the skip does not affect the exit status.
pub fn concatenate(root: &Path, config: &BundleConfig) -> Result<Summary> {
    let filter = PathFilter::new(config)?;

    let output = File::create(&config.output_file)
        .with_context(|| format!("cannot create output file {}", config.output_file))?;
    let mut output = BufWriter::new(output);
    // The exclude patterns already cover the output file as spelled on the
    // command line; this resolves the case where it is reachable under a
    // different spelling (absolute path, `..` segments).
    let output_abs = fs::canonicalize(&config.output_file).ok();

    if config.show_tree {
        let tree = generate_tree(root, &filter);
        output.write_all(tree.as_bytes())?;
        output.write_all(b"\n\n")?;
        output.write_all(b"File Contents:")?;
        output.write_all(b"\n==================\n\n")?;
    }

    let mut summary = Summary::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                eprintln!("{}", format!("Error walking directory: {}", err).red());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = match make_relative(entry.path(), root) {
            Some(rel) => rel,
            None => continue,
        };
        if !filter.should_process_file(&rel) {
            continue;
        }
        if let Some(output_abs) = &output_abs {
            if entry.path().canonicalize().ok().as_deref() == Some(output_abs.as_path()) {
                continue;
            }
        }

        let content = match fs::read_to_string(entry.path()) {
            Ok(content) => content,
            Err(err) => {
                eprintln!(
                    "{}",
                    format!("Error processing {}: {}", entry.path().display(), err).red()
                );
                continue;
            }
        };

        writeln!(output, "====={}=====", rel)?;
        output.write_all(content.as_bytes())?;
        output.write_all(b"\n\n")?;

        summary.files_processed += 1;
        summary.total_chars += content.chars().count();
    }

    output.write_all(b"\n==================\n")?;
    writeln!(output, "Summary:")?;
    writeln!(output, "Total files processed: {}", summary.files_processed)?;
    writeln!(output, "Total content size: {} characters", summary.total_chars)?;
    output.flush()?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn config_for(output: &Path) -> BundleConfig {
        BundleConfig::new(
            None,
            Vec::new(),
            output.to_string_lossy().into_owned(),
            true,
        )
    }

    fn run_bundle(root: &Path, config: &BundleConfig) -> (Summary, String) {
        let summary = concatenate(root, config).unwrap();
        let written = fs::read_to_string(&config.output_file).unwrap();
        (summary, written)
    }

    fn out_path(name: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join(name);
        (dir, path)
    }

    #[test]
    fn test_default_config_excludes_baseline_paths() {
        let root = tempdir().unwrap();
        write_file(&root.path().join("a.py"), "x");
        write_file(&root.path().join("a.min.js"), "minified");
        write_file(&root.path().join("node_modules/b.js"), "dep");

        let (_out_dir, out) = out_path("bundle.txt");
        let (summary, written) = run_bundle(root.path(), &config_for(&out));

        assert_eq!(summary.files_processed, 1);
        assert_eq!(summary.total_chars, 1);
        assert!(written.contains("=====a.py====="));
        assert!(!written.contains("a.min.js====="));
        assert!(!written.contains("node_modules/b.js"));
    }

    #[test]
    fn test_extension_override_limits_content() {
        let root = tempdir().unwrap();
        write_file(&root.path().join("readme.txt"), "text");
        write_file(&root.path().join("readme.md"), "markdown");

        let (_out_dir, out) = out_path("bundle.txt");
        let config = BundleConfig::new(
            Some(vec!["txt".to_string()]),
            Vec::new(),
            out.to_string_lossy().into_owned(),
            true,
        );
        let (summary, written) = run_bundle(root.path(), &config);

        assert_eq!(summary.files_processed, 1);
        assert!(written.contains("=====readme.txt====="));
        assert!(!written.contains("=====readme.md====="));
        // The tree still lists the skipped file, annotated as not included
        assert!(written.contains("📎 readme.md"));
    }

    #[test]
    fn test_empty_directory_reports_zero() {
        let root = tempdir().unwrap();
        let (_out_dir, out) = out_path("bundle.txt");
        let (summary, written) = run_bundle(root.path(), &config_for(&out));

        assert_eq!(summary.files_processed, 0);
        assert_eq!(summary.total_chars, 0);
        assert!(written.contains("Total files processed: 0"));
        assert!(written.contains("Total content size: 0 characters"));
    }

    #[test]
    fn test_excluded_directory_visited_but_files_skipped() {
        let root = tempdir().unwrap();
        write_file(&root.path().join("dist/app.py"), "built");
        write_file(&root.path().join("keep.py"), "kept");

        let (_out_dir, out) = out_path("bundle.txt");
        let (summary, written) = run_bundle(root.path(), &config_for(&out));

        assert_eq!(summary.files_processed, 1);
        assert!(written.contains("=====keep.py====="));
        assert!(!written.contains("dist/app.py"));
    }

    #[test]
    fn test_delimiter_count_matches_summary() {
        let root = tempdir().unwrap();
        write_file(&root.path().join("a.py"), "one");
        write_file(&root.path().join("b.py"), "two");
        write_file(&root.path().join("sub/c.py"), "three");

        let (_out_dir, out) = out_path("bundle.txt");
        let (summary, written) = run_bundle(root.path(), &config_for(&out));

        let delimiters = written
            .lines()
            .filter(|l| {
                l.starts_with("=====") && l.ends_with("=====") && l.chars().any(|c| c != '=')
            })
            .count();
        assert_eq!(delimiters, summary.files_processed);
        assert_eq!(summary.files_processed, 3);
    }

    #[test]
    fn test_total_size_counts_characters_not_bytes() {
        let root = tempdir().unwrap();
        write_file(&root.path().join("uni.txt"), "héllo 世界");

        let (_out_dir, out) = out_path("bundle.txt");
        let (summary, _) = run_bundle(root.path(), &config_for(&out));

        assert_eq!(summary.files_processed, 1);
        assert_eq!(summary.total_chars, "héllo 世界".chars().count());
    }

    #[test]
    fn test_non_utf8_file_skipped() {
        let root = tempdir().unwrap();
        write_file(&root.path().join("good.py"), "ok");
        fs::write(root.path().join("bad.py"), [0xFF, 0xFE, 0x48]).unwrap();

        let (_out_dir, out) = out_path("bundle.txt");
        let (summary, written) = run_bundle(root.path(), &config_for(&out));

        assert_eq!(summary.files_processed, 1);
        assert!(written.contains("=====good.py====="));
        assert!(!written.contains("=====bad.py====="));
    }

    #[test]
    fn test_tree_disabled() {
        let root = tempdir().unwrap();
        write_file(&root.path().join("a.py"), "x");

        let (_out_dir, out) = out_path("bundle.txt");
        let config = BundleConfig::new(
            None,
            Vec::new(),
            out.to_string_lossy().into_owned(),
            false,
        );
        let (_, written) = run_bundle(root.path(), &config);

        assert!(!written.contains("Directory Structure:"));
        assert!(written.starts_with("=====a.py====="));
    }

    #[test]
    fn test_section_layout() {
        let root = tempdir().unwrap();
        write_file(&root.path().join("a.py"), "x");

        let (_out_dir, out) = out_path("bundle.txt");
        let (_, written) = run_bundle(root.path(), &config_for(&out));

        assert!(written.starts_with("Directory Structure:\n==================\n"));
        assert!(written.contains("\n\nFile Contents:\n==================\n\n"));
        assert!(written.contains("=====a.py=====\nx\n\n"));
        assert!(written.ends_with(
            "\n==================\nSummary:\nTotal files processed: 1\nTotal content size: 1 characters\n"
        ));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let root = tempdir().unwrap();
        write_file(&root.path().join("a.py"), "alpha");
        write_file(&root.path().join("sub/b.py"), "beta");

        let (_out_dir, out) = out_path("bundle.txt");
        let config = config_for(&out);
        let (_, first) = run_bundle(root.path(), &config);
        let (_, second) = run_bundle(root.path(), &config);

        assert_eq!(first, second);
    }

    #[test]
    fn test_output_inside_root_not_consumed() {
        let root = tempdir().unwrap();
        write_file(&root.path().join("a.py"), "x");
        let out = root.path().join("bundle.txt");

        let config = config_for(&out);
        let (first, _) = run_bundle(root.path(), &config);
        let (second, written) = run_bundle(root.path(), &config);

        assert_eq!(first.files_processed, 1);
        assert_eq!(second.files_processed, 1);
        assert!(!written.contains("=====bundle.txt====="));
    }

    #[test]
    fn test_unwritable_output_is_fatal() {
        let root = tempdir().unwrap();
        let config = BundleConfig::new(
            None,
            Vec::new(),
            "/nonexistent/codecat/bundle.txt".to_string(),
            true,
        );
        assert!(concatenate(root.path(), &config).is_err());
    }

    #[test]
    fn test_files_within_directory_in_sorted_order() {
        let root = tempdir().unwrap();
        write_file(&root.path().join("b.py"), "2");
        write_file(&root.path().join("a.py"), "1");
        write_file(&root.path().join("c.py"), "3");

        let (_out_dir, out) = out_path("bundle.txt");
        let (_, written) = run_bundle(root.path(), &config_for(&out));

        let a = written.find("=====a.py=====").unwrap();
        let b = written.find("=====b.py=====").unwrap();
        let c = written.find("=====c.py=====").unwrap();
        assert!(a < b && b < c);
    }
}
