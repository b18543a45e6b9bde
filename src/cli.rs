//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use crate::bundle::concat::concatenate;
use crate::core::config::{BundleConfig, DEFAULT_OUTPUT_FILE};

/// codecat - bundle a directory tree into one annotated text file.
#[derive(Parser, Debug)]
#[command(name = "codecat")]
#[command(
    author,
    version,
    about,
    long_about = r#"codecat walks a directory, filters files by extension and exclusion
glob patterns, and concatenates the matching file contents into a single
output file.

The output starts with an annotated directory tree (unless --no-tree is
given): directories and content-included files are marked 📁/📄, files
that survive the exclude patterns but whose extension is not in the
configured set are marked 📎. A summary block with the processed file
count and cumulative content size is appended at the end.

Examples:
    codecat
    codecat -d src -o src_bundle.txt
    codecat -e rs toml md
    codecat -x "target/*" "*.lock" --no-tree
"#
)]
pub struct Cli {
    /// Directory to process.
    #[arg(
        short,
        long,
        default_value = ".",
        value_name = "DIR",
        long_help = "Directory to process (defaults to the current directory).\n\n\
All paths written to the output are relative to this directory."
    )]
    pub directory: PathBuf,

    /// Output file path.
    #[arg(
        short,
        long,
        default_value = DEFAULT_OUTPUT_FILE,
        value_name = "FILE",
        long_help = "Output file path. The file is created or truncated.\n\n\
The output file is always added to the exclude patterns so a bundle\n\
never swallows its own output."
    )]
    pub output: PathBuf,

    /// File extensions to process (replaces the default set).
    #[arg(
        short,
        long,
        value_name = "EXT",
        num_args = 1..,
        long_help = "File extensions eligible for content inclusion, without the leading\n\
dot. Replaces the built-in default set rather than extending it.\n\n\
Example: -e rs toml md"
    )]
    pub extensions: Option<Vec<String>>,

    /// Additional exclude patterns (merged with the built-in baseline).
    #[arg(
        short = 'x',
        long,
        value_name = "PATTERN",
        num_args = 1..,
        long_help = "Glob patterns to exclude, matched against the '/'-normalized path\n\
relative to the processed directory. Merged with the built-in baseline\n\
(VCS, dependency and build directories, IDE config, lockfiles).\n\n\
Example: -x \"target/*\" \"*.lock\""
    )]
    pub exclude: Vec<String>,

    /// Disable the directory tree section in the output.
    #[arg(long)]
    pub no_tree: bool,

    /// Disable colored output.
    #[arg(
        long,
        long_help = "Disable colored output. This is useful when piping to files or when\n\
your terminal does not support ANSI colors."
    )]
    pub no_color: bool,

    /// Quiet mode (suppress the success report).
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the run summary as a single JSON line on stdout.
    #[arg(
        long,
        long_help = "Print the run summary as a single JSON line on stdout, in addition\n\
to writing it into the output file. Useful for piping into tools."
    )]
    pub stats: bool,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = BundleConfig::new(
        cli.extensions,
        cli.exclude,
        cli.output.to_string_lossy().into_owned(),
        !cli.no_tree,
    );

    // Get absolute root path
    let root = cli.directory.canonicalize().unwrap_or(cli.directory);

    let summary = concatenate(&root, &config)?;

    if !cli.quiet {
        println!(
            "{}",
            format!("Successfully processed {} files.", summary.files_processed).green()
        );
        println!("Output written to: {}", config.output_file);
    }

    if cli.stats {
        println!("{}", serde_json::to_string(&summary)?);
    }

    Ok(())
}
