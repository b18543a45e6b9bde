//! codecat - bundle a directory tree into a single annotated text file
//!
//! codecat walks a directory, filters files by extension and exclusion
//! glob patterns, and writes the matching file contents into one output
//! file, optionally preceded by an annotated directory tree.

use anyhow::Result;
use clap::Parser;

mod bundle;
mod cli;
mod core;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
