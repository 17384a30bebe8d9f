//! CLI argument parsing for pdfmerge.
//!
//! This module defines the command-line interface structure using `clap`.
//! It is also compiled by the build script to render the man page, so it
//! depends on nothing but `clap` and the standard library.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Merge PDF documents from a content store into a single document.
///
/// pdfmerge runs the merge connector outside the process engine. Documents
/// are read from a directory store; the inputs come either from a JSON
/// parameter file in the engine's shape or from the command line.
#[derive(Parser, Debug)]
#[command(name = "pdfmerge")]
#[command(version)]
#[command(about = "Merge PDF documents from a content store into a single document", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Locators of the documents to merge (in order)
    ///
    /// Each locator is a path relative to the store directory.
    ///
    /// Examples:
    ///   pdfmerge --store /srv/docs inbox/a.pdf inbox/b.pdf -o merged.pdf
    #[arg(value_name = "DOCUMENT", conflicts_with = "params")]
    pub documents: Vec<String>,

    /// File name of the merged document
    #[arg(short = 'o', long, value_name = "NAME", conflicts_with = "params")]
    pub output_file_name: Option<String>,

    /// JSON file holding the connector inputs
    ///
    /// The file holds an object with a "documents" list and an
    /// "outputFileName", exactly as the engine supplies them.
    #[arg(short, long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Root directory of the content store
    #[arg(short, long, value_name = "DIR", env = "PDFMERGE_STORE", default_value = ".")]
    pub store: PathBuf,

    /// Directory the merged document is written to
    #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// JSON file holding the connector configuration
    ///
    /// Flags given on the command line override values from the file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(short, long)]
    pub force: bool,

    /// Validate the inputs without fetching or merging anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Compression level for the merged document
    ///
    /// - none: Keep streams as the sources had them
    /// - standard: Compress uncompressed streams (default)
    #[arg(short, long, value_name = "LEVEL")]
    #[arg(value_parser = ["none", "standard"])]
    pub compression: Option<String>,

    /// Set title metadata for the merged document
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Set author metadata for the merged document
    #[arg(long, value_name = "TEXT")]
    pub author: Option<String>,

    /// Set subject metadata for the merged document
    #[arg(long, value_name = "TEXT")]
    pub subject: Option<String>,

    /// Set keywords metadata for the merged document (comma-separated)
    #[arg(long, value_name = "TEXT")]
    pub keywords: Option<String>,

    /// Abort when the merge takes longer than this many milliseconds
    #[arg(long, value_name = "MS")]
    pub deadline_ms: Option<u64>,

    /// Number of documents fetched at once
    ///
    /// Documents are still merged in input order. Use 1 for sequential
    /// fetching (default).
    #[arg(short = 'j', long, value_name = "N")]
    pub fetch_concurrency: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print a JSON summary instead of text
    #[arg(long)]
    pub json: bool,
}
