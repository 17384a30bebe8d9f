//! pdfmerge - Merge PDF documents from a content store into one document.
//!
//! Runs the merge connector from the command line against a directory store
//! and writes the merged document to disk.

mod cli;

#[cfg(test)]
#[allow(dead_code)]
#[path = "../../pdfmerge/src/testing.rs"]
mod testing;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Value, json};
use std::path::Path;
use std::process;
use std::str::FromStr;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;
use pdfmerge::config::{CompressionLevel, ConnectorConfig, Metadata, OverwriteMode};
use pdfmerge::connector::{DOCUMENTS_INPUT, MergePdfConnector, OUTPUT_FILE_NAME_INPUT};
use pdfmerge::error::ConnectorError;
use pdfmerge::io::ArtifactWriter;
use pdfmerge::store::DirectoryContentStore;
use pdfmerge::validation::InputParameters;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        process::exit(exit_code(&err));
    }
}

fn init_tracing(verbosity: u8) {
    let log_level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Exit code for an error, taken from the connector error when there is one.
fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ConnectorError>()
        .map_or(1, ConnectorError::exit_code)
}

/// Main application logic.
async fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    let params = build_params(&cli)?;

    let store = DirectoryContentStore::new(&cli.store);
    let connector = MergePdfConnector::with_config(store, &config)?;

    let request = connector.validate_input_parameters(&params)?;

    if cli.dry_run {
        let summary = json!({
            "dryRun": true,
            "documents": request.len(),
            "outputFileName": request.output_file_name(),
            "outputPath": cli.out_dir.join(request.output_file_name()),
        });
        print_summary(&cli, &summary, || {
            format!(
                "Dry run completed successfully\n  {} documents would be merged into: {}",
                request.len(),
                cli.out_dir.join(request.output_file_name()).display()
            )
        });
        return Ok(());
    }

    info!(
        "{} v{}: merging from store {}",
        pdfmerge::NAME,
        pdfmerge::VERSION,
        cli.store.display()
    );

    let outputs = connector.execute_request(&request).await?;
    let merged = outputs.merged_document();
    let stats = outputs.statistics();

    let overwrite_mode = if cli.force {
        OverwriteMode::Force
    } else {
        OverwriteMode::NoClobber
    };
    let write_stats = ArtifactWriter::new()
        .with_overwrite_mode(overwrite_mode)
        .write(merged, &cli.out_dir)
        .await?;

    let summary = json!({
        "dryRun": false,
        "documents": stats.documents_merged,
        "pages": stats.total_pages,
        "outputFileName": merged.file_name(),
        "mimeType": merged.mime_type(),
        "outputPath": write_stats.output_path,
        "inputBytes": stats.input_size,
        "outputBytes": write_stats.file_size,
        "fetchMillis": stats.fetch_time.as_millis() as u64,
        "mergeMillis": stats.merge_time.as_millis() as u64,
        "writeMillis": write_stats.write_time.as_millis() as u64,
    });
    print_summary(&cli, &summary, || {
        format!(
            "Successfully created {} ({})\n  Documents: {}\n  Pages: {}\n  Input size: {}",
            write_stats.output_path.display(),
            write_stats.format_file_size(),
            stats.documents_merged,
            stats.total_pages,
            stats.format_input_size()
        )
    });

    Ok(())
}

fn print_summary(cli: &Cli, summary: &Value, text: impl FnOnce() -> String) {
    if cli.json {
        println!("{summary}");
    } else {
        println!("{}", text());
    }
}

/// Build the connector configuration from the config file and flags.
fn build_config(cli: &Cli) -> Result<ConnectorConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = read_text(path)?;
            ConnectorConfig::from_json(&text)?
        }
        None => ConnectorConfig::default(),
    };

    if let Some(compression) = &cli.compression {
        config.compression = CompressionLevel::from_str(compression)?;
    }

    let flags = Metadata::new(
        cli.title.clone(),
        cli.author.clone(),
        cli.subject.clone(),
        cli.keywords.clone(),
    );
    config.metadata = Metadata {
        title: flags.title.or(config.metadata.title),
        author: flags.author.or(config.metadata.author),
        subject: flags.subject.or(config.metadata.subject),
        keywords: flags.keywords.or(config.metadata.keywords),
    };

    if cli.deadline_ms.is_some() {
        config.deadline_ms = cli.deadline_ms;
    }
    if let Some(fetch_concurrency) = cli.fetch_concurrency {
        config.fetch_concurrency = fetch_concurrency;
    }

    config.validate()?;
    Ok(config)
}

/// Build the connector inputs from the parameter file or the arguments.
fn build_params(cli: &Cli) -> Result<InputParameters> {
    if let Some(path) = &cli.params {
        let text = read_text(path)?;
        return InputParameters::from_json(&text)
            .with_context(|| format!("Failed to parse parameter file: {}", path.display()));
    }

    let documents: Vec<Value> = cli
        .documents
        .iter()
        .map(|locator| {
            let file_name = Path::new(locator)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| locator.clone());
            json!({
                "id": locator,
                "fileName": file_name,
                "locator": locator,
            })
        })
        .collect();

    let mut params = InputParameters::new().with(DOCUMENTS_INPUT, documents);
    if let Some(name) = &cli.output_file_name {
        params.insert(OUTPUT_FILE_NAME_INPUT, name.as_str());
    }
    Ok(params)
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
