//! Persisting merged artifacts.
//!
//! The connector hands its artifact back to the caller in memory. When the
//! caller wants it on disk, [`ArtifactWriter`] stores it in a directory under
//! the artifact's own file name with:
//! - Atomic writes (write to a temporary sibling, then rename or link)
//! - Overwrite protection
//! - Write statistics
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::document::MergedArtifact;
//! use pdfmerge::io::ArtifactWriter;
//! use std::path::Path;
//!
//! # async fn example(artifact: MergedArtifact) -> Result<(), Box<dyn std::error::Error>> {
//! let stats = ArtifactWriter::new().write(&artifact, Path::new("out")).await?;
//! println!("Wrote {} to {}", stats.format_file_size(), stats.output_path.display());
//! # Ok(())
//! # }
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::debug;

use crate::config::OverwriteMode;
use crate::document::MergedArtifact;
use crate::error::{ConnectorError, Result};
use crate::utils::{format_file_size, is_plain_file_name};

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writer that stores artifacts in a directory.
#[derive(Debug, Clone, Default)]
pub struct ArtifactWriter {
    overwrite_mode: OverwriteMode,
}

impl ArtifactWriter {
    /// Create a writer that refuses to overwrite existing files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overwrite behavior.
    pub fn with_overwrite_mode(mut self, overwrite_mode: OverwriteMode) -> Self {
        self.overwrite_mode = overwrite_mode;
        self
    }

    /// Path the artifact would be written to.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact's file name is not a plain file name.
    pub fn target_path(&self, artifact: &MergedArtifact, dir: &Path) -> Result<PathBuf> {
        let name = artifact.file_name();
        if !is_plain_file_name(name) {
            return Err(ConnectorError::FailedToWrite {
                path: dir.join(name),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "output file name must not contain path components",
                ),
            });
        }

        Ok(dir.join(name))
    }

    /// Write the artifact into `dir` and return statistics.
    ///
    /// # Arguments
    ///
    /// * `artifact` - Merged document to store
    /// * `dir` - Existing output directory
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file name contains path components
    /// - The file exists and the overwrite mode is no-clobber
    /// - The directory doesn't exist or isn't writable
    pub async fn write(&self, artifact: &MergedArtifact, dir: &Path) -> Result<WriteStatistics> {
        let path = self.target_path(artifact, dir)?;

        let overwrite_mode = self.overwrite_mode;

        if overwrite_mode == OverwriteMode::NoClobber {
            match tokio::fs::try_exists(&path).await {
                Ok(true) => return Err(ConnectorError::OutputExists { path }),
                Ok(false) => {}
                Err(source) => return Err(ConnectorError::FailedToWrite { path, source }),
            }
        }

        let content = artifact.content().to_vec();

        let stats = task::spawn_blocking(move || write_atomic(&content, path, overwrite_mode))
            .await
            .map_err(|e| ConnectorError::Io(io::Error::other(format!("Write task failed: {e}"))))??;

        debug!(
            path = %stats.output_path.display(),
            size = %stats.format_file_size(),
            "artifact written"
        );

        Ok(stats)
    }
}

/// Write `content` to a temporary sibling, then move it onto `path`.
///
/// In no-clobber mode the move is a hard link, which fails when `path`
/// already exists, so a file created after the existence check survives.
fn write_atomic(
    content: &[u8],
    path: PathBuf,
    overwrite_mode: OverwriteMode,
) -> Result<WriteStatistics> {
    let start = Instant::now();
    let temp_path = temp_sibling(&path);

    let result = write_temp(&temp_path, content).and_then(|()| match overwrite_mode {
        OverwriteMode::Force => std::fs::rename(&temp_path, &path),
        OverwriteMode::NoClobber => std::fs::hard_link(&temp_path, &path).map(|()| {
            let _ = std::fs::remove_file(&temp_path);
        }),
    });

    if let Err(source) = result {
        let _ = std::fs::remove_file(&temp_path);
        if source.kind() == io::ErrorKind::AlreadyExists {
            return Err(ConnectorError::OutputExists { path });
        }
        return Err(ConnectorError::FailedToWrite { path, source });
    }

    let file_size = std::fs::metadata(&path)
        .map(|m| m.len())
        .unwrap_or(content.len() as u64);

    Ok(WriteStatistics {
        write_time: start.elapsed(),
        file_size,
        output_path: path,
    })
}

fn write_temp(temp_path: &Path, content: &[u8]) -> io::Result<()> {
    let file = std::fs::File::create(temp_path)?;
    let mut writer = io::BufWriter::new(file);
    writer.write_all(content)?;
    writer.into_inner().map_err(|e| e.into_error())?.sync_all()
}

/// Hidden temporary file next to `path`.
fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}
