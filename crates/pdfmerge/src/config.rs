//! Configuration module for pdfmerge.
//!
//! Connector inputs arrive per invocation through the parameter map; the
//! settings here are fixed per connector instance. They are loaded from JSON
//! or built from CLI flags, then normalized and validated before use.

use serde::{Deserialize, Serialize};
use std::{str::FromStr, time::Duration};

use crate::error::{ConnectorError, Result};

/// Compression level for the merged PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// No compression - streams are written as the sources had them.
    None,
    /// Compress uncompressed streams.
    #[default]
    Standard,
}

impl FromStr for CompressionLevel {
    type Err = ConnectorError;

    /// Parse compression level from string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation: "none" or "standard", in any case
    ///
    /// # Errors
    ///
    /// Returns an error if the string doesn't match a valid compression level.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            _ => Err(ConnectorError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard"
            ))),
        }
    }
}

/// PDF metadata to set on the merged document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
    /// Document subject.
    pub subject: Option<String>,
    /// Document keywords (comma-separated).
    pub keywords: Option<String>,
}

impl Metadata {
    /// Check if any metadata fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.keywords.is_none()
    }

    /// Create metadata from optional strings, trimming whitespace.
    pub fn new(
        title: Option<String>,
        author: Option<String>,
        subject: Option<String>,
        keywords: Option<String>,
    ) -> Self {
        let to_string_opt = |opt: Option<String>| {
            opt.filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
        };

        Self {
            title: to_string_opt(title),
            author: to_string_opt(author),
            subject: to_string_opt(subject),
            keywords: to_string_opt(keywords),
        }
    }

    fn normalized(self) -> Self {
        Self::new(self.title, self.author, self.subject, self.keywords)
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Never overwrite, error if the file exists (default).
    #[default]
    NoClobber,
    /// Always overwrite.
    Force,
}

/// Settings of a connector instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectorConfig {
    /// Compression level for the merged document.
    pub compression: CompressionLevel,

    /// Metadata written to the merged document.
    pub metadata: Metadata,

    /// Deadline for a whole execution, in milliseconds.
    pub deadline_ms: Option<u64>,

    /// Number of documents fetched at once; 1 fetches sequentially.
    pub fetch_concurrency: usize,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            compression: CompressionLevel::default(),
            metadata: Metadata::default(),
            deadline_ms: None,
            fetch_concurrency: 1,
        }
    }
}

impl ConnectorConfig {
    /// Load a configuration from JSON, normalizing and validating it.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are invalid.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(text)
            .map_err(|e| ConnectorError::invalid_config(e.to_string()))?;

        config.metadata = config.metadata.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Fetch concurrency is zero
    /// - The deadline is zero
    pub fn validate(&self) -> Result<()> {
        if self.fetch_concurrency == 0 {
            return Err(ConnectorError::invalid_config(
                "Fetch concurrency must be at least 1",
            ));
        }

        if self.deadline_ms == Some(0) {
            return Err(ConnectorError::invalid_config(
                "Deadline must be at least 1 millisecond",
            ));
        }

        Ok(())
    }

    /// Deadline for a whole execution, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    /// Check if documents are fetched one at a time.
    pub fn is_sequential(&self) -> bool {
        self.fetch_concurrency <= 1
    }
}
