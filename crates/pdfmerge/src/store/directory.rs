use async_trait::async_trait;
use std::io;
use std::path::{Component, Path, PathBuf};

use super::ContentStore;
use crate::error::StoreError;

/// Content store backed by a directory on disk.
///
/// Locators are relative paths under the root. Absolute paths and paths that
/// climb out of the root with `..` are refused.
#[derive(Debug, Clone)]
pub struct DirectoryContentStore {
    root: PathBuf,
}

impl DirectoryContentStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a locator to a path under the root.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocator` for empty, absolute or escaping locators.
    pub fn resolve(&self, locator: &str) -> Result<PathBuf, StoreError> {
        if locator.trim().is_empty() {
            return Err(StoreError::invalid_locator(locator, "locator is empty"));
        }

        let relative = Path::new(locator);
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(StoreError::invalid_locator(
                        locator,
                        "parent directory references are not allowed",
                    ));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(StoreError::invalid_locator(
                        locator,
                        "absolute paths are not allowed",
                    ));
                }
            }
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ContentStore for DirectoryContentStore {
    fn name(&self) -> &'static str {
        "directory"
    }

    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve(locator)?;

        tokio::fs::read(&path).await.map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::not_found(locator)
            } else {
                StoreError::Io {
                    locator: locator.to_string(),
                    source,
                }
            }
        })
    }
}
