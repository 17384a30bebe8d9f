use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::ContentStore;
use crate::error::StoreError;

/// In-memory, HashMap-based content store.
///
/// Intended for tests and embedding. Every fetch is recorded, hits and misses
/// alike, so callers can check which locators were requested and in what
/// order.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    contents: RwLock<HashMap<String, Vec<u8>>>,
    requests: RwLock<Vec<String>>,
}

impl MemoryContentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(self, locator: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(locator, content);
        self
    }

    /// Store content under a locator, replacing any previous content.
    pub fn insert(&self, locator: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.contents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(locator.into(), content.into());
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.contents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locators requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, StoreError> {
        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(locator.to_string());

        self.contents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(locator)
            .cloned()
            .ok_or_else(|| StoreError::not_found(locator))
    }
}
