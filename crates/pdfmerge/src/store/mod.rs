//! Content stores.
//!
//! The connector never sees document bytes in its inputs, only locators. A
//! [`ContentStore`] turns a locator into the bytes it names.

mod directory;
mod memory;

pub use directory::DirectoryContentStore;
pub use memory::MemoryContentStore;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::StoreError;

/// Source of document content, keyed by locator.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Short name of the store, used in logs.
    fn name(&self) -> &'static str;

    /// Fetch the full content stored under `locator`.
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, StoreError>;
}

#[async_trait]
impl<T: ContentStore + ?Sized> ContentStore for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, StoreError> {
        (**self).fetch(locator).await
    }
}

#[async_trait]
impl<T: ContentStore + ?Sized> ContentStore for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, StoreError> {
        (**self).fetch(locator).await
    }
}
