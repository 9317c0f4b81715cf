mod memory;
mod file;

pub use memory::MemoryBackend;
pub use file::FileBackend;

use async_trait::async_trait;
use crate::error::Result;

/// Durable string key-value store holding one JSON document per key
///
/// Implementations only move text around; decoding is the caller's job.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Read the raw value for `key`, `None` when absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value for `key`
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}
