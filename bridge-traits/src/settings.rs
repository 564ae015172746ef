//! Preferences Abstraction
//!
//! A typed key→value lookup over whatever preference mechanism the host
//! provides. The artwork fetch policy is derived entirely from this store.

use async_trait::async_trait;

use crate::error::Result;

/// Key-value settings storage trait
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Store a string value
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a string value
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Store a boolean value
    async fn set_bool(&self, key: &str, value: bool) -> Result<()>;

    /// Retrieve a boolean value
    async fn get_bool(&self, key: &str) -> Result<Option<bool>>;

    /// Store an integer value
    async fn set_u64(&self, key: &str, value: u64) -> Result<()>;

    /// Retrieve an integer value
    async fn get_u64(&self, key: &str) -> Result<Option<u64>>;

    /// Delete a setting
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a setting exists
    async fn has_key(&self, key: &str) -> Result<bool>;

    /// Retrieve a boolean with a fallback default
    async fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.get_bool(key).await {
            Ok(Some(v)) => v,
            _ => default,
        }
    }

    /// Retrieve an integer with a fallback default
    async fn u64_or(&self, key: &str, default: u64) -> u64 {
        match self.get_u64(key).await {
            Ok(Some(v)) => v,
            _ => default,
        }
    }
}
