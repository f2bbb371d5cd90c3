//! Engine configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.
//!
//! ```rust
//! use batchgrid::config::EngineConfig;
//! use batchgrid::resolve::ReplicatePolicy;
//!
//! let config = EngineConfig::from_json_str(r#"{"initial_row_count": 5}"#)?;
//! assert_eq!(config.initial_row_count(), 5);
//! assert_eq!(config.replicate_policy(), ReplicatePolicy::RequireGroup);
//! # Ok::<(), batchgrid::Error>(())
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resolve::ReplicatePolicy;
use crate::{Error, Result};

/// Tunables of the batch engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    initial_row_count: usize,
    replicate_policy: ReplicatePolicy,
    row_validation_timeout_ms: u64,
    batch_validation_timeout_ms: u64,
    parallel_chunk_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_row_count: 2,
            replicate_policy: ReplicatePolicy::RequireGroup,
            row_validation_timeout_ms: 60_000,
            batch_validation_timeout_ms: 300_000,
            parallel_chunk_size: 64,
        }
    }
}

impl EngineConfig {
    /// Create a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` on malformed JSON or unknown fields, and
    /// `Error::Config` on invalid values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, otherwise as
    /// [`EngineConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for a zero chunk size or zero timeouts.
    pub fn validate(&self) -> Result<()> {
        if self.parallel_chunk_size == 0 {
            return Err(Error::Config(
                "parallel_chunk_size must be at least 1".to_string(),
            ));
        }
        if self.row_validation_timeout_ms == 0 || self.batch_validation_timeout_ms == 0 {
            return Err(Error::Config(
                "validation timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Empty rows a new grid starts with.
    #[must_use]
    pub const fn initial_row_count(&self) -> usize {
        self.initial_row_count
    }

    /// Replicate resolution without a selected group.
    #[must_use]
    pub const fn replicate_policy(&self) -> ReplicatePolicy {
        self.replicate_policy
    }

    /// Time budget of one row's boundary validation.
    #[must_use]
    pub const fn row_validation_timeout(&self) -> Duration {
        Duration::from_millis(self.row_validation_timeout_ms)
    }

    /// Time budget of a whole upload's boundary validation.
    #[must_use]
    pub const fn batch_validation_timeout(&self) -> Duration {
        Duration::from_millis(self.batch_validation_timeout_ms)
    }

    /// Rows per chunk for parallel report validation.
    #[must_use]
    pub const fn parallel_chunk_size(&self) -> usize {
        self.parallel_chunk_size
    }
}

/// Builder for `EngineConfig`.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set the number of initial empty rows.
    #[must_use]
    pub const fn initial_row_count(mut self, count: usize) -> Self {
        self.config.initial_row_count = count;
        self
    }

    /// Set the replicate policy.
    #[must_use]
    pub const fn replicate_policy(mut self, policy: ReplicatePolicy) -> Self {
        self.config.replicate_policy = policy;
        self
    }

    /// Set the per-row boundary validation timeout.
    #[must_use]
    pub const fn row_validation_timeout_ms(mut self, millis: u64) -> Self {
        self.config.row_validation_timeout_ms = millis;
        self
    }

    /// Set the whole-upload boundary validation timeout.
    #[must_use]
    pub const fn batch_validation_timeout_ms(mut self, millis: u64) -> Self {
        self.config.batch_validation_timeout_ms = millis;
        self
    }

    /// Set the parallel chunk size.
    #[must_use]
    pub const fn parallel_chunk_size(mut self, size: usize) -> Self {
        self.config.parallel_chunk_size = size;
        self
    }

    /// Build and validate the config.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` on invalid values.
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
