#![forbid(unsafe_code)]

//! Batching policy as data.
//!
//! Both batching managers take their tunables from a config struct whose
//! defaults match the policy an editor ships with (700 ms debounce, 50
//! commands per batch, delete runs spanning up to 10 characters). With the
//! `policy-config` feature the same structs load from TOML or JSON:
//!
//! ```toml
//! batch_timeout_ms = 500
//! max_batch_size = 20
//! max_position_jump = 4
//! ```
//!
//! ```rust,ignore
//! let config = SmartBatchingConfig::from_toml_file("quill-batching.toml")?;
//! ```
//!
//! Missing keys fall back to the defaults.

#[cfg(feature = "policy-config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};

/// Default debounce before an in-progress batch seals itself.
pub const DEFAULT_BATCH_TIMEOUT_MS: u64 = 700;
/// Default number of commands after which a batch seals immediately.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 50;
/// Default largest cursor distance between consecutive deletes in one batch.
pub const DEFAULT_MAX_POSITION_JUMP: usize = 10;

// ---------------------------------------------------------------------------
// Fixed-window policy
// ---------------------------------------------------------------------------

/// Tunables for [`BatchingManager`](crate::undo::BatchingManager).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct BatchingConfig {
    /// Milliseconds of inactivity before the current batch seals.
    pub batch_timeout_ms: u64,
    /// A batch seals as soon as it holds this many commands.
    pub max_batch_size: usize,
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            batch_timeout_ms: DEFAULT_BATCH_TIMEOUT_MS,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl BatchingConfig {
    #[must_use]
    pub fn new(batch_timeout: Duration, max_batch_size: usize) -> Self {
        Self {
            batch_timeout_ms: duration_to_ms(batch_timeout),
            max_batch_size,
        }
    }

    #[must_use]
    pub fn with_batch_timeout(mut self, timeout: Duration) -> Self {
        self.batch_timeout_ms = duration_to_ms(timeout);
        self
    }

    #[must_use]
    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    #[must_use]
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_millis(self.batch_timeout_ms)
    }

    /// Returns a list of validation errors; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.max_batch_size == 0 {
            errors.push("max_batch_size must be > 0".into());
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// Heuristic policy
// ---------------------------------------------------------------------------

/// Tunables for [`SmartBatchingManager`](crate::undo::SmartBatchingManager).
///
/// `max_position_jump` only governs deletes. Inserts use a fixed distance
/// of 2, which is not configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct SmartBatchingConfig {
    /// Milliseconds of inactivity before the current batch seals.
    pub batch_timeout_ms: u64,
    /// A batch seals as soon as it holds this many commands.
    pub max_batch_size: usize,
    /// Largest cursor distance between consecutive deletes in one batch.
    pub max_position_jump: usize,
}

impl Default for SmartBatchingConfig {
    fn default() -> Self {
        Self {
            batch_timeout_ms: DEFAULT_BATCH_TIMEOUT_MS,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            max_position_jump: DEFAULT_MAX_POSITION_JUMP,
        }
    }
}

impl SmartBatchingConfig {
    #[must_use]
    pub fn with_batch_timeout(mut self, timeout: Duration) -> Self {
        self.batch_timeout_ms = duration_to_ms(timeout);
        self
    }

    #[must_use]
    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    #[must_use]
    pub fn with_max_position_jump(mut self, jump: usize) -> Self {
        self.max_position_jump = jump;
        self
    }

    #[must_use]
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_millis(self.batch_timeout_ms)
    }

    /// The fixed-window part of this policy.
    #[must_use]
    pub fn window(&self) -> BatchingConfig {
        BatchingConfig {
            batch_timeout_ms: self.batch_timeout_ms,
            max_batch_size: self.max_batch_size,
        }
    }

    /// Returns a list of validation errors; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        self.window().validate()
    }
}

fn duration_to_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[cfg(feature = "policy-config")]
macro_rules! impl_loading {
    ($ty:ty) => {
        impl $ty {
            /// Load from a TOML string.
            pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
                let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
                config.checked()
            }

            /// Load from a TOML file on disk.
            pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
                let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
                Self::from_toml_str(&content)
            }

            /// Load from a JSON string.
            pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
                let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
                config.checked()
            }

            /// Load from a JSON file on disk.
            pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
                let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
                Self::from_json_str(&content)
            }

            fn checked(self) -> Result<Self, ConfigError> {
                let errors = self.validate();
                if errors.is_empty() {
                    Ok(self)
                } else {
                    Err(ConfigError::Validation(errors))
                }
            }
        }
    };
}

#[cfg(feature = "policy-config")]
impl_loading!(BatchingConfig);
#[cfg(feature = "policy-config")]
impl_loading!(SmartBatchingConfig);

/// Errors from loading a batching config.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "policy-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
