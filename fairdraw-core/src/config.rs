use crate::error::{DrawError, Result};
use serde::{Deserialize, Serialize};

/// Largest span the prefix mapper can reduce into: a 15-hex-digit prefix is 60 bits.
pub const MAX_SUPPORTED_SPAN: u64 = 1 << 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on `max - min`.
    pub max_span: u64,
    /// Random bytes fed to the key encoder per draw.
    pub key_bytes: usize,
    /// Insert attempts before giving up on key allocation.
    pub max_key_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_span: 1_000_000_000,
            key_bytes: 9,
            max_key_attempts: 5,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_span == 0 || self.max_span > MAX_SUPPORTED_SPAN {
            return Err(DrawError::config(format!(
                "max_span must be between 1 and {}",
                MAX_SUPPORTED_SPAN
            )));
        }

        if !(1..=32).contains(&self.key_bytes) {
            return Err(DrawError::config("key_bytes must be between 1 and 32"));
        }

        if self.max_key_attempts == 0 {
            return Err(DrawError::config(
                "max_key_attempts must be greater than 0",
            ));
        }

        Ok(())
    }
}
