//! Configuration for the cache simulator.
//!
//! This module defines the three-parameter cache geometry used throughout
//! the simulator:
//! 1. **Set-index bits (s):** the cache holds `S = 2^s` sets.
//! 2. **Associativity (E):** each set holds exactly E lines.
//! 3. **Block-offset bits (b):** each line caches a `B = 2^b` byte block.
//!
//! Configuration is supplied via CLI flags or deserialized from JSON; use
//! `CacheConfig::default()` for a small direct-mapped cache.

use serde::Deserialize;

use crate::error::ConfigError;

/// Default geometry when not explicitly overridden.
mod defaults {
    /// Default set-index bits (16 sets).
    pub const SET_BITS: u32 = 4;

    /// Default associativity (direct-mapped).
    pub const WAYS: usize = 1;

    /// Default block-offset bits (16-byte blocks).
    pub const BLOCK_BITS: u32 = 4;
}

/// Cache geometry configuration.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use csim_core::config::CacheConfig;
///
/// let config = CacheConfig::default();
/// assert_eq!(config.num_sets(), 16);
/// assert_eq!(config.block_bytes(), 16);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use csim_core::config::CacheConfig;
///
/// let json = r#"{ "set_bits": 2, "ways": 4, "block_bits": 5 }"#;
/// let config: CacheConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.num_sets(), 4);
/// assert_eq!(config.ways, 4);
/// assert_eq!(config.block_bytes(), 32);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Set-index bits (s); the cache holds `2^s` sets.
    #[serde(default = "CacheConfig::default_set_bits")]
    pub set_bits: u32,

    /// Associativity (E); lines per set.
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Block-offset bits (b); each block spans `2^b` bytes.
    #[serde(default = "CacheConfig::default_block_bits")]
    pub block_bits: u32,
}

impl CacheConfig {
    /// Returns the default set-index bits.
    fn default_set_bits() -> u32 {
        defaults::SET_BITS
    }

    /// Returns the default associativity.
    fn default_ways() -> usize {
        defaults::WAYS
    }

    /// Returns the default block-offset bits.
    fn default_block_bits() -> u32 {
        defaults::BLOCK_BITS
    }

    /// Number of sets, `S = 2^s`.
    pub fn num_sets(&self) -> usize {
        1 << self.set_bits
    }

    /// Block size in bytes, `B = 2^b`.
    pub fn block_bytes(&self) -> u64 {
        1 << self.block_bits
    }

    /// Total line count, `S * E`.
    pub fn total_lines(&self) -> usize {
        self.num_sets() * self.ways
    }

    /// Checks the geometry before any storage is allocated.
    ///
    /// `s = 0` and `b = 0` are legal (a single set, one-byte blocks); only
    /// a zero associativity or a geometry whose derived set count or block
    /// size cannot be represented is rejected.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroWays`] when `ways == 0`, and
    /// [`ConfigError::GeometryTooLarge`] when `set_bits + block_bits`
    /// reach the 64-bit address width.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ways == 0 {
            return Err(ConfigError::ZeroWays);
        }
        if self.set_bits >= u64::BITS
            || self.block_bits >= u64::BITS
            || self.set_bits + self.block_bits >= u64::BITS
            || self.set_bits >= usize::BITS
        {
            return Err(ConfigError::GeometryTooLarge {
                set_bits: self.set_bits,
                block_bits: self.block_bits,
            });
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    /// Creates a default configuration: 16 sets, direct-mapped,
    /// 16-byte blocks.
    fn default() -> Self {
        Self {
            set_bits: defaults::SET_BITS,
            ways: defaults::WAYS,
            block_bits: defaults::BLOCK_BITS,
        }
    }
}
