//! # Runtime Configuration Module
//!
//! Environment-driven knobs for the router.
//!
//! ## Environment Variables
//!
//! ### `ROUTETREE_SLOW_MATCH_US`
//!
//! Lookups taking longer than this many microseconds are logged at `warn`
//! instead of `info`. Accepts decimal (`1000`) or hexadecimal (`0x3e8`).
//!
//! Default: `1000` (1 ms)
//!
//! ### `ROUTETREE_SELECTOR`
//!
//! Name of the selector parameter checked against endpoint capabilities when a
//! default value is applied. Overrides the `selector` key of a route table.
//!
//! Default: unset (the table's setting, or `action`)
//!
//! ## Usage
//!
//! ```rust
//! use routetree::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Slow match threshold: {:?}", config.slow_match);
//! ```

use std::env;
use std::time::Duration;

/// Default slow-match threshold in microseconds
pub const DEFAULT_SLOW_MATCH_US: u64 = 1000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Lookups slower than this are reported as slow
    pub slow_match: Duration,
    /// Selector parameter override
    pub selector: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            slow_match: Duration::from_micros(DEFAULT_SLOW_MATCH_US),
            selector: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("ROUTETREE_SLOW_MATCH_US").ok().as_deref(),
            env::var("ROUTETREE_SELECTOR").ok().as_deref(),
        )
    }

    fn from_vars(slow_match_us: Option<&str>, selector: Option<&str>) -> Self {
        let micros = match slow_match_us {
            Some(val) => {
                let val = val.trim();
                if let Some(hex) = val.strip_prefix("0x") {
                    u64::from_str_radix(hex, 16).unwrap_or(DEFAULT_SLOW_MATCH_US)
                } else {
                    val.parse().unwrap_or(DEFAULT_SLOW_MATCH_US)
                }
            }
            None => DEFAULT_SLOW_MATCH_US,
        };
        let selector = selector
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        RuntimeConfig {
            slow_match: Duration::from_micros(micros),
            selector,
        }
    }
}
