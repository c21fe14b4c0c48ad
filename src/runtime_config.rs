//! # Runtime Configuration
//!
//! Environment variables read once at start-up. Command-line flags take
//! precedence over every value here.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `ENTITYGEN_STACK_SIZE` | coroutine stack size for the service, decimal or `0x` hex | `0x4000` |
//! | `ENTITYGEN_OUTPUT_ROOT` | output root of directory mode | `gen_src` |
//! | `ENTITYGEN_ADDR` | listen address of service mode | `0.0.0.0:9111` |
//!
//! ```rust
//! use entitygen::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Stack size: {} bytes", config.stack_size);
//! ```

use std::env;
use std::path::PathBuf;

use crate::package::DEFAULT_OUTPUT_ROOT;

pub const DEFAULT_STACK_SIZE: usize = 0x4000;
pub const DEFAULT_ADDR: &str = "0.0.0.0:9111";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for service coroutines in bytes
    pub stack_size: usize,
    pub output_root: PathBuf,
    pub addr: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            stack_size: DEFAULT_STACK_SIZE,
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            addr: DEFAULT_ADDR.to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; unset or unparsable values fall back
    /// to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = RuntimeConfig::default();
        RuntimeConfig {
            stack_size: lookup("ENTITYGEN_STACK_SIZE")
                .and_then(|v| parse_size(&v))
                .unwrap_or(defaults.stack_size),
            output_root: lookup("ENTITYGEN_OUTPUT_ROOT")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.output_root),
            addr: lookup("ENTITYGEN_ADDR")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.addr),
        }
    }

    /// Apply the coroutine settings to the `may` runtime.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
    }
}

fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}
