//! The configuration surface the core consumes.
//!
//! Four knobs cover everything: compression threshold and level, codec
//! nesting depth, and which engine the dispatcher selects. No other
//! configuration affects core behavior.
//!
//! ## Environment variables
//!
//! [`CoreConfig::from_env`] reads:
//!
//! - `HASTEN_MIN_COMPRESS_SIZE` - threshold in bytes (default 256)
//! - `HASTEN_COMPRESSION_LEVEL` - overrides per-algorithm tuned defaults
//! - `HASTEN_MAX_DEPTH` - codec nesting bound (default 512)
//! - `HASTEN_ACCELERATED` - `0`/`false` selects the fallback engine
//! - `HASTEN_LENIENT_FLOATS` - `1`/`true` encodes NaN/infinity as `null`
//!
//! Unset or unparseable values fall back to defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Core configuration, fixed at dispatcher construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Payloads smaller than this many bytes are never compressed;
    /// compressing tiny payloads wastes CPU and can inflate size
    pub min_compress_size: usize,
    /// Fixed compression level; `None` uses the per-algorithm tuned default.
    /// Never derived from client input.
    pub compression_level: Option<i32>,
    /// Maximum nesting depth the codec accepts when decoding
    pub max_nesting_depth: usize,
    /// Select the accelerated engine (prefix tree + byte-level encoder)
    /// instead of the fallback (linear scan + string building)
    pub accelerated: bool,
    /// Encode non-finite floats as `null` instead of failing
    pub lenient_floats: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            min_compress_size: 256,
            compression_level: None,
            max_nesting_depth: 512,
            accelerated: true,
            lenient_floats: false,
        }
    }
}

impl CoreConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_compress_size: parse_var("HASTEN_MIN_COMPRESS_SIZE")
                .unwrap_or(defaults.min_compress_size),
            compression_level: parse_var("HASTEN_COMPRESSION_LEVEL"),
            max_nesting_depth: parse_var("HASTEN_MAX_DEPTH")
                .unwrap_or(defaults.max_nesting_depth),
            accelerated: parse_bool("HASTEN_ACCELERATED").unwrap_or(defaults.accelerated),
            lenient_floats: parse_bool("HASTEN_LENIENT_FLOATS")
                .unwrap_or(defaults.lenient_floats),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_bool(name: &str) -> Option<bool> {
    let value = env::var(name).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
