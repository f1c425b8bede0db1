//! Structured payload codec.
//!
//! Encodes the framework's canonical [`Value`] union to UTF-8 JSON bytes and
//! decodes wire bytes back, with strict validation. The codec is pure and
//! side-effect free; it holds no shared state and is safe to call from any
//! number of concurrent request contexts.
//!
//! ## Guarantees
//!
//! - `decode(encode(v)) == v` for every value without non-finite floats
//! - Object key order is preserved through a round trip, never sorted
//! - Malformed input always fails with a [`CodecError`] carrying the byte
//!   offset of the fault; a partial value is never returned
//! - Nesting depth is bounded (default 512) so adversarial input cannot
//!   exhaust the stack
//!
//! ## Big integers
//!
//! Integers within the 53-bit safe mantissa range are emitted as plain JSON
//! numbers. Larger integers are emitted as tagged strings (`"~i<digits>"`)
//! so that decode can restore integer identity; ordinary strings beginning
//! with `~` are escaped with a doubled tilde. See [`encode`].

mod decode;
mod encode;
mod error;
mod value;

pub use decode::{decode, decode_opt};
pub use encode::{encode, encode_fallback, encode_opt};
pub use error::{CodecError, CodecErrorKind};
pub use value::{Map, Number, Value};

/// Largest integer magnitude that round-trips exactly through a float64
/// mantissa (2^53 - 1). Integers beyond it are encoded as tagged strings.
pub const MAX_SAFE_INT: i64 = 9_007_199_254_740_991;

/// Tuning knobs for a codec invocation.
#[derive(Debug, Clone, Copy)]
pub struct CodecOptions {
    /// Maximum nesting depth accepted by [`decode`]
    pub max_depth: usize,
    /// When true, non-finite floats encode as `null` instead of failing
    pub lenient: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_depth: 512,
            lenient: false,
        }
    }
}
