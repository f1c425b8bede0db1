//! Path matching and route resolution.
//!
//! Registered [`crate::RouteSpec`]s are compiled once into an immutable
//! [`RouteTable`]; per-request lookups walk the table read-only. Two index
//! strategies implement identical match semantics:
//!
//! - a prefix tree ([`MatcherKind::Trie`]) with O(k) lookups where k is the
//!   path length - the accelerated engine
//! - a specificity-ordered linear scan ([`MatcherKind::Scan`]) - the fallback
//!   engine for environments where predictable simplicity beats speed
//!
//! ## Tie-breaks
//!
//! At every tree level literal children are tried before parameter children,
//! and parameter children before remainder captures, so more specific
//! patterns always win. Among structurally identical patterns the
//! first-registered route wins; exact `(method, pattern)` duplicates are
//! rejected at compile time, making that rule purely defensive.
//!
//! ## Example
//!
//! ```
//! use hasten_core::{MatchResult, RouteSpec, RouteTable};
//! use http::Method;
//!
//! let table = RouteTable::compile(&[
//!     RouteSpec::new(Method::GET, "/pets/{id}", "get_pet"),
//! ]).unwrap();
//!
//! match table.lookup(&Method::GET, "/pets/42") {
//!     MatchResult::Matched { route, params } => {
//!         assert_eq!(route.handler.as_ref(), "get_pet");
//!         assert_eq!(params[0].1, "42");
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

mod core;
mod pattern;
mod scan;
mod trie;

pub use core::{CompiledRoute, MatchResult, MatcherKind, ParamVec, RouteTable, MAX_INLINE_PARAMS};
pub use pattern::{ParamKind, PatternError, Segment};

/// Split a request path into `(byte_offset, segment)` pairs.
///
/// Only the empty segments produced by the leading slash and one trailing
/// slash are discarded; a doubled slash elsewhere yields an empty segment
/// that matches neither a literal nor a parameter, so `/a//b` does not
/// resolve to the `/a/b` route. The recorded offsets let a trailing
/// remainder capture recover the raw tail of the path, slashes included.
pub(crate) fn split_segments(path: &str) -> Vec<(usize, &str)> {
    let start = usize::from(path.starts_with('/'));
    let mut end = path.len();
    if end > start && path.ends_with('/') {
        end -= 1;
    }
    if start >= end {
        return Vec::new();
    }
    let bytes = path.as_bytes();
    let mut out = Vec::new();
    let mut seg_start = start;
    for i in start..end {
        if bytes[i] == b'/' {
            out.push((seg_start, &path[seg_start..i]));
            seg_start = i + 1;
        }
    }
    out.push((seg_start, &path[seg_start..end]));
    out
}
