//! Linear-scan route index - the fallback matcher.
//!
//! Routes are sorted once at build time by segment specificity (literal
//! before parameter before remainder, position by position, registration
//! order last), then every lookup walks the sorted list and tests routes one
//! by one. O(n*k) instead of the trie's O(k), but the sort makes the scan
//! observe exactly the same tie-break order the trie encodes structurally,
//! so the two indexes are behaviorally indistinguishable.

use http::Method;
use std::sync::Arc;

use super::core::{normalize_allowed, CompiledRoute, MatchResult, ParamVec};
use super::pattern::{ParamKind, Segment};
use super::split_segments;

/// Specificity rank per segment: lower tries first.
fn segment_rank(seg: &Segment) -> u8 {
    match seg {
        Segment::Literal(_) => 0,
        Segment::Param { kind, .. } if *kind != ParamKind::Rest => 1,
        _ => 2,
    }
}

pub(crate) struct ScanIndex {
    /// Routes in specificity order; ties keep registration order (stable sort)
    ordered: Vec<Arc<CompiledRoute>>,
}

impl ScanIndex {
    pub(crate) fn build(routes: &[Arc<CompiledRoute>]) -> Self {
        let mut ordered: Vec<Arc<CompiledRoute>> = routes.to_vec();
        ordered.sort_by(|a, b| {
            let ka = a.segments.iter().map(segment_rank);
            let kb = b.segments.iter().map(segment_rank);
            ka.cmp(kb)
        });
        Self { ordered }
    }

    pub(crate) fn lookup(&self, method: &Method, path: &str) -> MatchResult {
        let segments = split_segments(path);
        let mut allowed = Vec::new();

        for route in &self.ordered {
            let Some(params) = match_route(route, path, &segments) else {
                continue;
            };
            if route.method == *method {
                return MatchResult::Matched {
                    route: Arc::clone(route),
                    params,
                };
            }
            allowed.push(route.method.clone());
        }

        if allowed.is_empty() {
            MatchResult::NotFound
        } else {
            MatchResult::MethodNotAllowed {
                allowed: normalize_allowed(allowed),
            }
        }
    }
}

/// Test one route's segment sequence against a pre-split path, collecting
/// captures. Mirrors the trie's descent rules exactly.
fn match_route(
    route: &CompiledRoute,
    path: &str,
    segments: &[(usize, &str)],
) -> Option<ParamVec> {
    let mut params = ParamVec::new();
    let mut pos = 0;

    for seg in &route.segments {
        match seg {
            Segment::Literal(text) => {
                let &(_, actual) = segments.get(pos)?;
                if actual != text {
                    return None;
                }
                pos += 1;
            }
            Segment::Param { name, kind } if *kind != ParamKind::Rest => {
                let &(_, actual) = segments.get(pos)?;
                if actual.is_empty() {
                    return None;
                }
                params.push((Arc::clone(name), actual.to_string()));
                pos += 1;
            }
            Segment::Param { name, .. } => {
                let tail = segments
                    .get(pos)
                    .map(|&(offset, _)| &path[offset..])
                    .unwrap_or("");
                params.push((Arc::clone(name), tail.to_string()));
                return Some(params);
            }
            Segment::Wildcard => {
                return Some(params);
            }
        }
    }

    // Pattern exhausted: the path must be too.
    if pos == segments.len() {
        Some(params)
    } else {
        None
    }
}
