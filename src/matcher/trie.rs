//! Prefix-tree route index - the accelerated matcher.
//!
//! Each node represents one path segment. Static segments match exactly,
//! parameter nodes match any single non-empty segment, and remainder nodes
//! capture the raw tail of the path. Lookup is O(k) in the number of path
//! segments, independent of the number of registered routes.
//!
//! Child ordering encodes the tie-break rules: literal children are tried
//! before parameter children, parameter children before remainder captures,
//! and children of the same class in registration order.

use http::Method;
use std::collections::HashMap;
use std::sync::Arc;

use super::core::{normalize_allowed, CompiledRoute, MatchResult, ParamVec};
use super::pattern::{ParamKind, Segment};
use super::split_segments;

struct TrieNode {
    /// Literal segment text; empty for the root and for parameter nodes
    segment: String,
    /// Routes terminating at this node, keyed by method
    routes: HashMap<Method, Arc<CompiledRoute>>,
    /// Capture name when this node is a parameter node
    param_name: Option<Arc<str>>,
    /// Literal children, in registration order
    children: Vec<TrieNode>,
    /// Parameter children, one per distinct capture name, in registration order
    param_children: Vec<TrieNode>,
    /// Remainder captures terminating below this node, in registration order
    rest_children: Vec<RestNode>,
}

/// A trailing remainder capture (`{x:path}` or `*`). Always terminal.
struct RestNode {
    /// Capture name; `None` for the anonymous wildcard
    param_name: Option<Arc<str>>,
    routes: HashMap<Method, Arc<CompiledRoute>>,
}

impl TrieNode {
    fn new(segment: String) -> Self {
        Self {
            segment,
            routes: HashMap::new(),
            param_name: None,
            children: Vec::new(),
            param_children: Vec::new(),
            rest_children: Vec::new(),
        }
    }

    fn insert(&mut self, segments: &[Segment], route: Arc<CompiledRoute>) {
        let Some(segment) = segments.first() else {
            self.routes.insert(route.method.clone(), route);
            return;
        };
        let remaining = &segments[1..];

        match segment {
            Segment::Literal(text) => {
                for child in &mut self.children {
                    if child.segment == *text {
                        child.insert(remaining, route);
                        return;
                    }
                }
                let mut child = TrieNode::new(text.clone());
                child.insert(remaining, route);
                self.children.push(child);
            }
            Segment::Param { name, kind } if *kind != ParamKind::Rest => {
                // Reuse the node when the capture name matches; distinct names
                // at the same position get their own nodes so each route
                // reports its own parameter names.
                for child in &mut self.param_children {
                    if child.param_name.as_deref() == Some(name.as_ref()) {
                        child.insert(remaining, route);
                        return;
                    }
                }
                let mut child = TrieNode::new(String::new());
                child.param_name = Some(Arc::clone(name));
                child.insert(remaining, route);
                self.param_children.push(child);
            }
            Segment::Param { name, .. } => {
                self.insert_rest(Some(Arc::clone(name)), route);
            }
            Segment::Wildcard => {
                self.insert_rest(None, route);
            }
        }
    }

    fn insert_rest(&mut self, name: Option<Arc<str>>, route: Arc<CompiledRoute>) {
        for rest in &mut self.rest_children {
            if rest.param_name.as_deref() == name.as_deref() {
                rest.routes.insert(route.method.clone(), route);
                return;
            }
        }
        let mut routes = HashMap::new();
        routes.insert(route.method.clone(), route);
        self.rest_children.push(RestNode {
            param_name: name,
            routes,
        });
    }

    /// Depth-first search honoring the literal > param > remainder ordering.
    ///
    /// Returns the first route matching both path and method. Methods of
    /// every terminal whose pattern matched the path are accumulated into
    /// `allowed` so the caller can distinguish 405 from 404.
    fn search(
        &self,
        path: &str,
        segments: &[(usize, &str)],
        method: &Method,
        params: &mut ParamVec,
        allowed: &mut Vec<Method>,
    ) -> Option<Arc<CompiledRoute>> {
        let Some(&(offset, segment)) = segments.first() else {
            // Path exhausted: an exact terminal wins over a remainder capture
            // matching the empty tail.
            if let Some(route) = self.routes.get(method) {
                return Some(Arc::clone(route));
            }
            allowed.extend(self.routes.keys().cloned());
            return self.search_rest("", method, params, allowed);
        };
        let remaining = &segments[1..];

        for child in &self.children {
            if child.segment == segment {
                if let Some(route) = child.search(path, remaining, method, params, allowed) {
                    return Some(route);
                }
            }
        }

        // Parameters capture one non-empty segment; the empty segment a
        // doubled slash produces matches nothing but a remainder capture.
        if !segment.is_empty() {
            for child in &self.param_children {
                if let Some(name) = &child.param_name {
                    params.push((Arc::clone(name), segment.to_string()));
                    if let Some(route) = child.search(path, remaining, method, params, allowed) {
                        return Some(route);
                    }
                    params.pop();
                }
            }
        }

        self.search_rest(&path[offset..], method, params, allowed)
    }

    fn search_rest(
        &self,
        tail: &str,
        method: &Method,
        params: &mut ParamVec,
        allowed: &mut Vec<Method>,
    ) -> Option<Arc<CompiledRoute>> {
        for rest in &self.rest_children {
            if let Some(route) = rest.routes.get(method) {
                if let Some(name) = &rest.param_name {
                    params.push((Arc::clone(name), tail.to_string()));
                }
                return Some(Arc::clone(route));
            }
            allowed.extend(rest.routes.keys().cloned());
        }
        None
    }
}

/// Prefix-tree index over a compiled route set.
pub(crate) struct TrieIndex {
    root: TrieNode,
}

impl TrieIndex {
    pub(crate) fn build(routes: &[Arc<CompiledRoute>]) -> Self {
        let mut root = TrieNode::new(String::new());
        for route in routes {
            let segments = route.segments.clone();
            root.insert(&segments, Arc::clone(route));
        }
        Self { root }
    }

    pub(crate) fn lookup(&self, method: &Method, path: &str) -> MatchResult {
        let segments = split_segments(path);
        let mut params = ParamVec::new();
        let mut allowed = Vec::new();
        match self
            .root
            .search(path, &segments, method, &mut params, &mut allowed)
        {
            Some(route) => MatchResult::Matched { route, params },
            None if !allowed.is_empty() => MatchResult::MethodNotAllowed {
                allowed: normalize_allowed(allowed),
            },
            None => MatchResult::NotFound,
        }
    }
}
