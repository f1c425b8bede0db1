//! Route table compilation and the lookup hot path.

use http::Method;
use smallvec::SmallVec;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use super::pattern::{canonical_pattern, parse_pattern, Segment};
use super::scan::ScanIndex;
use super::trie::TrieIndex;
use super::PatternError;
use crate::spec::RouteSpec;

/// Maximum number of path parameters before heap allocation.
/// Most REST APIs have at most four path params per route.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
///
/// Param names are `Arc<str>` clones of the names stored in the compiled
/// table (O(1) refcount bump); values are per-request strings copied out of
/// the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// A single compiled route. Immutable once the table is built.
#[derive(Debug)]
pub struct CompiledRoute {
    /// Position in the table; also the registration order used for tie-breaks
    pub id: usize,
    /// HTTP method this route answers to
    pub method: Method,
    /// Original pattern text, for diagnostics
    pub pattern: String,
    /// Opaque handler identifier supplied at registration
    pub handler: Arc<str>,
    pub(crate) segments: Vec<Segment>,
}

/// Outcome of matching a `(method, path)` pair against a [`RouteTable`].
///
/// `NotFound` and `MethodNotAllowed` are expected per-request outcomes, not
/// errors; the framework maps them to 404 and 405 responses.
#[derive(Debug, Clone)]
pub enum MatchResult {
    /// A route matched; `params` holds one raw string per named capture
    Matched {
        route: Arc<CompiledRoute>,
        params: ParamVec,
    },
    /// No registered pattern matches the path
    NotFound,
    /// Patterns match the path but none for this method; `allowed` is the
    /// sorted, deduplicated union of methods that would have matched
    MethodNotAllowed { allowed: Vec<Method> },
}

impl MatchResult {
    /// Look up a captured parameter by name (last occurrence wins when a
    /// pattern repeats a name at different depths).
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        match self {
            MatchResult::Matched { params, .. } => params
                .iter()
                .rfind(|(k, _)| k.as_ref() == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

/// Index strategy for a compiled table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatcherKind {
    /// Prefix-tree index, O(k) in the path length - the accelerated engine
    Trie,
    /// Specificity-ordered linear scan - the fallback engine
    Scan,
}

enum MatcherIndex {
    Trie(TrieIndex),
    Scan(ScanIndex),
}

/// Immutable compiled routing table.
///
/// Built once per application lifecycle and shared read-only across all
/// concurrent request contexts. Hot reload never mutates a live table; it
/// compiles a replacement and publishes it atomically through
/// [`crate::hot_reload::SharedRouteTable`].
pub struct RouteTable {
    routes: Vec<Arc<CompiledRoute>>,
    index: MatcherIndex,
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes.len())
            .field("index", &self.kind())
            .finish()
    }
}

impl RouteTable {
    /// Compile a table with the default prefix-tree index.
    pub fn compile(specs: &[RouteSpec]) -> Result<Self, PatternError> {
        Self::compile_with(specs, MatcherKind::Trie)
    }

    /// Compile a table with an explicit index strategy.
    ///
    /// Fails on malformed pattern syntax or duplicate `(method, pattern)`
    /// pairs; on failure nothing is published and registration must halt.
    pub fn compile_with(specs: &[RouteSpec], kind: MatcherKind) -> Result<Self, PatternError> {
        let mut routes = Vec::with_capacity(specs.len());
        let mut seen: HashSet<(Method, String)> = HashSet::with_capacity(specs.len());

        for (id, spec) in specs.iter().enumerate() {
            let segments = parse_pattern(&spec.pattern)?;
            let canonical = canonical_pattern(&segments);
            if !seen.insert((spec.method.clone(), canonical)) {
                return Err(PatternError::Duplicate {
                    method: spec.method.clone(),
                    pattern: spec.pattern.clone(),
                });
            }
            routes.push(Arc::new(CompiledRoute {
                id,
                method: spec.method.clone(),
                pattern: spec.pattern.clone(),
                handler: Arc::from(spec.handler.as_str()),
                segments,
            }));
        }

        let index = match kind {
            MatcherKind::Trie => MatcherIndex::Trie(TrieIndex::build(&routes)),
            MatcherKind::Scan => MatcherIndex::Scan(ScanIndex::build(&routes)),
        };

        info!(
            routes_count = routes.len(),
            index = match kind {
                MatcherKind::Trie => "trie",
                MatcherKind::Scan => "scan",
            },
            "routing table compiled"
        );

        Ok(Self { routes, index })
    }

    /// Match a `(method, path)` pair against the table.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> MatchResult {
        let result = match &self.index {
            MatcherIndex::Trie(trie) => trie.lookup(method, path),
            MatcherIndex::Scan(scan) => scan.lookup(method, path),
        };
        match &result {
            MatchResult::Matched { route, params } => debug!(
                method = %method,
                path = %path,
                handler = %route.handler,
                pattern = %route.pattern,
                params = ?params,
                "route matched"
            ),
            MatchResult::MethodNotAllowed { allowed } => debug!(
                method = %method,
                path = %path,
                allowed = ?allowed,
                "method not allowed"
            ),
            MatchResult::NotFound => debug!(method = %method, path = %path, "no route matched"),
        }
        result
    }

    /// All compiled routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Arc<CompiledRoute>] {
        &self.routes
    }

    /// Route by id, as carried in [`MatchResult::Matched`].
    #[must_use]
    pub fn route(&self, id: usize) -> Option<&Arc<CompiledRoute>> {
        self.routes.get(id)
    }

    /// Index strategy this table was compiled with.
    #[must_use]
    pub fn kind(&self) -> MatcherKind {
        match self.index {
            MatcherIndex::Trie(_) => MatcherKind::Trie,
            MatcherIndex::Scan(_) => MatcherKind::Scan,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Sort and deduplicate a method union for `MethodNotAllowed` so both index
/// strategies report identical sets.
pub(crate) fn normalize_allowed(mut allowed: Vec<Method>) -> Vec<Method> {
    allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    allowed.dedup();
    allowed
}
