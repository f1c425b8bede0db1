//! # Hasten Core
//!
//! **hasten-core** is the performance-critical request-dispatch engine of the
//! Hasten web framework. The framework's application object, middleware chain,
//! ORM, and templating all live elsewhere; this crate is the part they lean on
//! for speed. It must produce deterministic, low-latency results under
//! concurrent load and byte-exact wire output that the transport layer
//! transmits unmodified.
//!
//! ## Architecture
//!
//! The crate is organized into four components plus supporting modules:
//!
//! - **[`matcher`]** - Compiles route patterns into an immutable [`matcher::RouteTable`]
//!   and matches `(method, path)` pairs against it, extracting path parameters
//! - **[`codec`]** - A strict JSON codec over the framework's canonical
//!   [`codec::Value`] union, with insertion-ordered objects and bounded nesting
//! - **[`compress`]** - `Accept-Encoding` negotiation and gzip/deflate/brotli/zstd
//!   response compression
//! - **[`dispatch`]** - The facade tying the three together: match a request,
//!   decode its body, and hand back a negotiated response encoder
//! - **[`spec`]** - Route definitions and loading them from YAML/JSON files
//! - **[`hot_reload`]** - Atomic whole-table route swaps and a file watcher
//! - **[`config`]** - The small configuration surface the core consumes
//!
//! ## Request flow
//!
//! ```text
//! (method, path, body, accept-encoding)
//!        │
//!        ▼
//!   RouteTable::lookup ──► Matched { route, params } │ NotFound │ MethodNotAllowed
//!        │
//!        ▼
//!   codec::decode(body) ──► Value
//!        │
//!        ▼  handler (external) produces a Value
//!   ResponseEncoder::encode_response ──► encoded + optionally compressed bytes
//! ```
//!
//! ## Accelerated and fallback engines
//!
//! The dispatcher selects one of two engines at construction time: the
//! accelerated engine (prefix-tree matching, byte-level JSON emission) or a
//! slower fallback (linear route scan, string-building emission). The two are
//! behaviorally indistinguishable - same match semantics, byte-identical
//! encodes, same error kinds - and differ only in latency. See
//! [`dispatch::Dispatcher`].
//!
//! ## Concurrency
//!
//! Nothing in this crate performs blocking I/O; every operation is pure
//! computation over in-memory buffers. The only structure shared across
//! concurrent requests is the route table, which is read-only after
//! compilation. Hot reload builds a new table off to the side and publishes it
//! through a single atomic swap ([`hot_reload::SharedRouteTable`]), so
//! in-flight lookups always observe a fully consistent table.
//!
//! ## Quick start
//!
//! ```
//! use hasten_core::{CoreConfig, Dispatcher, RouteSpec, Value};
//! use http::Method;
//!
//! let specs = vec![
//!     RouteSpec::new(Method::GET, "/pets/{id}", "get_pet"),
//!     RouteSpec::new(Method::POST, "/pets", "create_pet"),
//! ];
//! let dispatcher = Dispatcher::new(specs, CoreConfig::default()).unwrap();
//!
//! let result = dispatcher
//!     .dispatch(&Method::GET, "/pets/42", None, Some("gzip, br"))
//!     .unwrap();
//! assert_eq!(result.handler.as_ref(), "get_pet");
//! assert_eq!(result.get_param("id"), Some("42"));
//! ```

pub mod codec;
pub mod compress;
pub mod config;
pub mod dispatch;
pub mod hot_reload;
pub mod matcher;
pub mod spec;

pub use codec::{decode, encode, CodecError, CodecErrorKind, CodecOptions, Map, Number, Value};
pub use compress::{compress, decompress, negotiate, CompressionError, Encoding};
pub use config::CoreConfig;
pub use dispatch::{
    DispatchError, DispatchResult, Dispatcher, EncodedResponse, ResponseEncoder,
};
pub use hot_reload::{watch_routes, SharedRouteTable};
pub use matcher::{
    CompiledRoute, MatchResult, MatcherKind, ParamVec, PatternError, RouteTable,
};
pub use spec::{load_routes, RouteSpec};
