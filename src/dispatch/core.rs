//! Dispatcher internals - request-path glue over matcher, codec, compression.

use http::Method;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::codec::{self, CodecError, CodecOptions, Value};
use crate::compress::{self, Encoding};
use crate::config::CoreConfig;
use crate::hot_reload::SharedRouteTable;
use crate::matcher::{MatchResult, MatcherKind, ParamVec, PatternError, RouteTable};
use crate::spec::RouteSpec;

/// Encoder implementation selected once at dispatcher construction.
type EncodeFn = fn(&Value, &CodecOptions) -> Result<Vec<u8>, CodecError>;

/// Per-request failure surfaced by [`Dispatcher::dispatch`].
///
/// `NotFound` and `MethodNotAllowed` map to 404/405; `Codec` is a client
/// error (malformed request body). None of these terminate anything beyond
/// the current request.
#[derive(Debug)]
pub enum DispatchError {
    NotFound,
    MethodNotAllowed { allowed: Vec<Method> },
    Codec(CodecError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NotFound => write!(f, "no route matches the request path"),
            DispatchError::MethodNotAllowed { allowed } => {
                write!(f, "method not allowed; allowed: ")?;
                for (i, m) in allowed.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{m}")?;
                }
                Ok(())
            }
            DispatchError::Codec(err) => write!(f, "request body: {err}"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Codec(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CodecError> for DispatchError {
    fn from(err: CodecError) -> Self {
        DispatchError::Codec(err)
    }
}

/// Successful dispatch: everything the framework needs to run a handler and
/// encode its result.
#[derive(Debug)]
pub struct DispatchResult {
    /// Matched route id (registration order position in the table)
    pub route_id: usize,
    /// Opaque handler identifier from registration
    pub handler: Arc<str>,
    /// Extracted path parameters, raw strings
    pub params: ParamVec,
    /// Decoded request body, when one was supplied
    pub body: Option<Value>,
    /// Response encoder configured with the negotiated content encoding
    pub encoder: ResponseEncoder,
}

impl DispatchResult {
    /// Look up a path parameter by name (last occurrence wins).
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Encoded response body plus the encoding actually applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedResponse {
    pub bytes: Vec<u8>,
    /// `Identity` when negotiation chose it, the payload was below the
    /// threshold, or compression failed and the response degraded
    pub encoding: Encoding,
}

/// Per-request response encoder.
///
/// Captures the negotiated encoding and the facade's compression policy so
/// the handler's result can be turned into wire bytes with one call.
#[derive(Debug, Clone)]
pub struct ResponseEncoder {
    negotiated: Encoding,
    min_compress_size: usize,
    compression_level: Option<i32>,
    codec_options: CodecOptions,
    encode_fn: EncodeFn,
}

impl ResponseEncoder {
    /// The encoding negotiation selected, before the size threshold is
    /// applied.
    #[must_use]
    pub fn negotiated(&self) -> Encoding {
        self.negotiated
    }

    /// Encode a handler's [`Value`] result into response bytes, compressing
    /// when the negotiated encoding and size threshold allow.
    ///
    /// A compression failure degrades to identity and logs a warning; it
    /// never fails the response. An encode failure (non-finite float in
    /// strict mode) is an internal error and is returned.
    pub fn encode_response(&self, value: &Value) -> Result<EncodedResponse, CodecError> {
        let bytes = (self.encode_fn)(value, &self.codec_options)?;
        Ok(self.finish(bytes))
    }

    /// Apply the compression policy to pre-rendered bytes (static content,
    /// template output) without involving the codec.
    #[must_use]
    pub fn encode_raw(&self, bytes: Vec<u8>) -> EncodedResponse {
        self.finish(bytes)
    }

    fn finish(&self, bytes: Vec<u8>) -> EncodedResponse {
        if self.negotiated == Encoding::Identity || bytes.len() < self.min_compress_size {
            return EncodedResponse {
                bytes,
                encoding: Encoding::Identity,
            };
        }
        match compress::compress(&bytes, self.negotiated, self.compression_level) {
            Ok(compressed) => EncodedResponse {
                bytes: compressed,
                encoding: self.negotiated,
            },
            Err(err) => {
                warn!(
                    encoding = %self.negotiated,
                    error = %err,
                    "compression failed, falling back to identity"
                );
                EncodedResponse {
                    bytes,
                    encoding: Encoding::Identity,
                }
            }
        }
    }
}

/// The dispatch facade.
///
/// Holds the shared route table and the engine strategy selected at
/// construction from [`CoreConfig::accelerated`]. Cheap to clone; clones
/// observe the same table (and the same hot-reload swaps).
#[derive(Clone)]
pub struct Dispatcher {
    table: SharedRouteTable,
    config: CoreConfig,
    encode_fn: EncodeFn,
}

impl Dispatcher {
    /// Compile the route specs and build a dispatcher around them.
    ///
    /// Fails with [`PatternError`] on malformed or duplicate patterns, in
    /// which case registration must halt - no table is published.
    pub fn new(specs: Vec<RouteSpec>, config: CoreConfig) -> Result<Self, PatternError> {
        let table = RouteTable::compile_with(&specs, Self::matcher_kind(&config))?;
        Ok(Self::from_shared(SharedRouteTable::new(table), config))
    }

    /// Build a dispatcher over an externally managed shared table. The
    /// caller is responsible for compiling swapped-in tables with the same
    /// [`MatcherKind`] the config selects.
    #[must_use]
    pub fn from_shared(table: SharedRouteTable, config: CoreConfig) -> Self {
        let encode_fn: EncodeFn = if config.accelerated {
            codec::encode_opt
        } else {
            codec::encode_fallback
        };
        Self {
            table,
            config,
            encode_fn,
        }
    }

    /// Whether the accelerated engine is active. Purely informational: both
    /// engines are behaviorally identical.
    #[must_use]
    pub fn accelerated(&self) -> bool {
        self.config.accelerated
    }

    /// The shared table this dispatcher reads, for hot-reload wiring.
    #[must_use]
    pub fn table(&self) -> &SharedRouteTable {
        &self.table
    }

    /// Recompile the route set off to the side and publish it atomically.
    /// In-flight dispatches keep the table they already loaded.
    pub fn reload(&self, specs: &[RouteSpec]) -> Result<(), PatternError> {
        let table = RouteTable::compile_with(specs, Self::matcher_kind(&self.config))?;
        self.table.swap(table);
        Ok(())
    }

    /// Process one request descriptor.
    ///
    /// Matches the path, decodes the body when present, and negotiates the
    /// response encoding from `accept_encoding`. The returned encoder
    /// applies the compression threshold at encode time, when the payload
    /// size is known.
    pub fn dispatch(
        &self,
        method: &Method,
        path: &str,
        body: Option<&[u8]>,
        accept_encoding: Option<&str>,
    ) -> Result<DispatchResult, DispatchError> {
        let table = self.table.load();
        let (route, params) = match table.lookup(method, path) {
            MatchResult::Matched { route, params } => (route, params),
            MatchResult::NotFound => return Err(DispatchError::NotFound),
            MatchResult::MethodNotAllowed { allowed } => {
                return Err(DispatchError::MethodNotAllowed { allowed })
            }
        };

        let codec_options = CodecOptions {
            max_depth: self.config.max_nesting_depth,
            lenient: self.config.lenient_floats,
        };
        let body = body
            .map(|bytes| codec::decode_opt(bytes, &codec_options))
            .transpose()?;

        let negotiated = negotiate_or_identity(accept_encoding);
        debug!(
            method = %method,
            path = %path,
            handler = %route.handler,
            encoding = %negotiated,
            "request dispatched"
        );

        Ok(DispatchResult {
            route_id: route.id,
            handler: Arc::clone(&route.handler),
            params,
            body,
            encoder: ResponseEncoder {
                negotiated,
                min_compress_size: self.config.min_compress_size,
                compression_level: self.config.compression_level,
                codec_options,
                encode_fn: self.encode_fn,
            },
        })
    }

    fn matcher_kind(config: &CoreConfig) -> MatcherKind {
        if config.accelerated {
            MatcherKind::Trie
        } else {
            MatcherKind::Scan
        }
    }
}

fn negotiate_or_identity(accept_encoding: Option<&str>) -> Encoding {
    match accept_encoding {
        Some(header) => compress::negotiate(header, &Encoding::SUPPORTED),
        None => Encoding::Identity,
    }
}
