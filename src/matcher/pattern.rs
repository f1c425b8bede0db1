use http::Method;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Parameter names follow identifier rules so generated handler bindings stay
/// valid downstream.
#[allow(clippy::expect_used)]
static PARAM_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("param name regex is valid")
});

/// How a named parameter segment captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// One non-empty path segment, captured as a raw string
    Str,
    /// Same capture as [`ParamKind::Str`]; annotation for caller-side integer
    /// coercion (the matcher never validates digits itself)
    Int,
    /// Remainder of the path including embedded slashes; may be empty and
    /// must be the final pattern segment
    Rest,
}

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Exact, case-sensitive segment text
    Literal(String),
    /// Named capture
    Param { name: Arc<str>, kind: ParamKind },
    /// Anonymous remainder capture (`*`), must be the final segment
    Wildcard,
}

/// Error raised while compiling route patterns.
///
/// Pattern errors are startup-time and fatal: registration halts and no
/// partially built table is ever published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Pattern does not begin with `/`
    MissingLeadingSlash { pattern: String },
    /// A `{` without a matching `}` (or brace text inside a literal)
    UnterminatedBrace { pattern: String },
    /// `{}` or `{:int}` - the parameter has no name
    EmptyParamName { pattern: String },
    /// Parameter name is not a valid identifier
    InvalidParamName { pattern: String, name: String },
    /// Unknown type annotation, e.g. `{id:uuid}`
    UnknownParamKind { pattern: String, kind: String },
    /// An empty segment inside the pattern (`/a//b`)
    EmptyLiteral { pattern: String },
    /// A remainder capture (`*` or `{x:path}`) before the final segment
    WildcardNotLast { pattern: String },
    /// The same `(method, pattern)` pair registered twice
    Duplicate { method: Method, pattern: String },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::MissingLeadingSlash { pattern } => {
                write!(f, "pattern {pattern:?} must start with '/'")
            }
            PatternError::UnterminatedBrace { pattern } => {
                write!(f, "pattern {pattern:?} has an unterminated parameter brace")
            }
            PatternError::EmptyParamName { pattern } => {
                write!(f, "pattern {pattern:?} has a parameter with no name")
            }
            PatternError::InvalidParamName { pattern, name } => {
                write!(
                    f,
                    "pattern {pattern:?} has invalid parameter name {name:?} \
                    (expected an identifier)"
                )
            }
            PatternError::UnknownParamKind { pattern, kind } => {
                write!(
                    f,
                    "pattern {pattern:?} has unknown parameter type {kind:?} \
                    (expected str, int, or path)"
                )
            }
            PatternError::EmptyLiteral { pattern } => {
                write!(f, "pattern {pattern:?} contains an empty segment")
            }
            PatternError::WildcardNotLast { pattern } => {
                write!(
                    f,
                    "pattern {pattern:?} has a remainder capture before the final segment"
                )
            }
            PatternError::Duplicate { method, pattern } => {
                write!(f, "duplicate route registration: {method} {pattern}")
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// Parse a pattern string into segments.
///
/// A single trailing slash is ignored (`/pets/` compiles like `/pets`);
/// interior empty segments are rejected.
pub(crate) fn parse_pattern(pattern: &str) -> Result<Vec<Segment>, PatternError> {
    let Some(body) = pattern.strip_prefix('/') else {
        return Err(PatternError::MissingLeadingSlash {
            pattern: pattern.to_string(),
        });
    };
    let body = body.strip_suffix('/').unwrap_or(body);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let raw: Vec<&str> = body.split('/').collect();
    let mut segments = Vec::with_capacity(raw.len());
    for (i, seg) in raw.iter().enumerate() {
        let last = i == raw.len() - 1;
        let parsed = parse_segment(pattern, seg)?;
        let is_rest = matches!(
            parsed,
            Segment::Wildcard
                | Segment::Param {
                    kind: ParamKind::Rest,
                    ..
                }
        );
        if is_rest && !last {
            return Err(PatternError::WildcardNotLast {
                pattern: pattern.to_string(),
            });
        }
        segments.push(parsed);
    }
    Ok(segments)
}

fn parse_segment(pattern: &str, seg: &str) -> Result<Segment, PatternError> {
    if seg.is_empty() {
        return Err(PatternError::EmptyLiteral {
            pattern: pattern.to_string(),
        });
    }
    if seg == "*" {
        return Ok(Segment::Wildcard);
    }
    if let Some(inner) = seg.strip_prefix('{') {
        let Some(inner) = inner.strip_suffix('}') else {
            return Err(PatternError::UnterminatedBrace {
                pattern: pattern.to_string(),
            });
        };
        let (name, kind) = match inner.split_once(':') {
            Some((name, kind)) => (name, kind),
            None => (inner, "str"),
        };
        if name.is_empty() {
            return Err(PatternError::EmptyParamName {
                pattern: pattern.to_string(),
            });
        }
        if !PARAM_NAME_RE.is_match(name) {
            return Err(PatternError::InvalidParamName {
                pattern: pattern.to_string(),
                name: name.to_string(),
            });
        }
        let kind = match kind {
            "str" => ParamKind::Str,
            "int" => ParamKind::Int,
            "path" => ParamKind::Rest,
            other => {
                return Err(PatternError::UnknownParamKind {
                    pattern: pattern.to_string(),
                    kind: other.to_string(),
                })
            }
        };
        return Ok(Segment::Param {
            name: Arc::from(name),
            kind,
        });
    }
    if seg.contains('{') || seg.contains('}') {
        // Braces embedded in literal text, e.g. `/a{b}c` - not a supported form.
        return Err(PatternError::UnterminatedBrace {
            pattern: pattern.to_string(),
        });
    }
    Ok(Segment::Literal(seg.to_string()))
}

/// Canonical text of a parsed pattern, used for duplicate detection so that
/// `/pets/{id}` and `/pets/{id:str}/` register as the same route.
pub(crate) fn canonical_pattern(segments: &[Segment]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    let mut out = String::new();
    for seg in segments {
        out.push('/');
        match seg {
            Segment::Literal(text) => out.push_str(text),
            Segment::Param { name, kind } => {
                out.push('{');
                out.push_str(name);
                match kind {
                    ParamKind::Str => {}
                    ParamKind::Int => out.push_str(":int"),
                    ParamKind::Rest => out.push_str(":path"),
                }
                out.push('}');
            }
            Segment::Wildcard => out.push('*'),
        }
    }
    out
}
