use std::fmt;

/// What went wrong while encoding or decoding a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecErrorKind {
    /// Input ended inside a value
    UnexpectedEof,
    /// A byte that cannot start or continue the expected construct
    UnexpectedChar { found: char },
    /// String literal never closed
    UnterminatedString,
    /// Backslash escape other than `\" \\ \/ \b \f \n \r \t \uXXXX`
    InvalidEscape,
    /// Malformed `\uXXXX` sequence or unpaired surrogate
    InvalidUnicodeEscape,
    /// Raw string bytes are not valid UTF-8
    InvalidUtf8,
    /// Number literal violates JSON grammar (leading zero, lone minus, ...)
    InvalidNumber,
    /// Integer outside i64 range or float overflowing to infinity
    NumberOutOfRange,
    /// Well-formed value followed by non-whitespace bytes
    TrailingData,
    /// Nesting deeper than the configured bound
    DepthExceeded { limit: usize },
    /// NaN or infinity encountered while encoding in strict mode
    NonFiniteNumber,
}

/// Codec failure with the byte offset where it was detected.
///
/// Always recoverable per-request: a decode failure is a client error, an
/// encode failure an internal one. The codec never produces partial output
/// alongside an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecError {
    /// Byte offset into the input where the fault was detected (0 for
    /// encode-side failures)
    pub offset: usize,
    pub kind: CodecErrorKind,
}

impl CodecError {
    pub(crate) fn new(offset: usize, kind: CodecErrorKind) -> Self {
        Self { offset, kind }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CodecErrorKind::UnexpectedEof => {
                write!(f, "unexpected end of input at offset {}", self.offset)
            }
            CodecErrorKind::UnexpectedChar { found } => {
                write!(f, "unexpected character {found:?} at offset {}", self.offset)
            }
            CodecErrorKind::UnterminatedString => {
                write!(f, "unterminated string starting at offset {}", self.offset)
            }
            CodecErrorKind::InvalidEscape => {
                write!(f, "invalid escape sequence at offset {}", self.offset)
            }
            CodecErrorKind::InvalidUnicodeEscape => {
                write!(f, "invalid unicode escape at offset {}", self.offset)
            }
            CodecErrorKind::InvalidUtf8 => {
                write!(f, "invalid UTF-8 in string at offset {}", self.offset)
            }
            CodecErrorKind::InvalidNumber => {
                write!(f, "malformed number at offset {}", self.offset)
            }
            CodecErrorKind::NumberOutOfRange => {
                write!(f, "number out of range at offset {}", self.offset)
            }
            CodecErrorKind::TrailingData => {
                write!(f, "trailing data after value at offset {}", self.offset)
            }
            CodecErrorKind::DepthExceeded { limit } => {
                write!(
                    f,
                    "nesting depth exceeds limit of {limit} at offset {}",
                    self.offset
                )
            }
            CodecErrorKind::NonFiniteNumber => {
                write!(f, "cannot encode non-finite number in strict mode")
            }
        }
    }
}

impl std::error::Error for CodecError {}
