//! Strict recursive-descent JSON decoder over raw bytes.
//!
//! Tracks the byte offset of every fault, bounds nesting depth, and restores
//! tagged big-integer strings (see [`super::encode`]) to integer values.

use super::error::{CodecError, CodecErrorKind};
use super::value::{Map, Number, Value};
use super::CodecOptions;

/// Decode a payload with default options (depth limit 512).
pub fn decode(bytes: &[u8]) -> Result<Value, CodecError> {
    decode_opt(bytes, &CodecOptions::default())
}

/// Decode a payload with explicit options.
///
/// The whole input must be consumed: a well-formed value followed by
/// anything but whitespace is a [`CodecErrorKind::TrailingData`] fault.
pub fn decode_opt(bytes: &[u8], options: &CodecOptions) -> Result<Value, CodecError> {
    let mut parser = Parser {
        input: bytes,
        pos: 0,
        max_depth: options.max_depth,
    };
    parser.skip_whitespace();
    let value = parser.parse_value(0)?;
    parser.skip_whitespace();
    if parser.pos != bytes.len() {
        return Err(CodecError::new(parser.pos, CodecErrorKind::TrailingData));
    }
    Ok(value)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn skip_whitespace(&mut self) {
        while let Some(&b) = self.input.get(self.pos) {
            match b {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn eof(&self) -> CodecError {
        CodecError::new(self.pos, CodecErrorKind::UnexpectedEof)
    }

    fn unexpected(&self, b: u8) -> CodecError {
        CodecError::new(
            self.pos,
            CodecErrorKind::UnexpectedChar { found: b as char },
        )
    }

    fn expect_literal(&mut self, literal: &[u8]) -> Result<(), CodecError> {
        if self.input[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            Ok(())
        } else if self.input.len() - self.pos < literal.len() {
            Err(self.eof())
        } else {
            Err(self.unexpected(self.input[self.pos]))
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, CodecError> {
        if depth > self.max_depth {
            return Err(CodecError::new(
                self.pos,
                CodecErrorKind::DepthExceeded {
                    limit: self.max_depth,
                },
            ));
        }
        match self.peek().ok_or_else(|| self.eof())? {
            b'n' => self.expect_literal(b"null").map(|_| Value::Null),
            b't' => self.expect_literal(b"true").map(|_| Value::Bool(true)),
            b'f' => self.expect_literal(b"false").map(|_| Value::Bool(false)),
            b'"' => self.parse_string().map(untag_string),
            b'[' => self.parse_array(depth),
            b'{' => self.parse_object(depth),
            b'-' | b'0'..=b'9' => self.parse_number(),
            other => Err(self.unexpected(other)),
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value, CodecError> {
        self.pos += 1; // consume '['
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(Value::Array(items));
        }
        loop {
            self.skip_whitespace();
            items.push(self.parse_value(depth + 1)?);
            self.skip_whitespace();
            match self.peek().ok_or_else(|| self.eof())? {
                b',' => self.pos += 1,
                b']' => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                other => return Err(self.unexpected(other)),
            }
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value, CodecError> {
        self.pos += 1; // consume '{'
        let mut map = Map::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(Value::Object(map));
        }
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return match self.peek() {
                    Some(b) => Err(self.unexpected(b)),
                    None => Err(self.eof()),
                };
            }
            let key = self.parse_string()?;
            self.skip_whitespace();
            match self.peek().ok_or_else(|| self.eof())? {
                b':' => self.pos += 1,
                other => return Err(self.unexpected(other)),
            }
            self.skip_whitespace();
            let value = self.parse_value(depth + 1)?;
            // Duplicate keys: last value wins, first position kept.
            map.insert(key, value);
            self.skip_whitespace();
            match self.peek().ok_or_else(|| self.eof())? {
                b',' => self.pos += 1,
                b'}' => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                other => return Err(self.unexpected(other)),
            }
        }
    }

    /// Parse a string literal, returning the unescaped text.
    fn parse_string(&mut self) -> Result<String, CodecError> {
        let start = self.pos;
        self.pos += 1; // consume '"'
        let mut buf: Vec<u8> = Vec::new();
        loop {
            let Some(&b) = self.input.get(self.pos) else {
                return Err(CodecError::new(start, CodecErrorKind::UnterminatedString));
            };
            match b {
                b'"' => {
                    self.pos += 1;
                    return String::from_utf8(buf)
                        .map_err(|_| CodecError::new(start, CodecErrorKind::InvalidUtf8));
                }
                b'\\' => {
                    self.pos += 1;
                    self.parse_escape(&mut buf)?;
                }
                0x00..=0x1F => {
                    return Err(CodecError::new(self.pos, CodecErrorKind::UnexpectedChar {
                        found: b as char,
                    }));
                }
                _ => {
                    buf.push(b);
                    self.pos += 1;
                }
            }
        }
    }

    fn parse_escape(&mut self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        let escape_pos = self.pos - 1;
        let Some(&b) = self.input.get(self.pos) else {
            return Err(CodecError::new(escape_pos, CodecErrorKind::InvalidEscape));
        };
        self.pos += 1;
        let simple = match b {
            b'"' => Some(b'"'),
            b'\\' => Some(b'\\'),
            b'/' => Some(b'/'),
            b'b' => Some(0x08),
            b'f' => Some(0x0C),
            b'n' => Some(b'\n'),
            b'r' => Some(b'\r'),
            b't' => Some(b'\t'),
            b'u' => None,
            _ => return Err(CodecError::new(escape_pos, CodecErrorKind::InvalidEscape)),
        };
        if let Some(byte) = simple {
            buf.push(byte);
            return Ok(());
        }

        let unit = self.parse_hex4(escape_pos)?;
        let ch = if (0xD800..0xDC00).contains(&unit) {
            // High surrogate: a low surrogate escape must follow.
            if self.input.get(self.pos) != Some(&b'\\')
                || self.input.get(self.pos + 1) != Some(&b'u')
            {
                return Err(CodecError::new(
                    escape_pos,
                    CodecErrorKind::InvalidUnicodeEscape,
                ));
            }
            self.pos += 2;
            let low = self.parse_hex4(escape_pos)?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(CodecError::new(
                    escape_pos,
                    CodecErrorKind::InvalidUnicodeEscape,
                ));
            }
            let combined = 0x10000 + ((unit as u32 - 0xD800) << 10) + (low as u32 - 0xDC00);
            char::from_u32(combined)
        } else if (0xDC00..0xE000).contains(&unit) {
            // Unpaired low surrogate
            None
        } else {
            char::from_u32(unit as u32)
        };
        let Some(ch) = ch else {
            return Err(CodecError::new(
                escape_pos,
                CodecErrorKind::InvalidUnicodeEscape,
            ));
        };
        let mut utf8 = [0u8; 4];
        buf.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
        Ok(())
    }

    fn parse_hex4(&mut self, escape_pos: usize) -> Result<u16, CodecError> {
        let Some(hex) = self.input.get(self.pos..self.pos + 4) else {
            return Err(CodecError::new(
                escape_pos,
                CodecErrorKind::InvalidUnicodeEscape,
            ));
        };
        let mut unit: u16 = 0;
        for &b in hex {
            let digit = match b {
                b'0'..=b'9' => b - b'0',
                b'a'..=b'f' => b - b'a' + 10,
                b'A'..=b'F' => b - b'A' + 10,
                _ => {
                    return Err(CodecError::new(
                        escape_pos,
                        CodecErrorKind::InvalidUnicodeEscape,
                    ))
                }
            };
            unit = unit << 4 | digit as u16;
        }
        self.pos += 4;
        Ok(unit)
    }

    fn parse_number(&mut self) -> Result<Value, CodecError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }

        // Integer part: 0, or a nonzero digit followed by digits.
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                if matches!(self.peek(), Some(b'0'..=b'9')) {
                    return Err(CodecError::new(start, CodecErrorKind::InvalidNumber));
                }
            }
            Some(b'1'..=b'9') => {
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.pos += 1;
                }
            }
            _ => return Err(CodecError::new(start, CodecErrorKind::InvalidNumber)),
        }

        let mut is_float = false;
        if self.peek() == Some(b'.') {
            is_float = true;
            self.pos += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(CodecError::new(start, CodecErrorKind::InvalidNumber));
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(CodecError::new(start, CodecErrorKind::InvalidNumber));
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }

        // The grammar guarantees ASCII, so the slice is valid UTF-8.
        let text = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| CodecError::new(start, CodecErrorKind::InvalidNumber))?;

        if is_float {
            let f: f64 = text
                .parse()
                .map_err(|_| CodecError::new(start, CodecErrorKind::InvalidNumber))?;
            if !f.is_finite() {
                return Err(CodecError::new(start, CodecErrorKind::NumberOutOfRange));
            }
            Ok(Value::Number(Number::Float(f)))
        } else {
            let i: i64 = text
                .parse()
                .map_err(|_| CodecError::new(start, CodecErrorKind::NumberOutOfRange))?;
            Ok(Value::Number(Number::Int(i)))
        }
    }
}

/// Restore tagged big integers and unescape tilde-prefixed literals.
fn untag_string(s: String) -> Value {
    if let Some(rest) = s.strip_prefix("~i") {
        if let Ok(i) = rest.parse::<i64>() {
            return Value::Number(Number::Int(i));
        }
        // Not a valid tagged integer: treat as an ordinary literal.
        return Value::String(s);
    }
    if let Some(rest) = s.strip_prefix("~~") {
        return Value::String(format!("~{rest}"));
    }
    Value::String(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_scalars() {
        assert_eq!(decode(b"null").unwrap(), Value::Null);
        assert_eq!(decode(b"true").unwrap(), Value::Bool(true));
        assert_eq!(decode(b" false ").unwrap(), Value::Bool(false));
        assert_eq!(decode(b"42").unwrap(), Value::from(42));
        assert_eq!(decode(b"-7").unwrap(), Value::from(-7));
        assert_eq!(decode(b"1.5").unwrap(), Value::from(1.5));
        assert_eq!(decode(b"1e3").unwrap(), Value::from(1000.0));
        assert_eq!(decode(b"\"hi\"").unwrap(), Value::from("hi"));
    }

    #[test]
    fn rejects_leading_zero() {
        assert_eq!(
            decode(b"0123").unwrap_err().kind,
            CodecErrorKind::InvalidNumber
        );
    }

    #[test]
    fn rejects_integer_overflow() {
        assert_eq!(
            decode(b"92233720368547758080").unwrap_err().kind,
            CodecErrorKind::NumberOutOfRange
        );
    }

    #[test]
    fn rejects_float_overflow() {
        assert_eq!(
            decode(b"1e999").unwrap_err().kind,
            CodecErrorKind::NumberOutOfRange
        );
    }

    #[test]
    fn rejects_trailing_data_with_offset() {
        let err = decode(b"true false").unwrap_err();
        assert_eq!(err.kind, CodecErrorKind::TrailingData);
        assert_eq!(err.offset, 5);
    }

    #[test]
    fn rejects_depth_beyond_limit() {
        let input: Vec<u8> = std::iter::repeat(b'[')
            .take(600)
            .chain(std::iter::repeat(b']').take(600))
            .collect();
        assert!(matches!(
            decode(&input).unwrap_err().kind,
            CodecErrorKind::DepthExceeded { limit: 512 }
        ));
        let opts = CodecOptions {
            max_depth: 4,
            ..Default::default()
        };
        assert!(decode_opt(b"[[[[1]]]]", &opts).is_ok());
        assert!(decode_opt(b"[[[[[1]]]]]", &opts).is_err());
    }

    #[test]
    fn surrogate_pair_escape() {
        assert_eq!(
            decode(br#""\ud83d\ude00""#).unwrap(),
            Value::from("\u{1F600}")
        );
        assert_eq!(
            decode(br#""\ud83d""#).unwrap_err().kind,
            CodecErrorKind::InvalidUnicodeEscape
        );
    }

    #[test]
    fn rejects_raw_control_chars() {
        assert!(matches!(
            decode(b"\"a\nb\"").unwrap_err().kind,
            CodecErrorKind::UnexpectedChar { .. }
        ));
    }

    #[test]
    fn restores_tagged_big_integer() {
        assert_eq!(
            decode(br#""~i9007199254740993""#).unwrap(),
            Value::from(9_007_199_254_740_993i64)
        );
        // A malformed tag stays a string verbatim.
        assert_eq!(decode(br#""~ix""#).unwrap(), Value::from("~ix"));
        // An escaped tilde literal loses one tilde.
        assert_eq!(decode(br#""~~hello""#).unwrap(), Value::from("~hello"));
    }
}
