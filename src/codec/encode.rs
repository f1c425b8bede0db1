//! JSON encoders.
//!
//! Two implementations produce byte-identical output: [`encode`] writes
//! straight into a byte buffer (the accelerated engine), while
//! [`encode_fallback`] builds a `String` through the formatting machinery
//! (the fallback engine). Both emit compact JSON with no insignificant
//! whitespace and preserve object key order exactly as inserted.
//!
//! ## Big-integer tagging
//!
//! Integer values beyond [`super::MAX_SAFE_INT`] are emitted as tagged
//! strings `"~i<digits>"` so decode can restore integer identity; string
//! *values* beginning with `~` get the tilde doubled to keep the encoding
//! unambiguous. Object keys are never tagged or escaped this way.

use super::error::{CodecError, CodecErrorKind};
use super::value::{Number, Value};
use super::{CodecOptions, MAX_SAFE_INT};

/// Encode a value to UTF-8 JSON bytes with default options (strict floats).
pub fn encode(value: &Value) -> Result<Vec<u8>, CodecError> {
    encode_opt(value, &CodecOptions::default())
}

/// Encode a value, failing with [`CodecErrorKind::NonFiniteNumber`] on
/// NaN/infinity unless `options.lenient` is set (lenient mode emits `null`).
pub fn encode_opt(value: &Value, options: &CodecOptions) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(128);
    write_value(&mut buf, value, options.lenient)?;
    Ok(buf)
}

/// Fallback encoder: straightforward string building, byte-identical output
/// to [`encode_opt`].
pub fn encode_fallback(value: &Value, options: &CodecOptions) -> Result<Vec<u8>, CodecError> {
    let mut out = String::with_capacity(128);
    format_value(&mut out, value, options.lenient)?;
    Ok(out.into_bytes())
}

fn non_finite() -> CodecError {
    CodecError::new(0, CodecErrorKind::NonFiniteNumber)
}

// ---------------------------------------------------------------------------
// Accelerated path: direct byte emission
// ---------------------------------------------------------------------------

fn write_value(buf: &mut Vec<u8>, value: &Value, lenient: bool) -> Result<(), CodecError> {
    match value {
        Value::Null => buf.extend_from_slice(b"null"),
        Value::Bool(true) => buf.extend_from_slice(b"true"),
        Value::Bool(false) => buf.extend_from_slice(b"false"),
        Value::Number(Number::Int(i)) => {
            if i.unsigned_abs() > MAX_SAFE_INT as u64 {
                write_string(buf, &format!("~i{i}"), false);
            } else {
                let mut scratch = [0u8; 20];
                buf.extend_from_slice(format_int(&mut scratch, *i));
            }
        }
        Value::Number(Number::Float(f)) => {
            if !f.is_finite() {
                if !lenient {
                    return Err(non_finite());
                }
                buf.extend_from_slice(b"null");
            } else {
                buf.extend_from_slice(format_float(*f).as_bytes());
            }
        }
        Value::String(s) => write_string(buf, s, true),
        Value::Array(items) => {
            buf.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_value(buf, item, lenient)?;
            }
            buf.push(b']');
        }
        Value::Object(map) => {
            buf.push(b'{');
            for (i, (key, val)) in map.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_string(buf, key, false);
                buf.push(b':');
                write_value(buf, val, lenient)?;
            }
            buf.push(b'}');
        }
    }
    Ok(())
}

/// Emit a quoted, escaped string. `tag_tilde` doubles a leading tilde so
/// string values stay distinguishable from tagged big integers; keys skip it.
fn write_string(buf: &mut Vec<u8>, s: &str, tag_tilde: bool) {
    buf.push(b'"');
    let s = if tag_tilde && s.starts_with('~') {
        buf.push(b'~');
        s
    } else {
        s
    };
    for &b in s.as_bytes() {
        match b {
            b'"' => buf.extend_from_slice(b"\\\""),
            b'\\' => buf.extend_from_slice(b"\\\\"),
            0x08 => buf.extend_from_slice(b"\\b"),
            0x0C => buf.extend_from_slice(b"\\f"),
            b'\n' => buf.extend_from_slice(b"\\n"),
            b'\r' => buf.extend_from_slice(b"\\r"),
            b'\t' => buf.extend_from_slice(b"\\t"),
            0x00..=0x1F => {
                buf.extend_from_slice(b"\\u00");
                buf.push(HEX[(b >> 4) as usize]);
                buf.push(HEX[(b & 0x0F) as usize]);
            }
            _ => buf.push(b),
        }
    }
    buf.push(b'"');
}

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Format an integer into the scratch buffer without heap allocation.
/// The buffer fits any i64 plus sign.
fn format_int(scratch: &mut [u8; 20], value: i64) -> &[u8] {
    let mut n = value.unsigned_abs();
    let mut pos = scratch.len();
    loop {
        pos -= 1;
        scratch[pos] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    if value < 0 {
        pos -= 1;
        scratch[pos] = b'-';
    }
    &scratch[pos..]
}

/// Shortest round-trip decimal rendering of a finite float.
///
/// Both encoders call this so float output is identical by construction.
fn format_float(f: f64) -> String {
    let mut s = format!("{f}");
    // `{}` renders integral floats without a fractional part; keep the
    // float-ness on the wire so decode restores the same variant.
    if !s.contains('.') {
        s.push_str(".0");
    }
    s
}

// ---------------------------------------------------------------------------
// Fallback path: string building
// ---------------------------------------------------------------------------

fn format_value(out: &mut String, value: &Value, lenient: bool) -> Result<(), CodecError> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(Number::Int(i)) => {
            if i.unsigned_abs() > MAX_SAFE_INT as u64 {
                format_string(out, &format!("~i{i}"), false);
            } else {
                out.push_str(&i.to_string());
            }
        }
        Value::Number(Number::Float(f)) => {
            if !f.is_finite() {
                if !lenient {
                    return Err(non_finite());
                }
                out.push_str("null");
            } else {
                out.push_str(&format_float(*f));
            }
        }
        Value::String(s) => format_string(out, s, true),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                format_value(out, item, lenient)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, val)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                format_string(out, key, false);
                out.push(':');
                format_value(out, val, lenient)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn format_string(out: &mut String, s: &str, tag_tilde: bool) {
    out.push('"');
    if tag_tilde && s.starts_with('~') {
        out.push('~');
    }
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, Map};

    #[test]
    fn encodes_compact_json() {
        let mut map = Map::new();
        map.insert("name", Value::from("Rex"));
        map.insert("age", Value::from(4));
        map.insert("tags", Value::from(vec!["dog", "good"]));
        let bytes = encode(&Value::Object(map)).unwrap();
        assert_eq!(
            bytes,
            br#"{"name":"Rex","age":4,"tags":["dog","good"]}"#.to_vec()
        );
    }

    #[test]
    fn strict_mode_rejects_non_finite() {
        let err = encode(&Value::from(f64::NAN)).unwrap_err();
        assert_eq!(err.kind, CodecErrorKind::NonFiniteNumber);
        assert!(encode(&Value::from(f64::INFINITY)).is_err());
    }

    #[test]
    fn lenient_mode_emits_null_for_non_finite() {
        let opts = CodecOptions {
            lenient: true,
            ..Default::default()
        };
        assert_eq!(encode_opt(&Value::from(f64::NAN), &opts).unwrap(), b"null");
    }

    #[test]
    fn big_integers_become_tagged_strings() {
        let bytes = encode(&Value::from(9_007_199_254_740_993i64)).unwrap();
        assert_eq!(bytes, br#""~i9007199254740993""#.to_vec());
        let bytes = encode(&Value::from(-9_007_199_254_740_993i64)).unwrap();
        assert_eq!(bytes, br#""~i-9007199254740993""#.to_vec());
        // Safe-range integers stay plain numbers.
        assert_eq!(encode(&Value::from(MAX_SAFE_INT)).unwrap(), b"9007199254740991");
    }

    #[test]
    fn tilde_strings_are_escaped() {
        assert_eq!(encode(&Value::from("~home")).unwrap(), br#""~~home""#.to_vec());
        assert_eq!(
            decode(&encode(&Value::from("~home")).unwrap()).unwrap(),
            Value::from("~home")
        );
    }

    #[test]
    fn integral_floats_keep_fraction() {
        assert_eq!(encode(&Value::from(1.0)).unwrap(), b"1.0");
        assert_eq!(decode(b"1.0").unwrap(), Value::from(1.0));
    }

    #[test]
    fn control_chars_escape() {
        let bytes = encode(&Value::from("a\nb\u{1}")).unwrap();
        assert_eq!(bytes, br#""a\nb\u0001""#.to_vec());
    }

    #[test]
    fn fallback_is_byte_identical() {
        let opts = CodecOptions::default();
        let mut map = Map::new();
        map.insert("s", Value::from("line\n\"q\"\\~t\u{2}"));
        map.insert("i", Value::from(-42));
        map.insert("big", Value::from(i64::MAX));
        map.insert("f", Value::from(2.5e-8));
        map.insert(
            "nested",
            Value::Array(vec![Value::Null, Value::Bool(false), Value::from(0)]),
        );
        let v = Value::Object(map);
        assert_eq!(
            encode_opt(&v, &opts).unwrap(),
            encode_fallback(&v, &opts).unwrap()
        );
    }
}
