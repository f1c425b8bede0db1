//! Response compression pipeline.
//!
//! [`negotiate`] picks a content encoding from the client's
//! `Accept-Encoding` preferences and the server's supported set;
//! [`compress`] and [`decompress`] apply the standard gzip, deflate (zlib),
//! brotli, and zstd framings unmodified from their public specifications.
//!
//! Compression levels are fixed, tuned server-side defaults - never derived
//! from client input, which would open a CPU-amplification vector. The size
//! threshold below which responses skip compression entirely lives in the
//! dispatch facade ([`crate::config::CoreConfig::min_compress_size`]);
//! the functions here are pure transforms.

mod negotiate;

pub use negotiate::negotiate;

use std::fmt;
use std::io::{Read, Write};

/// Content encodings the pipeline can apply.
///
/// `SUPPORTED` lists the non-identity encodings in server preference order,
/// which is also the negotiation tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Zstd,
    Brotli,
    Gzip,
    Deflate,
    Identity,
}

impl Encoding {
    /// Server-supported encodings in preference order.
    pub const SUPPORTED: [Encoding; 4] = [
        Encoding::Zstd,
        Encoding::Brotli,
        Encoding::Gzip,
        Encoding::Deflate,
    ];

    /// Wire name as used in `Accept-Encoding` / `Content-Encoding`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Zstd => "zstd",
            Encoding::Brotli => "br",
            Encoding::Gzip => "gzip",
            Encoding::Deflate => "deflate",
            Encoding::Identity => "identity",
        }
    }

    /// Parse a wire name, case-insensitively. `x-gzip` is an RFC 9110
    /// alias for `gzip`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Encoding> {
        match name.to_ascii_lowercase().as_str() {
            "zstd" => Some(Encoding::Zstd),
            "br" => Some(Encoding::Brotli),
            "gzip" | "x-gzip" => Some(Encoding::Gzip),
            "deflate" => Some(Encoding::Deflate),
            "identity" => Some(Encoding::Identity),
            _ => None,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure applying or reversing a content encoding.
///
/// Recoverable per-request: the response path degrades to identity encoding
/// and logs, it never aborts the response.
#[derive(Debug)]
pub struct CompressionError {
    pub encoding: Encoding,
    pub message: String,
}

impl CompressionError {
    fn new(encoding: Encoding, err: impl fmt::Display) -> Self {
        Self {
            encoding,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for CompressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} codec error: {}", self.encoding, self.message)
    }
}

impl std::error::Error for CompressionError {}

/// Default tuned level per algorithm: a balance of ratio and CPU measured
/// against typical JSON payloads.
#[must_use]
pub fn default_level(encoding: Encoding) -> i32 {
    match encoding {
        Encoding::Zstd => 3,
        Encoding::Brotli => 5,
        Encoding::Gzip | Encoding::Deflate => 6,
        Encoding::Identity => 0,
    }
}

/// Compress `data` with the given encoding. `level: None` uses the tuned
/// default; `Identity` returns the input unchanged.
pub fn compress(
    data: &[u8],
    encoding: Encoding,
    level: Option<i32>,
) -> Result<Vec<u8>, CompressionError> {
    let level = level.unwrap_or_else(|| default_level(encoding));
    match encoding {
        Encoding::Identity => Ok(data.to_vec()),
        Encoding::Gzip => {
            let mut encoder = flate2::write::GzEncoder::new(
                Vec::new(),
                flate2::Compression::new(level.clamp(0, 9) as u32),
            );
            encoder
                .write_all(data)
                .map_err(|e| CompressionError::new(encoding, e))?;
            encoder.finish().map_err(|e| CompressionError::new(encoding, e))
        }
        Encoding::Deflate => {
            let mut encoder = flate2::write::ZlibEncoder::new(
                Vec::new(),
                flate2::Compression::new(level.clamp(0, 9) as u32),
            );
            encoder
                .write_all(data)
                .map_err(|e| CompressionError::new(encoding, e))?;
            encoder.finish().map_err(|e| CompressionError::new(encoding, e))
        }
        Encoding::Brotli => {
            let mut out = Vec::new();
            {
                let mut writer = brotli::CompressorWriter::new(
                    &mut out,
                    4096,
                    level.clamp(0, 11) as u32,
                    22,
                );
                writer
                    .write_all(data)
                    .map_err(|e| CompressionError::new(encoding, e))?;
                writer
                    .flush()
                    .map_err(|e| CompressionError::new(encoding, e))?;
            }
            Ok(out)
        }
        Encoding::Zstd => {
            zstd::encode_all(data, level).map_err(|e| CompressionError::new(encoding, e))
        }
    }
}

/// Reverse a content encoding. Fails with [`CompressionError`] on corrupt
/// input; `Identity` returns the input unchanged.
pub fn decompress(data: &[u8], encoding: Encoding) -> Result<Vec<u8>, CompressionError> {
    match encoding {
        Encoding::Identity => Ok(data.to_vec()),
        Encoding::Gzip => {
            let mut decoder = flate2::read::GzDecoder::new(data);
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| CompressionError::new(encoding, e))?;
            Ok(out)
        }
        Encoding::Deflate => {
            let mut decoder = flate2::read::ZlibDecoder::new(data);
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| CompressionError::new(encoding, e))?;
            Ok(out)
        }
        Encoding::Brotli => {
            let mut decoder = brotli::Decompressor::new(data, 4096);
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| CompressionError::new(encoding, e))?;
            Ok(out)
        }
        Encoding::Zstd => {
            zstd::decode_all(data).map_err(|e| CompressionError::new(encoding, e))
        }
    }
}
