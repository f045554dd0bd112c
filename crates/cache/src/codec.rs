//! Payload encoding (gzip -> base64)
//!
//! Compressed payloads are stored as base64 text so every backend only ever
//! deals in strings.

use base64::{engine::general_purpose::STANDARD, Engine};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use tabstore_core::{Error, Result};

/// A payload ready to be written to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedValue {
    pub raw: String,
    pub compressed: bool,
}

/// Turns logical values into stored representations and back
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    threshold: usize,
    level: u32,
}

impl Codec {
    pub fn new(threshold: usize, level: u32) -> Self {
        Self {
            threshold,
            level: level.min(9),
        }
    }

    /// Encode `value`, compressing only when asked, when it exceeds the
    /// threshold and when the result is actually shorter
    pub fn encode(&self, key: &str, value: &str, compress: bool) -> Result<EncodedValue> {
        if compress && value.len() > self.threshold {
            let packed = self.compress(key, value)?;
            if packed.len() < value.len() {
                return Ok(EncodedValue {
                    raw: packed,
                    compressed: true,
                });
            }
        }

        Ok(EncodedValue {
            raw: value.to_string(),
            compressed: false,
        })
    }

    /// Recover the logical value from its stored form
    pub fn decode(&self, key: &str, raw: &str, compressed: bool) -> Result<String> {
        if !compressed {
            return Ok(raw.to_string());
        }

        let packed = STANDARD
            .decode(raw)
            .map_err(|e| Error::corrupted(key, format!("compressed payload is not base64: {e}")))?;

        let mut decoder = GzDecoder::new(&packed[..]);
        let mut text = String::new();
        decoder
            .read_to_string(&mut text)
            .map_err(|e| Error::compression(key, "decompress", e))?;
        Ok(text)
    }

    fn compress(&self, key: &str, value: &str) -> Result<String> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::new(self.level));
        encoder
            .write_all(value.as_bytes())
            .map_err(|e| Error::compression(key, "compress", e))?;
        let packed = encoder
            .finish()
            .map_err(|e| Error::compression(key, "compress", e))?;
        Ok(STANDARD.encode(packed))
    }
}
