//! Final output encoding: raw bytes, lowercase hex, or padded standard base64.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RngError};

/// Output representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    #[default]
    Raw,
    Hex,
    Base64,
}

impl OutputMode {
    pub const ALL: [OutputMode; 3] = [Self::Raw, Self::Hex, Self::Base64];

    pub fn encoder(self) -> &'static dyn OutputEncoder {
        match self {
            Self::Raw => &RawEncoder,
            Self::Hex => &HexEncoder,
            Self::Base64 => &Base64Encoder,
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Hex => write!(f, "hex"),
            Self::Base64 => write!(f, "base64"),
        }
    }
}

/// Encodes `raw` into a caller buffer of at least [`encoded_len`] bytes.
///
/// [`encoded_len`]: OutputEncoder::encoded_len
pub trait OutputEncoder: Send + Sync {
    /// Encoded size for `raw_len` input bytes, `None` on overflow.
    fn encoded_len(&self, raw_len: usize) -> Option<usize>;

    /// Write the encoding of `raw` to the front of `out`; returns bytes written.
    fn encode(&self, raw: &[u8], out: &mut [u8]) -> Result<usize>;
}

fn destination<'a>(out: &'a mut [u8], needed: Option<usize>) -> Result<&'a mut [u8]> {
    let needed = needed.ok_or(RngError::InvalidArgument("encoded length overflows"))?;
    out.get_mut(..needed)
        .ok_or(RngError::InvalidArgument("output buffer too small"))
}

pub struct RawEncoder;

impl OutputEncoder for RawEncoder {
    fn encoded_len(&self, raw_len: usize) -> Option<usize> {
        Some(raw_len)
    }

    fn encode(&self, raw: &[u8], out: &mut [u8]) -> Result<usize> {
        let dst = destination(out, self.encoded_len(raw.len()))?;
        dst.copy_from_slice(raw);
        Ok(dst.len())
    }
}

/// Lowercase hex, two characters per byte.
pub struct HexEncoder;

impl OutputEncoder for HexEncoder {
    fn encoded_len(&self, raw_len: usize) -> Option<usize> {
        raw_len.checked_mul(2)
    }

    fn encode(&self, raw: &[u8], out: &mut [u8]) -> Result<usize> {
        let dst = destination(out, self.encoded_len(raw.len()))?;
        hex::encode_to_slice(raw, dst).map_err(|_| RngError::InvalidArgument("hex destination"))?;
        Ok(dst.len())
    }
}

/// RFC 4648 standard alphabet with `=` padding.
pub struct Base64Encoder;

impl OutputEncoder for Base64Encoder {
    fn encoded_len(&self, raw_len: usize) -> Option<usize> {
        raw_len.div_ceil(3).checked_mul(4)
    }

    fn encode(&self, raw: &[u8], out: &mut [u8]) -> Result<usize> {
        let dst = destination(out, self.encoded_len(raw.len()))?;
        STANDARD
            .encode_slice(raw, dst)
            .map_err(|_| RngError::InvalidArgument("base64 destination"))
    }
}
