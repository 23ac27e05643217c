//! utils.rs
//! Input normalization and checksum helpers.

use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::{alphabet, Engine as _};
use bytes::Bytes;
use crc32fast::Hasher;

use crate::types::ZlibError;

static BASE64_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);
static BASE64_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// CRC-32 (IEEE) of `data`, continuing from `start`.
/// `compute_crc32(b, compute_crc32(a, 0)) == compute_crc32(a ++ b, 0)`.
pub fn compute_crc32(data: &[u8], start: u32) -> u32 {
    let mut hasher = Hasher::new_with_initial(start);
    hasher.update(data);
    hasher.finalize()
}

/// Text encodings accepted for string inputs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
    Utf16Le,
    Hex,
    Base64,
}

impl Encoding {
    pub fn from_label(label: &str) -> Result<Self, ZlibError> {
        match label.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "ascii" => Ok(Encoding::Ascii),
            "latin1" | "binary" => Ok(Encoding::Latin1),
            "utf16le" | "utf-16le" | "ucs2" | "ucs-2" => Ok(Encoding::Utf16Le),
            "hex" => Ok(Encoding::Hex),
            "base64" | "base64url" => Ok(Encoding::Base64),
            other => Err(ZlibError::InvalidInputType(format!(
                "unknown encoding '{other}'"
            ))),
        }
    }

    pub fn encode(self, text: &str) -> Result<Vec<u8>, ZlibError> {
        match self {
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
            Encoding::Ascii => text
                .chars()
                .map(|c| {
                    if c.is_ascii() {
                        Ok(c as u8)
                    } else {
                        Err(ZlibError::InvalidInputType(format!("non-ascii character {c:?}")))
                    }
                })
                .collect(),
            Encoding::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| {
                        ZlibError::InvalidInputType(format!("character {c:?} outside latin1"))
                    })
                })
                .collect(),
            Encoding::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Encoding::Hex => hex::decode(text.trim())
                .map_err(|e| ZlibError::InvalidInputType(format!("invalid hex: {e}"))),
            Encoding::Base64 => {
                let text = text.trim();
                let engine = if text.contains(['-', '_']) {
                    &BASE64_URL_SAFE
                } else {
                    &BASE64_STANDARD
                };
                engine
                    .decode(text)
                    .map_err(|e| ZlibError::InvalidInputType(format!("invalid base64: {e}")))
            }
        }
    }
}

/// Anything a one-shot call, async call or stream write accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum ZlibInput {
    Bytes(Bytes),
    Text { text: String, encoding: Encoding },
}

impl ZlibInput {
    pub fn text(text: impl Into<String>, encoding: Encoding) -> Self {
        ZlibInput::Text {
            text: text.into(),
            encoding,
        }
    }

    /// Text with an encoding given by name; unknown names are rejected.
    pub fn text_with_label(text: impl Into<String>, label: &str) -> Result<Self, ZlibError> {
        Ok(Self::text(text, Encoding::from_label(label)?))
    }

    pub fn into_bytes(self) -> Result<Bytes, ZlibError> {
        match self {
            ZlibInput::Bytes(b) => Ok(b),
            ZlibInput::Text { text, encoding } => match encoding {
                Encoding::Utf8 => Ok(Bytes::from(text.into_bytes())),
                other => other.encode(&text).map(Bytes::from),
            },
        }
    }
}

impl From<Bytes> for ZlibInput {
    fn from(b: Bytes) -> Self {
        ZlibInput::Bytes(b)
    }
}

impl From<Vec<u8>> for ZlibInput {
    fn from(v: Vec<u8>) -> Self {
        ZlibInput::Bytes(Bytes::from(v))
    }
}

impl From<&Vec<u8>> for ZlibInput {
    fn from(v: &Vec<u8>) -> Self {
        ZlibInput::Bytes(Bytes::copy_from_slice(v))
    }
}

impl From<&[u8]> for ZlibInput {
    fn from(s: &[u8]) -> Self {
        ZlibInput::Bytes(Bytes::copy_from_slice(s))
    }
}

impl<const N: usize> From<&[u8; N]> for ZlibInput {
    fn from(s: &[u8; N]) -> Self {
        ZlibInput::Bytes(Bytes::copy_from_slice(s))
    }
}

impl From<String> for ZlibInput {
    fn from(s: String) -> Self {
        ZlibInput::text(s, Encoding::Utf8)
    }
}

impl From<&str> for ZlibInput {
    fn from(s: &str) -> Self {
        ZlibInput::text(s, Encoding::Utf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc32_check_value() {
        assert_eq!(compute_crc32(b"123456789", 0), 0xCBF4_3926);
    }

    #[test]
    fn latin1_rejects_wide_chars() {
        assert!(Encoding::Latin1.encode("caf\u{e9}").is_ok());
        assert!(Encoding::Latin1.encode("\u{20ac}").is_err());
    }
}
