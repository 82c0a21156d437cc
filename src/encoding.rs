//! Configurable text encoding for post sources and generated pages.

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::Encoding;

use crate::error::Error;

/// The encoding post files are read and written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(&'static Encoding);

impl Default for TextEncoding {
    fn default() -> Self {
        Self(encoding_rs::UTF_8)
    }
}

impl TextEncoding {
    /// Resolve a WHATWG label such as `utf-8`, `euc-kr` or `windows-1252`.
    ///
    /// Node.js buffer names (`utf16le`, `ucs2`, `binary`, `latin1`) are also
    /// accepted and mapped to their WHATWG equivalents.
    ///
    /// # Errors
    /// Returns [`Error::UnknownEncoding`] for labels `encoding_rs` does not know,
    /// and [`Error::UnwritableEncoding`] for decode-only encodings such as
    /// `replacement` (e.g. `iso-2022-kr`).
    pub fn from_label(label: &str) -> Result<Self, Error> {
        let trimmed = label.trim();
        let encoding = node_alias(trimmed)
            .or_else(|| Encoding::for_label(trimmed.as_bytes()))
            .ok_or_else(|| Error::UnknownEncoding(label.to_string()))?;
        if !is_utf16(encoding) && encoding.output_encoding() != encoding {
            return Err(Error::UnwritableEncoding(encoding.name().to_string()));
        }
        Ok(Self(encoding))
    }

    /// Canonical name, e.g. `UTF-8`.
    pub fn name(self) -> &'static str {
        self.0.name()
    }

    /// Decode file bytes, dropping a leading BOM that matches this encoding.
    ///
    /// `path` is only used for the error message.
    ///
    /// # Errors
    /// Returns [`Error::MalformedText`] if the bytes are not valid in this encoding.
    pub fn decode(self, bytes: &[u8], path: &Path) -> Result<String, Error> {
        let (text, malformed) = self.0.decode_with_bom_removal(bytes);
        if malformed {
            return Err(Error::MalformedText {
                path: path.to_path_buf(),
                encoding: self.name().to_string(),
            });
        }
        Ok(text.into_owned())
    }

    /// Encode text for writing.
    ///
    /// Characters the encoding cannot represent become numeric character
    /// references, which is harmless in generated HTML.
    pub fn encode(self, text: &str) -> Cow<'_, [u8]> {
        // encoding_rs only decodes UTF-16; its encoder would emit UTF-8.
        if self.0 == encoding_rs::UTF_16LE {
            return Cow::Owned(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
        }
        if self.0 == encoding_rs::UTF_16BE {
            return Cow::Owned(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
        }
        let (bytes, _, _) = self.0.encode(text);
        bytes
    }
}

fn node_alias(label: &str) -> Option<&'static Encoding> {
    match label.to_ascii_lowercase().as_str() {
        "utf16le" | "ucs2" | "ucs-2" => Some(encoding_rs::UTF_16LE),
        "binary" => Some(encoding_rs::WINDOWS_1252),
        _ => None,
    }
}

fn is_utf16(encoding: &'static Encoding) -> bool {
    encoding == encoding_rs::UTF_16LE || encoding == encoding_rs::UTF_16BE
}
