//! Encoding resolution, decoding and encoding using chardetng and `encoding_rs`.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use simdutf8::basic::from_utf8;

use crate::error::{Result, TidyError};

/// Label that asks for encoding detection instead of a fixed encoding.
pub const AUTO_LABEL: &str = "auto";

/// Check if the given bytes are valid UTF-8.
///
/// Uses SIMD-accelerated validation for performance.
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// Check if the data starts with a UTF-8 BOM (Byte Order Mark).
///
/// The UTF-8 BOM is the byte sequence: EF BB BF
pub fn has_utf8_bom(data: &[u8]) -> bool {
    data.len() >= 3 && data[0] == 0xEF && data[1] == 0xBB && data[2] == 0xBF
}

/// Skip the UTF-8 BOM if present and return the remaining data.
pub fn skip_bom(data: &[u8]) -> &[u8] {
    if has_utf8_bom(data) { &data[3..] } else { data }
}

/// Decode bytes as UTF-8, silently dropping invalid sequences.
///
/// Used for the sniffing sample only: a wrong guess about the file's real
/// encoding must never make the sample unusable.
pub fn decode_lossy(data: &[u8]) -> String {
    let data = skip_bom(data);
    if let Ok(text) = from_utf8(data) {
        return text.to_owned();
    }
    data.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Guess the encoding of raw bytes.
///
/// UTF-16 BOMs are checked first (chardetng doesn't handle these well), then
/// valid UTF-8, then chardetng for legacy encodings such as Windows-1251,
/// GBK or ISO-8859 variants.
pub fn guess_encoding(data: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(data) {
        return encoding;
    }

    if is_utf8(data) {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    detector.guess(None, true)
}

/// Text encoding used to read input files and write output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// A fixed encoding resolved from a WHATWG label.
    Fixed(&'static Encoding),
    /// Detect the encoding from the file contents.
    Detect,
}

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding::Fixed(UTF_8)
    }
}

impl TextEncoding {
    /// Resolve an encoding label such as `utf-8`, `latin1` or `gbk`.
    ///
    /// The label `auto` selects detection.
    pub fn from_label(label: &str) -> Result<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case(AUTO_LABEL) {
            return Ok(TextEncoding::Detect);
        }

        Encoding::for_label(label.as_bytes())
            .map(TextEncoding::Fixed)
            .ok_or_else(|| TidyError::Configuration(format!("unknown encoding '{label}'")))
    }

    /// Returns the canonical name of the encoding, or `auto`.
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Fixed(encoding) => encoding.name(),
            TextEncoding::Detect => AUTO_LABEL,
        }
    }

    /// Decode the complete input, failing on malformed sequences.
    ///
    /// A leading BOM overrides the declared encoding and is stripped.
    pub fn decode(&self, data: &[u8]) -> Result<String> {
        let declared = match self {
            TextEncoding::Fixed(encoding) => *encoding,
            TextEncoding::Detect => guess_encoding(data),
        };
        let (encoding, body) = match Encoding::for_bom(data) {
            Some((encoding, bom_len)) => (encoding, &data[bom_len..]),
            None => (declared, data),
        };

        if encoding == UTF_8 {
            return from_utf8(body).map(str::to_owned).map_err(|_| {
                TidyError::Encoding("input is not valid UTF-8".to_string())
            });
        }

        encoding
            .decode_without_bom_handling_and_without_replacement(body)
            .map(|text| text.into_owned())
            .ok_or_else(|| TidyError::Encoding(format!("input is not valid {}", encoding.name())))
    }

    /// Encode text for output.
    ///
    /// `encoding_rs` cannot produce UTF-16, so UTF-16 labels write UTF-8.
    /// Detection also writes UTF-8.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        let encoding = match self {
            TextEncoding::Fixed(encoding) => encoding.output_encoding(),
            TextEncoding::Detect => UTF_8,
        };

        let (bytes, _, had_errors) = encoding.encode(text);
        if had_errors {
            return Err(TidyError::Encoding(format!(
                "text cannot be represented in {}",
                encoding.name()
            )));
        }
        Ok(bytes.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_utf8() {
        assert!(is_utf8(b"Hello, World!"));
        assert!(is_utf8("こんにちは".as_bytes()));
        assert!(is_utf8(b""));
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(!is_utf8(&[0xFF, 0xFE]));
        assert!(!is_utf8(&[0x80, 0x81, 0x82]));
    }

    #[test]
    fn test_utf8_bom() {
        let with_bom = [0xEF, 0xBB, 0xBF, b'a', b'b', b'c'];
        let without_bom = b"abc";

        assert!(has_utf8_bom(&with_bom));
        assert!(!has_utf8_bom(without_bom));

        assert_eq!(skip_bom(&with_bom), b"abc");
        assert_eq!(skip_bom(without_bom), b"abc");
    }

    #[test]
    fn test_decode_lossy_drops_invalid_bytes() {
        let data = [b'a', b',', 0xFF, b'b', b'\n'];
        assert_eq!(decode_lossy(&data), "a,b\n");
    }

    #[test]
    fn test_from_label() {
        assert_eq!(TextEncoding::from_label("utf-8").unwrap().name(), "UTF-8");
        assert_eq!(
            TextEncoding::from_label("latin1").unwrap().name(),
            "windows-1252"
        );
        assert_eq!(
            TextEncoding::from_label("AUTO").unwrap(),
            TextEncoding::Detect
        );
        assert!(TextEncoding::from_label("klingon").is_err());
    }

    #[test]
    fn test_decode_strict_utf8_fails_on_invalid() {
        let result = TextEncoding::default().decode(&[b'a', 0xFF, b'b']);
        assert!(matches!(result, Err(TidyError::Encoding(_))));
    }

    #[test]
    fn test_decode_strips_bom() {
        let data = [0xEF, 0xBB, 0xBF, b'i', b'd'];
        assert_eq!(TextEncoding::default().decode(&data).unwrap(), "id");
    }

    #[test]
    fn test_decode_utf16_le_bom() {
        let data: &[u8] = &[0xFF, 0xFE, b'H', 0x00, b'i', 0x00];
        assert_eq!(TextEncoding::Detect.decode(data).unwrap(), "Hi");
    }

    #[test]
    fn test_decode_detects_windows1251() {
        // "Привет" in Windows-1251
        let data: &[u8] = &[0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2];
        let text = TextEncoding::Detect.decode(data).unwrap();
        assert!(is_utf8(text.as_bytes()));
        assert!(!text.is_empty());
    }

    #[test]
    fn test_encode_latin1() {
        let encoding = TextEncoding::from_label("latin1").unwrap();
        assert_eq!(encoding.encode("café").unwrap(), b"caf\xe9");
        assert!(encoding.encode("東京").is_err());
    }
}
