use encoding_rs::SHIFT_JIS;

use super::error::{QRError, QRResult};

// Character set
//------------------------------------------------------------------------------

/// Byte-mode text encodings with their ECI designators. ISO-8859-1 is the
/// default and is emitted without an ECI header; the others are only chosen
/// by explicit hint.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum CharacterSet {
    Iso8859_1,
    ShiftJis,
    Utf8,
}

impl CharacterSet {
    /// Lookup by the common label spellings, case insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "ISO-8859-1" | "ISO8859_1" | "LATIN-1" | "LATIN1" => Some(Self::Iso8859_1),
            "SHIFT_JIS" | "SHIFT-JIS" | "SJIS" => Some(Self::ShiftJis),
            "UTF-8" | "UTF8" => Some(Self::Utf8),
            _ => None,
        }
    }

    /// ECI assignment number
    pub fn eci_value(self) -> u8 {
        match self {
            Self::Iso8859_1 => 3,
            Self::ShiftJis => 20,
            Self::Utf8 => 26,
        }
    }

    pub fn encode(self, content: &str) -> QRResult<Vec<u8>> {
        match self {
            Self::Iso8859_1 => content
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c))
                        .map_err(|_| QRError::EncodingError("character not in ISO-8859-1"))
                })
                .collect(),
            Self::ShiftJis => {
                let (bytes, _, had_errors) = SHIFT_JIS.encode(content);
                if had_errors {
                    return Err(QRError::EncodingError("character not in Shift_JIS"));
                }
                Ok(bytes.into_owned())
            }
            Self::Utf8 => Ok(content.as_bytes().to_vec()),
        }
    }
}

#[cfg(test)]
mod charset_tests {
    use super::CharacterSet;
    use crate::common::error::QRError;

    #[test]
    fn test_from_name() {
        assert_eq!(CharacterSet::from_name("ISO-8859-1"), Some(CharacterSet::Iso8859_1));
        assert_eq!(CharacterSet::from_name("latin1"), Some(CharacterSet::Iso8859_1));
        assert_eq!(CharacterSet::from_name("Shift_JIS"), Some(CharacterSet::ShiftJis));
        assert_eq!(CharacterSet::from_name("utf-8"), Some(CharacterSet::Utf8));
        assert_eq!(CharacterSet::from_name("EBCDIC"), None);
    }

    #[test]
    fn test_eci_values() {
        assert_eq!(CharacterSet::Iso8859_1.eci_value(), 3);
        assert_eq!(CharacterSet::ShiftJis.eci_value(), 20);
        assert_eq!(CharacterSet::Utf8.eci_value(), 26);
    }

    #[test]
    fn test_encode_latin1() {
        assert_eq!(CharacterSet::Iso8859_1.encode("héllo").unwrap(), b"h\xE9llo");
        assert_eq!(
            CharacterSet::Iso8859_1.encode("日本"),
            Err(QRError::EncodingError("character not in ISO-8859-1"))
        );
    }

    #[test]
    fn test_encode_shift_jis() {
        assert_eq!(CharacterSet::ShiftJis.encode("点").unwrap(), b"\x93_");
        assert!(CharacterSet::ShiftJis.encode("🎈").is_err());
    }

    #[test]
    fn test_encode_utf8() {
        assert_eq!(CharacterSet::Utf8.encode("héllo").unwrap(), "héllo".as_bytes());
    }
}
