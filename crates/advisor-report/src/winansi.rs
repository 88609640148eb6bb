//! WinAnsi (Windows-1252) text encoding
//!
//! The standard Helvetica font only carries the WinAnsi glyph set, so every
//! shown string is transcoded to single bytes before it enters a content
//! stream. Characters without a WinAnsi code are rejected rather than
//! written as bytes a viewer would misread.

use advisor_model::RenderError;

/// Font `/Encoding` name matching [`encode`]
pub const ENCODING_NAME: &str = "WinAnsiEncoding";

/// Characters at codes 0x80..=0x9F; `None` marks unassigned codes
const HIGH_CODES: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

fn encode_char(c: char) -> Option<u8> {
    match c {
        // Helvetica has no tab glyph
        '\t' => Some(b' '),
        ' '..='~' | '\u{A0}'..='\u{FF}' => u8::try_from(u32::from(c)).ok(),
        _ => HIGH_CODES
            .iter()
            .position(|code| *code == Some(c))
            .and_then(|i| u8::try_from(0x80 + i).ok()),
    }
}

/// Transcode `text` to WinAnsi bytes
///
/// Tabs become single spaces.
///
/// # Errors
/// `RenderError::Encoding` naming the first character with no WinAnsi code.
pub fn encode(text: &str) -> Result<Vec<u8>, RenderError> {
    text.chars()
        .map(|c| {
            encode_char(c).ok_or_else(|| {
                RenderError::Encoding(format!(
                    "character {c:?} (U+{:04X}) cannot be shown in the report font",
                    u32::from(c)
                ))
            })
        })
        .collect()
}

/// Decode WinAnsi bytes; unassigned codes become U+FFFD
#[must_use]
pub fn decode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x20..=0x7E | 0xA0..=0xFF => char::from(b),
            0x80..=0x9F => HIGH_CODES[usize::from(b - 0x80)].unwrap_or('\u{FFFD}'),
            _ => '\u{FFFD}',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typographic_punctuation_uses_high_codes() {
        assert_eq!(encode("\u{2013}").unwrap(), vec![0x96]);
        assert_eq!(encode("\u{2022}").unwrap(), vec![0x95]);
        assert_eq!(encode("it\u{2019}s").unwrap(), b"it\x92s".to_vec());
        assert_eq!(encode("\u{20AC}5").unwrap(), vec![0x80, b'5']);
    }

    #[test]
    fn latin1_letters_are_single_bytes() {
        assert_eq!(encode("Jos\u{e9}").unwrap(), b"Jos\xe9".to_vec());
        assert_eq!(decode(b"Jos\xe9"), "Jos\u{e9}");
    }

    #[test]
    fn characters_outside_the_set_are_rejected() {
        let err = encode("Ajman \u{0639}\u{062C}\u{0645}\u{0627}\u{0646}").unwrap_err();
        assert!(matches!(err, RenderError::Encoding(ref m) if m.contains("U+0639")), "{err}");
        assert!(encode("villa \u{1F3E0}").is_err());
    }

    #[test]
    fn unassigned_codes_decode_to_replacement() {
        assert_eq!(decode(&[0x81, 0x09]), "\u{FFFD}\u{FFFD}");
    }

    #[test]
    fn every_encodable_char_decodes_back() {
        for b in (0x20u8..=0x7E).chain(0x80..=0xFF) {
            let text = decode(&[b]);
            if text != "\u{FFFD}" {
                assert_eq!(encode(&text).unwrap(), vec![b], "code {b:#04x}");
            }
        }
    }
}
