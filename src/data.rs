//! Common data types
use std::borrow::Cow;

pub type Text<'a> = Cow<'a, str>;

/// COMBINING MACRON (U+0304), the mark the upstream encoder most often
/// mangles into a `<0xE2><0x81><0xAF>` byte run.
pub const COMBINING_MACRON: char = '\u{0304}';

/// Code point the generic UTF-8 decode of `E2 81 AF` actually yields
/// (NOMINAL DIGIT SHAPES); remapped to [`COMBINING_MACRON`] on sight.
pub const ENCODER_BUG_CODE_POINT: char = '\u{206F}';

pub static COMBINING_MARK_RANGES: &'static [(u32, u32)] = &[
    (0x0300, 0x036F), // Combining Diacritical Marks
    (0x1AB0, 0x1AFF), // Combining Diacritical Marks Extended
    (0x1DC0, 0x1DFF), // Combining Diacritical Marks Supplement
    (0x20D0, 0x20FF), // Combining Diacritical Marks for Symbols
    (0xFE20, 0xFE2F), // Combining Half Marks
];

pub fn is_combining_mark(ch: char) -> bool {
    if ch == COMBINING_MACRON {
        return true;
    }
    let code = ch as u32;
    for (start, end) in COMBINING_MARK_RANGES {
        if code >= *start && code <= *end {
            return true;
        }
    }
    false
}

///////////////////////////////////////////////////////////////////////////////
// HEX RUNS
///////////////////////////////////////////////////////////////////////////////

/// A maximal adjacent sequence of literal `<0xHH>` tokens, located by byte
/// offset in the source text, carrying the raw byte values in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexRun {
    pub start: usize,
    pub end: usize,
    pub bytes: Vec<u8>,
}

impl HexRun {
    pub fn source_text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// The decoded rendering of one [`HexRun`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSpan {
    pub text: String,
    pub combining: bool,
}

impl DecodedSpan {
    pub fn new(text: String) -> Self {
        let combining = {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => is_combining_mark(ch),
                _ => false,
            }
        };
        DecodedSpan { text, combining }
    }
    /// The decoded character, when the span is a lone combining mark.
    pub fn unpack_combining_mark(&self) -> Option<char> {
        if self.combining {
            self.text.chars().next()
        } else {
            None
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
// TESTS
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combining_mark_ranges() {
        assert!(is_combining_mark('\u{0304}'));
        assert!(is_combining_mark('\u{0300}'));
        assert!(is_combining_mark('\u{036F}'));
        assert!(is_combining_mark('\u{20D0}'));
        assert!(is_combining_mark('\u{FE2F}'));
        assert!(!is_combining_mark('x'));
        assert!(!is_combining_mark('\u{2099}')); // subscript n, not a mark
    }

    #[test]
    fn decoded_span_classification() {
        assert!(DecodedSpan::new("\u{0304}".to_owned()).combining);
        assert!(!DecodedSpan::new("A".to_owned()).combining);
        // two characters never count as a lone mark
        assert!(!DecodedSpan::new("x\u{0304}".to_owned()).combining);
        assert!(!DecodedSpan::new(String::new()).combining);
    }
}
