//! Decode literal `<0xHH>` escape runs back into the text they encode.
//!
//! The upstream renderer sometimes serializes the raw UTF-8 bytes of a
//! character as adjacent `<0xHH>` tokens instead of the character itself.
//! A maximal run of adjacent tokens is decoded as one byte sequence; a run
//! that yields a lone combining mark is reattached to a neighboring base
//! character instead of being spliced in place.
use std::borrow::Cow;
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::data::*;

lazy_static! {
    // the digits are case-insensitive; the `0x` prefix is not
    static ref HEX_RUN: Regex = Regex::new(r"(?:<0x[0-9a-fA-F]{2}>)+").unwrap();
    static ref HEX_TOKEN: Regex = Regex::new(r"<0x([0-9a-fA-F]{2})>").unwrap();
}

/// The encoder's byte rendering of the combining macron. Generic UTF-8
/// decoding of these bytes yields U+206F, not the mark.
static MACRON_BYTES: &'static [u8] = &[0xE2, 0x81, 0xAF];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("byte run [{}] is not valid UTF-8", bytes_repr(.0))]
    InvalidUtf8(Vec<u8>),
}

fn bytes_repr(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).join(" ")
}

///////////////////////////////////////////////////////////////////////////////
// RUN DETECTION
///////////////////////////////////////////////////////////////////////////////

/// One forward scan; runs come back in source order and never overlap,
/// since each regex match consumes every adjacent token.
pub fn find_runs(text: &str) -> Vec<HexRun> {
    HEX_RUN
        .find_iter(text)
        .map(|m| {
            let bytes = HEX_TOKEN
                .captures_iter(m.as_str())
                .map(|cap| u8::from_str_radix(&cap[1], 16).unwrap())
                .collect();
            HexRun {
                start: m.start(),
                end: m.end(),
                bytes,
            }
        })
        .collect()
}

///////////////////////////////////////////////////////////////////////////////
// RUN DECODING
///////////////////////////////////////////////////////////////////////////////

pub fn decode_run(bytes: &[u8]) -> Result<DecodedSpan, DecodeError> {
    if bytes == MACRON_BYTES {
        return Ok(DecodedSpan::new(COMBINING_MACRON.to_string()));
    }
    let decoded = String::from_utf8(bytes.to_vec())
        .map_err(|_| DecodeError::InvalidUtf8(bytes.to_vec()))?;
    // Safety net behind the byte-level check above: remap the bugged code
    // point wherever the generic path produces it.
    let decoded = if decoded.contains(ENCODER_BUG_CODE_POINT) {
        decoded
            .chars()
            .map(|ch| {
                if ch == ENCODER_BUG_CODE_POINT {
                    COMBINING_MACRON
                } else {
                    ch
                }
            })
            .collect()
    } else {
        decoded
    };
    Ok(DecodedSpan::new(decoded))
}

///////////////////////////////////////////////////////////////////////////////
// SPLICING
///////////////////////////////////////////////////////////////////////////////

/// Attach a lone combining mark to a base character. Returns how many bytes
/// of `rest` (the text following the run) were consumed as the base.
fn attach_mark(out: &mut String, mark: char, rest: &str) -> usize {
    let base = rest
        .graphemes(true)
        .next()
        .filter(|g| g.chars().next().map(|ch| !ch.is_whitespace()).unwrap_or(false));
    if let Some(base) = base {
        out.push_str(base);
        out.push(mark);
        return base.len();
    }
    // Attach-backward fallback: a combining mark binds to whatever precedes
    // it, so appending to the emitted text is the attachment. With nothing
    // emitted (or trailing whitespace) the mark stands alone.
    out.push(mark);
    0
}

fn splice_runs(text: &str) -> (String, bool) {
    let runs = find_runs(text);
    if runs.is_empty() {
        return (text.to_owned(), false);
    }
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut mutated = false;
    for run in &runs {
        out.push_str(&text[cursor..run.start]);
        cursor = run.end;
        match decode_run(&run.bytes) {
            Ok(span) => {
                mutated = true;
                match span.unpack_combining_mark() {
                    Some(mark) => {
                        cursor += attach_mark(&mut out, mark, &text[cursor..]);
                    }
                    None => out.push_str(&span.text),
                }
            }
            Err(err) => {
                log::debug!("{}; keeping literal {:?}", err, run.source_text(text));
                out.push_str(run.source_text(text));
            }
        }
    }
    out.push_str(&text[cursor..]);
    (out, mutated)
}

/// The two most common corruptions observed in the wild, rewritten before
/// the generic scan.
fn pre_substitute(text: &str) -> Cow<'_, str> {
    const MACRON_X: &str = "<0xE2><0x81><0xAF>x";
    const MACRON_Y: &str = "<0xE2><0x81><0xAF>y";
    if !text.contains(MACRON_X) && !text.contains(MACRON_Y) {
        return Cow::Borrowed(text);
    }
    let out = text
        .replace(MACRON_X, "x\u{0304}")
        .replace(MACRON_Y, "y\u{0304}");
    Cow::Owned(out)
}

///////////////////////////////////////////////////////////////////////////////
// ENTRYPOINT
///////////////////////////////////////////////////////////////////////////////

/// Decode every maximal `<0xHH>` run in `text`. Runs that fail to decode
/// stay in the output verbatim; a changed result is NFC-normalized so that
/// reattached marks settle into their precomposed forms. Identity
/// (borrowed) when nothing decodes.
pub fn decode(text: &str) -> Text<'_> {
    if !text.contains("<0x") {
        return Cow::Borrowed(text);
    }
    let presub = pre_substitute(text);
    let presub_changed = matches!(presub, Cow::Owned(_));
    let (spliced, mutated) = splice_runs(&presub);
    if !mutated && !presub_changed {
        return Cow::Borrowed(text);
    }
    Cow::Owned(spliced.nfc().collect())
}

///////////////////////////////////////////////////////////////////////////////
// TESTS
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_byte_run() {
        assert_eq!(decode("<0x41>"), "A");
        assert_eq!(decode("a<0x42>c"), "aBc");
    }

    #[test]
    fn multi_byte_run_decodes_as_one_sequence() {
        // E2 82 99 is the UTF-8 encoding of U+2099 (subscript n)
        assert_eq!(decode("<0xE2><0x82><0x99>"), "ₙ");
    }

    #[test]
    fn hex_digits_are_case_insensitive() {
        assert_eq!(decode("<0xe2><0x82><0x99>"), "ₙ");
        assert_eq!(decode("<0xc3><0xA9>"), "é");
    }

    #[test]
    fn several_runs_in_one_string() {
        assert_eq!(decode("A<0x42>C<0x44>"), "ABCD");
    }

    #[test]
    fn run_detection_is_maximal_and_ordered() {
        let runs = find_runs("x<0x41><0x42> y<0x43>");
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].bytes, vec![0x41, 0x42]);
        assert_eq!(runs[1].bytes, vec![0x43]);
        assert!(runs[0].end <= runs[1].start);
    }

    #[test]
    fn invalid_byte_run_kept_literal() {
        assert_eq!(decode("<0xFF>"), "<0xFF>");
        // a run is decoded whole; one bad byte keeps the whole run literal
        assert_eq!(decode("<0x41><0xFF>"), "<0x41><0xFF>");
        assert_eq!(decode("ok <0xC3> ok"), "ok <0xC3> ok");
    }

    #[test]
    fn decode_run_reports_invalid_utf8() {
        let err = decode_run(&[0xFF]).unwrap_err();
        assert_eq!(err, DecodeError::InvalidUtf8(vec![0xFF]));
        assert_eq!(err.to_string(), "byte run [FF] is not valid UTF-8");
    }

    #[test]
    fn macron_bytes_decode_to_combining_macron() {
        let span = decode_run(&[0xE2, 0x81, 0xAF]).unwrap();
        assert_eq!(span.text, "\u{0304}");
        assert!(span.combining);
    }

    #[test]
    fn mark_attaches_backward_to_preceding_character() {
        // no precomposed form exists for x + macron, so NFC keeps the pair
        assert_eq!(decode("x<0xE2><0x81><0xAF>"), "x\u{0304}");
        // CC 81 is U+0301 (combining acute); e + acute composes to é
        assert_eq!(decode("e<0xCC><0x81>"), "é");
    }

    #[test]
    fn mark_attaches_forward_and_consumes_its_base() {
        assert_eq!(decode("<0xCC><0x81>e"), "é");
        assert_eq!(decode("<0xCC><0x81>et"), "ét");
    }

    #[test]
    fn mark_with_no_base_stays_bare() {
        assert_eq!(decode("<0xCC><0x81> e"), "\u{0301} e");
        assert_eq!(decode("<0xCC><0x81>"), "\u{0301}");
    }

    #[test]
    fn pre_substitution_fast_path() {
        // x + macron has no precomposed form; y + macron folds to U+0233
        assert_eq!(decode("<0xE2><0x81><0xAF>x"), "x\u{0304}");
        assert_eq!(decode("f(<0xE2><0x81><0xAF>y)"), "f(\u{0233})");
    }

    #[test]
    fn identity_is_borrowed_when_nothing_decodes() {
        assert!(matches!(decode("no escapes here"), Cow::Borrowed(_)));
        assert!(matches!(decode("<0xGG> not a token"), Cow::Borrowed(_)));
        assert!(matches!(decode("<0xFF>"), Cow::Borrowed(_)));
    }
}
