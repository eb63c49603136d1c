//! Rewrite literal `<sub>…</sub>` markup into real Unicode subscript glyphs.
//!
//! The upstream renderer emits the markup as plain text instead of an HTML
//! element, so `H<sub>2</sub>O` reaches the user verbatim. Characters with
//! no subscript form pass through unchanged.
use std::borrow::Cow;
use std::collections::HashMap;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::data::Text;

lazy_static! {
    pub static ref SUBSCRIPT_TABLE: HashMap<char, char> = {
        let pairs: &[(char, char)] = &[
            ('0', '₀'),
            ('1', '₁'),
            ('2', '₂'),
            ('3', '₃'),
            ('4', '₄'),
            ('5', '₅'),
            ('6', '₆'),
            ('7', '₇'),
            ('8', '₈'),
            ('9', '₉'),
            ('+', '₊'),
            ('-', '₋'),
            ('=', '₌'),
            ('(', '₍'),
            (')', '₎'),
            ('a', 'ₐ'),
            ('e', 'ₑ'),
            ('h', 'ₕ'),
            ('i', 'ᵢ'),
            ('j', 'ⱼ'),
            ('k', 'ₖ'),
            ('l', 'ₗ'),
            ('m', 'ₘ'),
            ('n', 'ₙ'),
            ('o', 'ₒ'),
            ('p', 'ₚ'),
            ('r', 'ᵣ'),
            ('s', 'ₛ'),
            ('t', 'ₜ'),
            ('u', 'ᵤ'),
            ('v', 'ᵥ'),
            ('x', 'ₓ'),
        ];
        pairs.iter().copied().collect()
    };
    /// Content admits no `<`, so an unterminated or nested wrapper never
    /// matches and is left untouched.
    static ref SUB_SPAN: Regex = Regex::new(r"<sub>([^<]+)</sub>").unwrap();
}

pub fn to_subscript(ch: char) -> Option<char> {
    SUBSCRIPT_TABLE.get(&ch).copied()
}

fn map_content(content: &str) -> String {
    content
        .chars()
        .map(|ch| to_subscript(ch).unwrap_or(ch))
        .collect()
}

/// Replace every `<sub>…</sub>` span, wrapper included, with its
/// subscript-mapped content. Identity (borrowed) when nothing matches.
pub fn rewrite(text: &str) -> Text<'_> {
    if !text.contains("<sub>") {
        return Cow::Borrowed(text);
    }
    SUB_SPAN.replace_all(text, |caps: &Captures| {
        let mapped = map_content(&caps[1]);
        log::trace!("subscript span {:?} -> {:?}", &caps[0], mapped);
        mapped
    })
}

///////////////////////////////////////////////////////////////////////////////
// TESTS
///////////////////////////////////////////////////////////////////////////////
