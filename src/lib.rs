//! Repairs two kinds of encoding corruption found in a third-party
//! application's rendered chat text:
//!
//! * literal `<sub>…</sub>` markup that should have become true Unicode
//!   subscript glyphs;
//! * literal `<0xHH>` escape runs that should have been decoded as the raw
//!   UTF-8 bytes of the characters they represent, with combining marks
//!   reattached to a neighboring base character.
//!
//! The entry point is [`normalize`]; the result is NFC-normalized whenever
//! a repair is made.
//!
//! ```
//! assert_eq!(glyphfix::normalize("H<sub>2</sub>O"), "H₂O");
//! assert_eq!(glyphfix::normalize("<0xE2><0x82><0x99>"), "ₙ");
//! ```
pub mod data;
pub mod subscript;
pub mod hexbyte;
pub mod pipeline;
pub mod watch;
pub mod cli;

pub use crate::pipeline::{normalize, Pipeline, PipelineConfig};
