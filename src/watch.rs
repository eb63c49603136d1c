//! Boundary to the document-watching host.
//!
//! The host application observes its document for changed text units and
//! hands each one to the pipeline; everything about how it watches (DOM
//! mutation callbacks in the original) stays on its side of the line. Here
//! a source of changes is just something that can be polled for the next
//! changed text unit.
use std::io::BufRead;

use crate::pipeline::Pipeline;

pub trait TextEventSource {
    /// The next changed text unit, or `None` when the source is exhausted.
    fn poll(&mut self) -> Option<String>;
}

/// Treats each line of a reader as one text unit; chat transcripts are
/// line-structured.
pub struct Lines<R> {
    reader: R,
}

impl<R: BufRead> Lines<R> {
    pub fn new(reader: R) -> Self {
        Lines { reader }
    }
}

impl<R: BufRead> TextEventSource for Lines<R> {
    fn poll(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Some(line)
            }
            Err(err) => {
                log::warn!("stopping on read error: {}", err);
                None
            }
        }
    }
}

/// Drain a source through the pipeline, one normalized unit per change.
pub fn drive<S: TextEventSource>(mut source: S, pipeline: &Pipeline) -> Vec<String> {
    let mut results = Vec::new();
    while let Some(text) = source.poll() {
        results.push(pipeline.normalize(&text));
    }
    results
}

///////////////////////////////////////////////////////////////////////////////
// TESTS
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_yield_one_unit_per_line() {
        let input = "H<sub>2</sub>O\nplain\r\n<0x41>";
        let mut source = Lines::new(input.as_bytes());
        assert_eq!(source.poll(), Some("H<sub>2</sub>O".to_owned()));
        assert_eq!(source.poll(), Some("plain".to_owned()));
        assert_eq!(source.poll(), Some("<0x41>".to_owned()));
        assert_eq!(source.poll(), None);
    }

    #[test]
    fn drive_normalizes_every_unit() {
        let input = "H<sub>2</sub>O\n<0xE2><0x82><0x99>\nuntouched";
        let results = drive(Lines::new(input.as_bytes()), &Pipeline::default());
        assert_eq!(results, vec!["H₂O", "ₙ", "untouched"]);
    }
}
