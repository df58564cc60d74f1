//! Candidate dialects and line terminator handling.

use std::borrow::Cow;

use crate::metadata::{LineTerminator, Quote};

/// Delimiters to test, ordered by frequency in real-world data.
/// Colon is excluded as it commonly appears in time values (HH:MM:SS).
pub const DELIMITERS: &[u8] = b",;\t| ^~#&/";

/// Quote characters to test.
pub const QUOTES: &[Quote] = &[
    Quote::Some(b'"'),  // Double quote (most common)
    Quote::Some(b'\''), // Single quote
    Quote::None,        // No quoting
];

/// A delimiter/quote combination to score against the sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub delimiter: u8,
    pub quote: Quote,
}

impl Candidate {
    pub const fn new(delimiter: u8, quote: Quote) -> Self {
        Self { delimiter, quote }
    }
}

/// Generate the candidates to score.
///
/// With a forced delimiter only the quote character varies.
pub fn generate_candidates(forced_delimiter: Option<u8>) -> Vec<Candidate> {
    let delimiters: &[u8] = match forced_delimiter {
        Some(ref d) => std::slice::from_ref(d),
        None => DELIMITERS,
    };

    delimiters
        .iter()
        .flat_map(|&d| QUOTES.iter().map(move |&q| Candidate::new(d, q)))
        .collect()
}

/// Detect the most likely line terminator from data.
pub fn detect_line_terminator(data: &[u8]) -> LineTerminator {
    let mut crlf_count = 0;
    let mut lf_count = 0;
    let mut cr_count = 0;

    let mut i = 0;
    while i < data.len() {
        if data[i] == b'\r' {
            if i + 1 < data.len() && data[i + 1] == b'\n' {
                crlf_count += 1;
                i += 2;
                continue;
            }
            cr_count += 1;
        } else if data[i] == b'\n' {
            lf_count += 1;
        }
        i += 1;
    }

    if crlf_count > 0 && crlf_count >= lf_count && crlf_count >= cr_count {
        LineTerminator::CRLF
    } else if lf_count >= cr_count {
        LineTerminator::LF
    } else {
        LineTerminator::CR
    }
}

/// Rewrite bare `\r` terminators as `\n`.
///
/// The `csv` crate already understands LF and CRLF, so only old Mac-style
/// data needs copying.
pub fn normalize_line_endings(data: &[u8], line_terminator: LineTerminator) -> Cow<'_, [u8]> {
    match line_terminator {
        LineTerminator::LF | LineTerminator::CRLF => Cow::Borrowed(data),
        LineTerminator::CR => Cow::Owned(
            data.iter()
                .map(|&b| if b == b'\r' { b'\n' } else { b })
                .collect(),
        ),
    }
}

/// Drop a trailing partial line from a sample cut off at the byte limit.
///
/// Samples without any line break are returned unchanged.
pub fn trim_partial_line(sample: &[u8]) -> &[u8] {
    match sample.iter().rposition(|&b| b == b'\n' || b == b'\r') {
        Some(pos) => &sample[..=pos],
        None => sample,
    }
}
