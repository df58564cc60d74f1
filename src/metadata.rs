use std::fmt;

/// CSV dialect used to parse an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Field delimiter character.
    pub delimiter: u8,
    /// Quote character configuration.
    pub quote: Quote,
    /// Line terminator found in the sample.
    pub line_terminator: LineTerminator,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: Quote::Some(b'"'),
            line_terminator: LineTerminator::LF,
        }
    }
}

impl Dialect {
    /// Create a new Dialect with the given parameters.
    pub const fn new(delimiter: u8, quote: Quote, line_terminator: LineTerminator) -> Self {
        Self {
            delimiter,
            quote,
            line_terminator,
        }
    }

    /// The standard dialect: comma, double quote, LF.
    pub fn comma() -> Self {
        Self::default()
    }
}

/// Quote character configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quote {
    /// No quoting.
    None,
    /// Quote with the specified character.
    Some(u8),
}

impl Default for Quote {
    fn default() -> Self {
        Quote::Some(b'"')
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quote::None => write!(f, "none"),
            Quote::Some(c) => write!(f, "{}", *c as char),
        }
    }
}

/// Line terminator sequences.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineTerminator {
    /// Unix-style line ending (\n).
    #[default]
    LF,
    /// Windows-style line ending (\r\n).
    CRLF,
    /// Old Mac-style line ending (\r).
    CR,
}

impl fmt::Display for LineTerminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineTerminator::LF => write!(f, "\\n"),
            LineTerminator::CRLF => write!(f, "\\r\\n"),
            LineTerminator::CR => write!(f, "\\r"),
        }
    }
}
