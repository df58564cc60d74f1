//! Delimiter sniffer over a raw byte sample.
//!
//! The sample is read as bytes and decoded permissively, so a wrong
//! assumption about the file's real encoding cannot corrupt the text used to
//! pick the delimiter.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::encoding::decode_lossy;
use crate::error::{Result, TidyError};
use crate::metadata::Dialect;
use crate::sniff::candidates::{
    detect_line_terminator, generate_candidates, normalize_line_endings, trim_partial_line,
};
use crate::sniff::score::{find_best, score_candidates};

/// Number of leading bytes inspected by default.
pub const DEFAULT_SAMPLE_LEN: usize = 2048;

/// CSV delimiter sniffer.
///
/// # Example
///
/// ```
/// use csvtidy::Sniffer;
///
/// let dialect = Sniffer::new()
///     .sniff_bytes(b"name;age\nAlice;30\nBob;25\n")
///     .unwrap();
/// assert_eq!(dialect.delimiter, b';');
/// ```
#[derive(Debug, Clone)]
pub struct Sniffer {
    /// Maximum number of bytes to inspect.
    sample_len: usize,
    /// Optional forced delimiter.
    forced_delimiter: Option<u8>,
}

impl Default for Sniffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sniffer {
    /// Create a new Sniffer with default settings.
    pub fn new() -> Self {
        Self {
            sample_len: DEFAULT_SAMPLE_LEN,
            forced_delimiter: None,
        }
    }

    /// Set the number of leading bytes to inspect.
    pub fn sample_len(&mut self, sample_len: usize) -> &mut Self {
        self.sample_len = sample_len.max(1);
        self
    }

    /// Force a specific delimiter (skip delimiter detection).
    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.forced_delimiter = Some(delimiter);
        self
    }

    /// Sniff the CSV file at the given path.
    pub fn sniff_path<P: AsRef<Path>>(&self, path: P) -> Result<Dialect> {
        let file = File::open(path.as_ref())?;
        self.sniff_reader(file)
    }

    /// Sniff the first bytes of a reader.
    pub fn sniff_reader<R: Read>(&self, reader: R) -> Result<Dialect> {
        let mut sample = Vec::with_capacity(self.sample_len + 1);
        reader
            .take(self.sample_len as u64 + 1)
            .read_to_end(&mut sample)?;
        self.sniff_bytes(&sample)
    }

    /// Sniff a byte buffer; only the first `sample_len` bytes are inspected.
    pub fn sniff_bytes(&self, data: &[u8]) -> Result<Dialect> {
        if data.is_empty() {
            return Err(TidyError::EmptyInput);
        }

        let truncated = data.len() > self.sample_len;
        let sample = &data[..data.len().min(self.sample_len)];
        Ok(self.sniff_sample(sample, truncated))
    }

    fn sniff_sample(&self, sample: &[u8], truncated: bool) -> Dialect {
        let text = decode_lossy(sample);
        let mut bytes = text.as_bytes();
        if truncated {
            bytes = trim_partial_line(bytes);
        }

        let line_terminator = detect_line_terminator(bytes);
        let normalized = normalize_line_endings(bytes, line_terminator);

        let candidates = generate_candidates(self.forced_delimiter);
        let scores = score_candidates(&normalized, &candidates);

        match find_best(&scores) {
            Some(best) => {
                debug!(
                    delimiter = ?(best.candidate.delimiter as char),
                    quote = %best.candidate.quote,
                    gamma = best.gamma,
                    uniform = best.is_uniform,
                    "Sniffed CSV dialect"
                );
                Dialect::new(best.candidate.delimiter, best.candidate.quote, line_terminator)
            }
            None => {
                debug!("No candidate dialect scored; falling back to comma");
                Dialect {
                    delimiter: self.forced_delimiter.unwrap_or(b','),
                    line_terminator,
                    ..Dialect::default()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{LineTerminator, Quote};
    use std::io::Cursor;

    #[test]
    fn test_sniffer_builder() {
        let mut sniffer = Sniffer::new();
        sniffer.sample_len(512).delimiter(b',');

        assert_eq!(sniffer.sample_len, 512);
        assert_eq!(sniffer.forced_delimiter, Some(b','));
    }

    #[test]
    fn test_sniff_comma() {
        let data = b"name,age,city\nAlice,30,NYC\nBob,25,LA\n";
        let dialect = Sniffer::new().sniff_bytes(data).unwrap();

        assert_eq!(dialect.delimiter, b',');
        assert_eq!(dialect.quote, Quote::Some(b'"'));
    }

    #[test]
    fn test_sniff_tsv() {
        let data = b"name\tage\tcity\nAlice\t30\tNYC\nBob\t25\tLA\n";
        let dialect = Sniffer::new().sniff_bytes(data).unwrap();
        assert_eq!(dialect.delimiter, b'\t');
    }

    #[test]
    fn test_sniff_pipe() {
        let data = b"name|age|city\nAlice|30|New York\nBob|25|Los Angeles\n";
        let dialect = Sniffer::new().sniff_bytes(data).unwrap();
        assert_eq!(dialect.delimiter, b'|');
    }

    #[test]
    fn test_sniff_with_quotes() {
        let data = b"\"name\",\"value\"\n\"hello, world\",123\n\"test\",456\n";
        let dialect = Sniffer::new().sniff_bytes(data).unwrap();

        assert_eq!(dialect.delimiter, b',');
        assert_eq!(dialect.quote, Quote::Some(b'"'));
    }

    #[test]
    fn test_sniff_crlf() {
        let data = b"name,age\r\nAlice,30\r\nBob,25\r\n";
        let dialect = Sniffer::new().sniff_bytes(data).unwrap();

        assert_eq!(dialect.delimiter, b',');
        assert_eq!(dialect.line_terminator, LineTerminator::CRLF);
    }

    #[test]
    fn test_sniff_ignores_invalid_bytes() {
        let data = b"id;name\n1;caf\xe9\n2;th\xe9\n";
        let dialect = Sniffer::new().sniff_bytes(data).unwrap();
        assert_eq!(dialect.delimiter, b';');
    }

    #[test]
    fn test_sniff_reader_limits_sample() {
        let mut data = b"a;b\n".to_vec();
        for i in 0..1000 {
            data.extend_from_slice(format!("{i};x\n").as_bytes());
        }
        let dialect = Sniffer::new().sniff_reader(Cursor::new(data)).unwrap();
        assert_eq!(dialect.delimiter, b';');
    }

    #[test]
    fn test_sniff_empty() {
        let result = Sniffer::new().sniff_bytes(b"");
        assert!(matches!(result, Err(TidyError::EmptyInput)));
    }
}
