//! csvtidy: CSV utilities for folder generation and row reordering
//!
//! Two engines sit on top of a small CSV reading layer:
//!
//! - [`FolderDeriver`] creates one directory per CSV row, named after the
//!   values of selected columns.
//! - [`CsvReorder`] sorts the rows of a CSV file by text, date and language
//!   priority and writes the result to a new file.
//!
//! Input files are read through [`CsvReader`], which sniffs the delimiter
//! from a leading sample and decodes the file with a declared encoding.
//!
//! # Quick Start
//!
//! ```no_run
//! use csvtidy::{CsvReader, TextEncoding};
//!
//! let mut reader = CsvReader::new();
//! reader.encoding(TextEncoding::from_label("utf-8").unwrap());
//!
//! let table = reader.read_path("films.csv").unwrap();
//! println!("Columns: {:?}", table.headers());
//! println!("Rows: {}", table.len());
//! ```
//!
//! # Folder derivation
//!
//! ```no_run
//! use csvtidy::{FolderDeriver, HeaderMapping, HeaderStrategy};
//!
//! let deriver = FolderDeriver::new(HeaderStrategy::language_filter("EN"), "out");
//! let headers = HeaderMapping::parse("year,title").unwrap();
//! let report = deriver.derive_from_path("films.csv", &headers).unwrap();
//! println!("{} folders, {} rows skipped", report.created.len(), report.skipped_rows);
//! ```
//!
//! # Reordering
//!
//! ```no_run
//! use csvtidy::{CsvReorder, ReorderConfig};
//!
//! let mut config = ReorderConfig::from_columns(&[("year", true), ("title", false)]).unwrap();
//! config.reverse(true);
//!
//! let written = CsvReorder::new(config).unwrap().reorder("films.csv", "sorted").unwrap();
//! println!("{}", written.display());
//! ```
//!
//! # Logging
//!
//! The library emits [`tracing`] events. Install a global subscriber, or
//! hand an engine its own sink with `log_to`, e.g. [`stdout_dispatch`].

mod config;
mod date;
mod encoding;
mod error;
mod folders;
mod headers;
mod logging;
mod metadata;
mod reader;
mod reorder;
mod sanitize;
mod sniff;
mod sniffer;
mod sort_key;

pub use error::{ErrorKind, Result, TidyError};
pub use metadata::{Dialect, LineTerminator, Quote};
pub use sniffer::{DEFAULT_SAMPLE_LEN, Sniffer};

pub use encoding::{TextEncoding, decode_lossy, guess_encoding, is_utf8};
pub use reader::{CsvReader, CsvTable, Record, parse_table, write_csv};

pub use folders::{
    DEFAULT_OUTPUT_DIR, DEFAULT_SEPARATOR, DerivationError, DerivationReport, FolderDeriver,
    default_output_dir,
};
pub use headers::{HeaderMapping, HeaderStrategy, ResolvedHeaders};
pub use sanitize::sanitize_folder_name;

pub use config::{
    DEFAULT_ENCODING, DEFAULT_LANGUAGE_COLUMN, DEFAULT_LANGUAGE_ORDER, DEFAULT_OUTPUT_PREFIX,
    ReorderConfig, SortColumn,
};
pub use date::{ParsedDate, date_formats, parse_date};
pub use reorder::CsvReorder;
pub use sort_key::{DateKey, KeyPart, SortKey, SortKeyBuilder};

pub use logging::stdout_dispatch;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api() {
        let _sniffer = Sniffer::new();
        let _reader = CsvReader::new();
        let _dialect = Dialect::default();
        let _quote = Quote::Some(b'"');
        let _strategy = HeaderStrategy::default();
        let _encoding = TextEncoding::default();

        let config = ReorderConfig::from_columns(&[("title", false)]).unwrap();
        let _reorder = CsvReorder::new(config).unwrap();
    }

    #[test]
    fn test_sanitize_reexport() {
        assert_eq!(sanitize_folder_name("a/b"), "a_b");
    }
}
