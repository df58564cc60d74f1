//! CSV table reading and writing.
//!
//! Reading is a two-step pipeline: the delimiter is sniffed from a raw byte
//! sample, then the whole file is decoded with the declared encoding and
//! parsed with the sniffed dialect.

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use foldhash::{HashMap, HashMapExt};
use tracing::debug;

use crate::encoding::TextEncoding;
use crate::error::{Result, TidyError};
use crate::metadata::{Dialect, Quote};
use crate::sniffer::{DEFAULT_SAMPLE_LEN, Sniffer};

/// A parsed CSV file: ordered column names plus ordered rows.
///
/// Every row has exactly one value per header column; short rows are padded
/// with empty strings and long rows are truncated.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    index: HashMap<String, usize>,
}

impl CsvTable {
    /// Build a table, normalising every row to the header length.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        // first occurrence wins for duplicate column names
        let mut index = HashMap::with_capacity(width);
        for (i, name) in headers.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }

        Self {
            headers,
            rows,
            index,
        }
    }

    /// Column names, in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Raw rows, aligned with [`headers`](Self::headers).
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows (the header is not counted).
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate rows as name-addressable records.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |fields| Record {
            table: self,
            fields,
        })
    }
}

/// A borrowed row that looks values up by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    table: &'a CsvTable,
    fields: &'a [String],
}

impl<'a> Record<'a> {
    /// Value of the named column, or `""` when the column doesn't exist.
    pub fn get(&self, column: &str) -> &'a str {
        self.table
            .column_index(column)
            .and_then(|i| self.fields.get(i))
            .map_or("", String::as_str)
    }
}

/// Reader that sniffs the dialect and decodes with a declared encoding.
///
/// # Example
///
/// ```no_run
/// use csvtidy::{CsvReader, TextEncoding};
///
/// let mut reader = CsvReader::new();
/// reader.encoding(TextEncoding::from_label("latin1").unwrap());
///
/// let table = reader.read_path("data.csv").unwrap();
/// println!("{} rows, columns: {:?}", table.len(), table.headers());
/// ```
#[derive(Debug, Clone)]
pub struct CsvReader {
    encoding: TextEncoding,
    sample_len: usize,
    forced_dialect: Option<Dialect>,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvReader {
    /// UTF-8, sniffed dialect, 2048-byte sample.
    pub fn new() -> Self {
        Self {
            encoding: TextEncoding::default(),
            sample_len: DEFAULT_SAMPLE_LEN,
            forced_dialect: None,
        }
    }

    /// Set the declared text encoding.
    pub fn encoding(&mut self, encoding: TextEncoding) -> &mut Self {
        self.encoding = encoding;
        self
    }

    /// Set the number of leading bytes used for sniffing.
    pub fn sample_len(&mut self, sample_len: usize) -> &mut Self {
        self.sample_len = sample_len;
        self
    }

    /// Skip sniffing and parse with this dialect.
    pub fn dialect(&mut self, dialect: Dialect) -> &mut Self {
        self.forced_dialect = Some(dialect);
        self
    }

    /// Read and parse the file at `path`.
    ///
    /// Fails with `NotFound` if the path is not an existing regular file and
    /// with `EmptyInput` if the file has zero bytes.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<CsvTable> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(TidyError::NotFound(path.to_path_buf()));
        }

        let mut file = File::open(path)?;

        let dialect = match self.forced_dialect {
            Some(dialect) => {
                if file.metadata()?.len() == 0 {
                    return Err(TidyError::EmptyInput);
                }
                dialect
            }
            None => {
                let mut sniffer = Sniffer::new();
                sniffer.sample_len(self.sample_len);
                let dialect = sniffer.sniff_reader(&mut file)?;
                file.seek(SeekFrom::Start(0))?;
                dialect
            }
        };

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        self.parse(&data, dialect)
    }

    /// Parse an in-memory file.
    pub fn read_bytes(&self, data: &[u8]) -> Result<CsvTable> {
        let dialect = match self.forced_dialect {
            Some(dialect) if !data.is_empty() => dialect,
            _ => {
                let mut sniffer = Sniffer::new();
                sniffer.sample_len(self.sample_len);
                sniffer.sniff_bytes(data)?
            }
        };
        self.parse(data, dialect)
    }

    fn parse(&self, data: &[u8], dialect: Dialect) -> Result<CsvTable> {
        // csv accepts \r, \n and \r\n as record terminators
        let text = self.encoding.decode(data)?;
        let table = parse_table(text.as_bytes(), &dialect)?;
        debug!(
            rows = table.len(),
            columns = table.headers().len(),
            encoding = self.encoding.name(),
            "Parsed CSV"
        );
        Ok(table)
    }
}

/// Parse decoded CSV text: the first record is the header.
pub fn parse_table(data: &[u8], dialect: &Dialect) -> Result<CsvTable> {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(dialect.delimiter)
        .has_headers(false)
        .flexible(true);

    match dialect.quote {
        Quote::None => {
            builder.quoting(false);
        }
        Quote::Some(q) => {
            builder.quoting(true).quote(q);
        }
    }

    let mut reader = builder.from_reader(data);
    let mut records = reader.records();

    let headers: Vec<String> = match records.next() {
        Some(record) => record
            .map_err(|e| TidyError::MalformedInput(e.to_string()))?
            .iter()
            .map(str::to_owned)
            .collect(),
        None => {
            return Err(TidyError::MalformedInput(
                "CSV file has no header row".to_string(),
            ));
        }
    };

    let rows = records
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_owned).collect::<Vec<_>>())
                .map_err(|e| TidyError::MalformedInput(e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CsvTable::new(headers, rows))
}

/// Serialise a header and rows in the standard dialect (comma, minimal
/// quoting, CRLF) and write them to `path` with the given encoding.
///
/// The whole file is rendered in memory before anything touches the disk,
/// so a failure never leaves a half-written output.
pub fn write_csv<'a, I>(
    path: &Path,
    headers: &[String],
    rows: I,
    encoding: TextEncoding,
) -> Result<()>
where
    I: IntoIterator<Item = &'a Vec<String>>,
{
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }

    let buffer = writer
        .into_inner()
        .map_err(|e| TidyError::Io(e.into_error()))?;
    let text = String::from_utf8(buffer)
        .map_err(|e| TidyError::Encoding(e.to_string()))?;
    let bytes = encoding.encode(&text)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}
