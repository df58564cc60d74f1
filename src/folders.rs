//! Folder derivation from CSV rows.
//!
//! Each qualifying row contributes one folder whose name joins the row's
//! values for the requested headers. Whole-operation problems (missing file,
//! missing headers) abort before anything is created; a folder that fails to
//! be created is recorded and the batch moves on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{Dispatch, info, warn};

use crate::error::Result;
use crate::headers::{HeaderMapping, HeaderStrategy, LANGUAGE_COLUMN, ResolvedHeaders};
use crate::logging::in_scope;
use crate::metadata::Dialect;
use crate::reader::{CsvReader, CsvTable};
use crate::sanitize::sanitize_folder_name;

/// Default separator between folder-name parts.
pub const DEFAULT_SEPARATOR: &str = "_";

/// Directory created next to the CSV when no output directory is given.
pub const DEFAULT_OUTPUT_DIR: &str = "generated_folders";

/// A single folder that could not be created.
#[derive(Error, Debug)]
#[error("Error creating folder '{}' (row {row}): {source}", .path.display())]
pub struct DerivationError {
    /// 1-based line number in the CSV (the header is line 1).
    pub row: usize,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Outcome of a derivation run.
#[derive(Debug, Default)]
pub struct DerivationReport {
    /// Folders created (or already present), in row order.
    pub created: Vec<PathBuf>,
    /// Rows dropped by the language filter.
    pub skipped_rows: usize,
    /// Per-row creation failures.
    pub failures: Vec<DerivationError>,
}

/// Creates one folder per CSV row from selected column values.
///
/// # Example
///
/// ```no_run
/// use csvtidy::{FolderDeriver, HeaderMapping, HeaderStrategy};
///
/// let mut deriver = FolderDeriver::new(HeaderStrategy::AutoSuffix, "out");
/// deriver.separator("-");
///
/// let headers = HeaderMapping::parse("year,title").unwrap();
/// let report = deriver.derive_from_path("films.csv", &headers).unwrap();
/// println!("created {} folders", report.created.len());
/// ```
#[derive(Debug, Clone)]
pub struct FolderDeriver {
    strategy: HeaderStrategy,
    base_path: PathBuf,
    separator: String,
    dispatch: Option<Dispatch>,
}

impl FolderDeriver {
    pub fn new(strategy: HeaderStrategy, base_path: impl Into<PathBuf>) -> Self {
        Self {
            strategy,
            base_path: base_path.into(),
            separator: DEFAULT_SEPARATOR.to_string(),
            dispatch: None,
        }
    }

    /// Set the separator placed between folder-name parts.
    pub fn separator(&mut self, separator: impl Into<String>) -> &mut Self {
        self.separator = separator.into();
        self
    }

    /// Send this deriver's log events to `dispatch`.
    pub fn log_to(&mut self, dispatch: Dispatch) -> &mut Self {
        self.dispatch = Some(dispatch);
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Read `csv_path` (UTF-8, comma-delimited) and derive folders from it.
    pub fn derive_from_path<P: AsRef<Path>>(
        &self,
        csv_path: P,
        headers: &HeaderMapping,
    ) -> Result<DerivationReport> {
        in_scope(self.dispatch.as_ref(), || {
            let mut reader = CsvReader::new();
            reader.dialect(Dialect::comma());
            let table = reader.read_path(csv_path.as_ref())?;
            self.derive_table(&table, headers)
        })
    }

    /// Derive folders from an already parsed table.
    pub fn derive(&self, table: &CsvTable, headers: &HeaderMapping) -> Result<DerivationReport> {
        in_scope(self.dispatch.as_ref(), || self.derive_table(table, headers))
    }

    fn derive_table(&self, table: &CsvTable, headers: &HeaderMapping) -> Result<DerivationReport> {
        let resolved = self.strategy.resolve(headers, table.headers())?;
        fs::create_dir_all(&self.base_path)?;

        let report = self.create_folders(table, &resolved);

        if resolved.language_filter.is_some() {
            info!(skipped = report.skipped_rows, "Skipped rows (language mismatch)");
        }
        info!(
            created = report.created.len(),
            failed = report.failures.len(),
            mode = %self.strategy,
            base = %self.base_path.display(),
            "Folder derivation finished"
        );
        Ok(report)
    }

    fn create_folders(&self, table: &CsvTable, resolved: &ResolvedHeaders) -> DerivationReport {
        let mut report = DerivationReport::default();

        for (i, record) in table.records().enumerate() {
            let row = i + 2;

            if let Some(filter) = &resolved.language_filter {
                let language = record.get(LANGUAGE_COLUMN).trim().to_uppercase();
                if language != *filter {
                    report.skipped_rows += 1;
                    continue;
                }
            }

            let parts: Vec<&str> = resolved
                .columns
                .iter()
                .map(|column| record.get(column).trim())
                .filter(|value| !value.is_empty())
                .collect();
            if parts.is_empty() {
                continue;
            }

            let folder_name = sanitize_folder_name(&parts.join(self.separator.as_str()));
            let path = self.base_path.join(folder_name);

            match fs::create_dir_all(&path) {
                Ok(()) => report.created.push(path),
                Err(source) => {
                    let failure = DerivationError { row, path, source };
                    warn!(error = %failure, "Skipping row");
                    report.failures.push(failure);
                }
            }
        }

        report
    }
}

/// Default output directory for a CSV file: `<csv dir>/generated_folders`.
pub fn default_output_dir(csv_path: &Path) -> PathBuf {
    csv_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_OUTPUT_DIR)
}
