//! CSV reorder engine: read, validate, stable sort, write.

use std::path::{Path, PathBuf};

use tracing::{Dispatch, error, info};

use crate::config::ReorderConfig;
use crate::encoding::TextEncoding;
use crate::error::{Result, TidyError};
use crate::logging::in_scope;
use crate::reader::{CsvReader, write_csv};
use crate::sort_key::SortKeyBuilder;

/// Sorts the rows of a CSV file and writes them to a new file.
///
/// # Example
///
/// ```no_run
/// use csvtidy::{CsvReorder, ReorderConfig};
///
/// let mut config = ReorderConfig::from_columns(&[("year", true), ("title", false)]).unwrap();
/// config.language_sorting(true).language_order(["EN", "CN"]);
///
/// let reorder = CsvReorder::new(config).unwrap();
/// let written = reorder.reorder("films.csv", "sorted").unwrap();
/// println!("wrote {}", written.display());
/// ```
#[derive(Debug, Clone)]
pub struct CsvReorder {
    config: ReorderConfig,
    encoding: TextEncoding,
    dispatch: Option<Dispatch>,
}

impl CsvReorder {
    /// Validate `config` and build the engine.
    pub fn new(config: ReorderConfig) -> Result<Self> {
        let encoding = config.validate()?;
        Ok(Self {
            config,
            encoding,
            dispatch: None,
        })
    }

    /// Send this engine's log events to `dispatch`.
    pub fn log_to(&mut self, dispatch: Dispatch) -> &mut Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Sort `input_file` and write `<prefix><file name>` into
    /// `output_directory`, creating the directory if needed.
    ///
    /// Returns the path of the written file. Nothing is written unless the
    /// whole pipeline succeeds.
    pub fn reorder<P, Q>(&self, input_file: P, output_directory: Q) -> Result<PathBuf>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        in_scope(self.dispatch.as_ref(), || {
            self.run(input_file.as_ref(), output_directory.as_ref())
        })
    }

    /// Like [`reorder`](Self::reorder), but logs failures and returns `None`.
    pub fn reorder_safe<P, Q>(&self, input_file: P, output_directory: Q) -> Option<PathBuf>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        match self.reorder(input_file, output_directory) {
            Ok(path) => Some(path),
            Err(err) => {
                in_scope(self.dispatch.as_ref(), || {
                    error!(error = %err, "CSV reordering failed");
                });
                None
            }
        }
    }

    fn run(&self, input: &Path, output_dir: &Path) -> Result<PathBuf> {
        info!(input = %input.display(), "Starting CSV reordering");

        let file_name = match input.file_name() {
            Some(name) if input.is_file() => name.to_string_lossy().into_owned(),
            _ => return Err(TidyError::NotFound(input.to_path_buf())),
        };

        let mut reader = CsvReader::new();
        reader.encoding(self.encoding);
        let table = reader.read_path(input)?;
        info!(rows = table.len(), input = %input.display(), "Read CSV file");

        if table.is_empty() {
            return Err(TidyError::EmptyData);
        }

        let builder = SortKeyBuilder::new(&self.config, table.headers())?;

        info!(
            columns = self.config.sort_columns.len(),
            reverse = self.config.reverse,
            language_sorting = self.config.use_language_sorting,
            "Sorting CSV data"
        );
        let mut keyed: Vec<_> = table
            .rows()
            .iter()
            .map(|row| (builder.build(row), row))
            .collect();

        // sort_by is stable; comparing b to a keeps ties in input order when reversed
        if self.config.reverse {
            keyed.sort_by(|a, b| b.0.cmp(&a.0));
        } else {
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
        }

        let output_path = output_dir.join(format!("{}{}", self.config.output_prefix, file_name));
        write_csv(
            &output_path,
            table.headers(),
            keyed.iter().map(|(_, row)| *row),
            self.encoding,
        )?;
        info!(
            rows = keyed.len(),
            output = %output_path.display(),
            "CSV reordering completed"
        );

        Ok(output_path)
    }
}
