//! Reorder configuration.

use crate::encoding::TextEncoding;
use crate::error::{Result, TidyError};

/// Default name of the language column.
pub const DEFAULT_LANGUAGE_COLUMN: &str = "language";

/// Default language priority, highest first.
pub const DEFAULT_LANGUAGE_ORDER: &[&str] = &["EN", "CN"];

/// Default prefix for output file names.
pub const DEFAULT_OUTPUT_PREFIX: &str = "sorted_";

/// Default text encoding label.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// A column to sort by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortColumn {
    name: String,
    is_date: bool,
}

impl SortColumn {
    /// The name is trimmed and must not be empty.
    pub fn new(name: impl AsRef<str>, is_date: bool) -> Result<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(TidyError::Configuration(
                "Column name must be a non-empty string".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            is_date,
        })
    }

    /// A column compared as case-folded text.
    pub fn text(name: impl AsRef<str>) -> Result<Self> {
        Self::new(name, false)
    }

    /// A column whose values are parsed as dates.
    pub fn date(name: impl AsRef<str>) -> Result<Self> {
        Self::new(name, true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_date(&self) -> bool {
        self.is_date
    }
}

/// How [`CsvReorder`](crate::CsvReorder) sorts and where it writes.
///
/// # Example
///
/// ```
/// use csvtidy::ReorderConfig;
///
/// let mut config = ReorderConfig::from_columns(&[("year", true), ("title", false)]).unwrap();
/// config.reverse(true).output_prefix("by_year_");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderConfig {
    pub sort_columns: Vec<SortColumn>,
    pub reverse: bool,
    pub use_language_sorting: bool,
    pub language_column: String,
    pub language_order: Vec<String>,
    pub output_prefix: String,
    pub encoding: String,
}

impl ReorderConfig {
    /// Sort by `sort_columns` with every other setting at its default.
    pub fn new(sort_columns: Vec<SortColumn>) -> Self {
        Self {
            sort_columns,
            reverse: false,
            use_language_sorting: false,
            language_column: DEFAULT_LANGUAGE_COLUMN.to_string(),
            language_order: DEFAULT_LANGUAGE_ORDER.iter().map(|s| s.to_string()).collect(),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }

    /// Build from `(name, is_date)` pairs.
    pub fn from_columns<S: AsRef<str>>(columns: &[(S, bool)]) -> Result<Self> {
        let sort_columns = columns
            .iter()
            .map(|(name, is_date)| SortColumn::new(name, *is_date))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(sort_columns))
    }

    pub fn reverse(&mut self, reverse: bool) -> &mut Self {
        self.reverse = reverse;
        self
    }

    pub fn language_sorting(&mut self, enabled: bool) -> &mut Self {
        self.use_language_sorting = enabled;
        self
    }

    pub fn language_column(&mut self, column: impl Into<String>) -> &mut Self {
        self.language_column = column.into();
        self
    }

    /// Language priority, highest first.
    pub fn language_order<I, S>(&mut self, order: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.language_order = order.into_iter().map(Into::into).collect();
        self
    }

    pub fn output_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.output_prefix = prefix.into();
        self
    }

    /// Encoding label for reading and writing (`utf-8`, `latin1`, `auto`, ...).
    pub fn encoding(&mut self, label: impl Into<String>) -> &mut Self {
        self.encoding = label.into();
        self
    }

    /// Check the invariants and resolve the encoding label.
    pub fn validate(&self) -> Result<TextEncoding> {
        if self.sort_columns.is_empty() {
            return Err(TidyError::Configuration(
                "At least one sort column must be specified".to_string(),
            ));
        }
        if self.use_language_sorting {
            if self.language_column.trim().is_empty() {
                return Err(TidyError::Configuration(
                    "Language column name cannot be empty when language sorting is enabled"
                        .to_string(),
                ));
            }
            if self.language_order.is_empty() {
                return Err(TidyError::Configuration(
                    "Language order cannot be empty when language sorting is enabled".to_string(),
                ));
            }
        }
        TextEncoding::from_label(&self.encoding)
    }
}
