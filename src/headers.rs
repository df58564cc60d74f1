//! Mapping of logical header names onto actual CSV columns.

use std::fmt;

use crate::error::{Result, TidyError};

/// Column that carries the row language in language-filter mode.
pub const LANGUAGE_COLUMN: &str = "language";

/// Suffix appended to logical headers in auto-suffix mode.
pub const ENGLISH_SUFFIX: &str = "_en";

/// Logical headers that auto-suffix mode leaves unchanged.
pub const UNSUFFIXED_HEADERS: &[&str] = &["year", "size"];

/// Default language kept by language-filter mode.
pub const DEFAULT_FILTER_LANGUAGE: &str = "EN";

/// Ordered, non-empty list of user-facing header names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMapping(Vec<String>);

impl HeaderMapping {
    /// Parse a comma-separated list; entries are trimmed and blanks dropped.
    ///
    /// ```
    /// use csvtidy::HeaderMapping;
    ///
    /// let mapping = HeaderMapping::parse(" year, title,,").unwrap();
    /// assert_eq!(mapping.names(), ["year", "title"]);
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        Self::new(input.split(','))
    }

    /// Build from individual names; entries are trimmed and blanks dropped.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();

        if names.is_empty() {
            return Err(TidyError::Configuration(
                "at least one header name is required".to_string(),
            ));
        }
        Ok(Self(names))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How logical headers resolve to CSV columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderStrategy {
    /// Headers are used verbatim; only rows whose `language` column matches
    /// `language` (case-insensitively) produce folders.
    LanguageFilter { language: String },
    /// Each header maps to `<header>_en`, except `year` and `size`.
    AutoSuffix,
}

impl Default for HeaderStrategy {
    fn default() -> Self {
        HeaderStrategy::LanguageFilter {
            language: DEFAULT_FILTER_LANGUAGE.to_string(),
        }
    }
}

impl HeaderStrategy {
    /// Language filter keeping `language` rows.
    pub fn language_filter(language: impl Into<String>) -> Self {
        HeaderStrategy::LanguageFilter {
            language: language.into(),
        }
    }

    /// Map one logical header to its CSV column name.
    pub fn column_name(&self, header: &str) -> String {
        match self {
            HeaderStrategy::LanguageFilter { .. } => header.to_string(),
            HeaderStrategy::AutoSuffix => {
                let keep = UNSUFFIXED_HEADERS
                    .iter()
                    .any(|h| h.eq_ignore_ascii_case(header));
                if keep {
                    header.to_string()
                } else {
                    format!("{header}{ENGLISH_SUFFIX}")
                }
            }
        }
    }

    /// Resolve the mapping against a CSV header row.
    ///
    /// Fails with a configuration error listing every resolved column name
    /// that the CSV lacks, or when language-filter mode finds no `language`
    /// column.
    pub fn resolve(
        &self,
        mapping: &HeaderMapping,
        csv_headers: &[String],
    ) -> Result<ResolvedHeaders> {
        let columns: Vec<String> = mapping
            .names()
            .iter()
            .map(|h| self.column_name(h))
            .collect();

        let missing: Vec<&str> = columns
            .iter()
            .filter(|c| !csv_headers.contains(*c))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(TidyError::Configuration(format!(
                "Headers not found in CSV: {}",
                missing.join(", ")
            )));
        }

        let language_filter = match self {
            HeaderStrategy::LanguageFilter { language } => {
                if !csv_headers.iter().any(|h| h == LANGUAGE_COLUMN) {
                    return Err(TidyError::Configuration(format!(
                        "CSV must have a '{LANGUAGE_COLUMN}' column for filtering"
                    )));
                }
                Some(language.trim().to_uppercase())
            }
            HeaderStrategy::AutoSuffix => None,
        };

        Ok(ResolvedHeaders {
            columns,
            language_filter,
        })
    }
}

impl fmt::Display for HeaderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderStrategy::LanguageFilter { language } => {
                write!(f, "Language Filter ({})", language.to_uppercase())
            }
            HeaderStrategy::AutoSuffix => write!(f, "Auto {ENGLISH_SUFFIX} Suffix"),
        }
    }
}

/// Actual CSV columns to read, in the order the user listed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHeaders {
    /// Resolved column names, one per logical header.
    pub columns: Vec<String>,
    /// Upper-cased language to keep, in language-filter mode.
    pub language_filter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_mapping() {
        let mapping = HeaderMapping::parse("year , title").unwrap();
        assert_eq!(mapping.names(), ["year", "title"]);
        assert!(HeaderMapping::parse(" , ,").is_err());
    }

    #[test]
    fn test_language_filter_identity() {
        let csv = headers(&["language", "year", "title"]);
        let mapping = HeaderMapping::parse("title,year").unwrap();
        let resolved = HeaderStrategy::default().resolve(&mapping, &csv).unwrap();

        assert_eq!(resolved.columns, ["title", "year"]);
        assert_eq!(resolved.language_filter.as_deref(), Some("EN"));
    }

    #[test]
    fn test_language_filter_requires_language_column() {
        let csv = headers(&["year", "title"]);
        let mapping = HeaderMapping::parse("year").unwrap();
        let err = HeaderStrategy::default().resolve(&mapping, &csv).unwrap_err();
        assert!(err.to_string().contains("language"));
    }

    #[test]
    fn test_language_filter_missing_header() {
        let csv = headers(&["language", "year"]);
        let mapping = HeaderMapping::parse("year,title").unwrap();
        let err = HeaderStrategy::default().resolve(&mapping, &csv).unwrap_err();
        assert!(matches!(err, TidyError::Configuration(ref m) if m.contains("title")));
    }

    #[test]
    fn test_auto_suffix() {
        let csv = headers(&["title_en", "Year", "size"]);
        let mapping = HeaderMapping::parse("title,Year,SIZE").unwrap();
        let err = HeaderStrategy::AutoSuffix.resolve(&mapping, &csv).unwrap_err();
        // SIZE passes through unchanged and is not in the header (case-sensitive)
        assert!(err.to_string().contains("SIZE"));

        let mapping = HeaderMapping::parse("title,Year,size").unwrap();
        let resolved = HeaderStrategy::AutoSuffix.resolve(&mapping, &csv).unwrap();
        assert_eq!(resolved.columns, ["title_en", "Year", "size"]);
        assert_eq!(resolved.language_filter, None);
    }

    #[test]
    fn test_auto_suffix_reports_suffixed_names() {
        let csv = headers(&["title"]);
        let mapping = HeaderMapping::parse("title,author").unwrap();
        let err = HeaderStrategy::AutoSuffix.resolve(&mapping, &csv).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("title_en"));
        assert!(message.contains("author_en"));
    }

    #[test]
    fn test_resolved_length_matches_mapping() {
        let csv = headers(&["language", "a", "b", "c"]);
        let mapping = HeaderMapping::parse("c,a,b,a").unwrap();
        let resolved = HeaderStrategy::default().resolve(&mapping, &csv).unwrap();
        assert_eq!(resolved.columns.len(), mapping.len());
        assert_eq!(resolved.columns, ["c", "a", "b", "a"]);
    }
}
