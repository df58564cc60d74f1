//! Composite sort keys.
//!
//! A key is a tuple compared left to right: the language priority first
//! (when enabled), then one component per sort column. Every row gets the
//! same component kind at each position, so keys are always comparable.

use chrono::NaiveDate;

use crate::config::ReorderConfig;
use crate::date::{ParsedDate, parse_date};
use crate::error::{Result, TidyError};

/// Normalised value of a date column.
///
/// Ascending order: empty values, then parsed dates chronologically, then
/// unparsable values by plain string comparison. Reverse order flips all
/// of it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateKey {
    Empty,
    Date(NaiveDate),
    Unparsed(String),
}

/// One component of a [`SortKey`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyPart {
    /// Index in the language order; unknown languages rank after all known.
    Priority(usize),
    /// Lower-cased text.
    Text(String),
    Date(DateKey),
}

/// Composite key for one row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey(pub Vec<KeyPart>);

/// Builds [`SortKey`]s for rows of one table.
///
/// Column positions are resolved once against the header.
#[derive(Debug)]
pub struct SortKeyBuilder<'a> {
    language: Option<(usize, &'a [String])>,
    columns: Vec<(usize, bool)>,
}

impl<'a> SortKeyBuilder<'a> {
    /// Resolve the configured columns against `headers`.
    ///
    /// Fails with a configuration error naming every missing sort column,
    /// or the missing language column.
    pub fn new(config: &'a ReorderConfig, headers: &[String]) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let mut missing: Vec<&str> = Vec::new();
        let mut columns = Vec::with_capacity(config.sort_columns.len());
        for column in &config.sort_columns {
            match position(column.name()) {
                Some(i) => columns.push((i, column.is_date())),
                None if !missing.contains(&column.name()) => missing.push(column.name()),
                None => {}
            }
        }
        if !missing.is_empty() {
            return Err(TidyError::Configuration(format!(
                "Sort columns missing: {}",
                missing.join(", ")
            )));
        }

        let language = if config.use_language_sorting {
            let i = position(config.language_column.as_str()).ok_or_else(|| {
                TidyError::Configuration(format!(
                    "Language column '{}' missing",
                    config.language_column
                ))
            })?;
            Some((i, config.language_order.as_slice()))
        } else {
            None
        };

        Ok(Self { language, columns })
    }

    /// Build the key for one row (fields aligned with the header).
    pub fn build(&self, row: &[String]) -> SortKey {
        let field = |i: usize| row.get(i).map_or("", String::as_str);
        let mut parts = Vec::with_capacity(self.columns.len() + 1);

        if let Some((i, order)) = self.language {
            let language = field(i).trim();
            let rank = order
                .iter()
                .position(|l| l == language)
                .unwrap_or(order.len());
            parts.push(KeyPart::Priority(rank));
        }

        for &(i, is_date) in &self.columns {
            let value = field(i);
            let part = if is_date {
                KeyPart::Date(date_key(value))
            } else {
                KeyPart::Text(value.to_lowercase())
            };
            parts.push(part);
        }

        SortKey(parts)
    }
}

fn date_key(value: &str) -> DateKey {
    if value.trim().is_empty() {
        return DateKey::Empty;
    }
    match parse_date(value) {
        ParsedDate::Date(date) => DateKey::Date(date),
        ParsedDate::Unparsed(text) => DateKey::Unparsed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SortColumn;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn row(values: &[&str]) -> Vec<String> {
        headers(values)
    }

    #[test]
    fn test_text_is_case_folded() {
        let config = ReorderConfig::from_columns(&[("title", false)]).unwrap();
        let builder = SortKeyBuilder::new(&config, &headers(&["title"])).unwrap();

        assert_eq!(builder.build(&row(&["Alpha"])), builder.build(&row(&["ALPHA"])));
        assert!(builder.build(&row(&["alpha"])) < builder.build(&row(&["Beta"])));
    }

    #[test]
    fn test_language_priority_first() {
        let mut config = ReorderConfig::from_columns(&[("title", false)]).unwrap();
        config.language_sorting(true).language_order(["EN", "CN"]);
        let builder = SortKeyBuilder::new(&config, &headers(&["language", "title"])).unwrap();

        let en = builder.build(&row(&["EN", "zzz"]));
        let cn = builder.build(&row(&["CN", "aaa"]));
        let other = builder.build(&row(&["FR", "aaa"]));

        assert!(en < cn);
        assert!(cn < other);
        assert_eq!(other.0[0], KeyPart::Priority(2));
    }

    #[test]
    fn test_language_value_is_trimmed() {
        let mut config = ReorderConfig::from_columns(&[("title", false)]).unwrap();
        config.language_sorting(true);
        let builder = SortKeyBuilder::new(&config, &headers(&["language", "title"])).unwrap();

        let key = builder.build(&row(&[" CN ", "x"]));
        assert_eq!(key, SortKey(vec![KeyPart::Priority(1), KeyPart::Text("x".to_string())]));
    }

    #[test]
    fn test_date_ordering() {
        let config = ReorderConfig::new(vec![SortColumn::date("when").unwrap()]);
        let builder = SortKeyBuilder::new(&config, &headers(&["when"])).unwrap();

        let empty = builder.build(&row(&[""]));
        let early = builder.build(&row(&["31/12/1999"]));
        let late = builder.build(&row(&["2000-01-01"]));
        let junk = builder.build(&row(&["someday"]));

        assert!(empty < early);
        assert!(early < late);
        assert!(late < junk);
    }

    #[test]
    fn test_missing_columns_are_named() {
        let config =
            ReorderConfig::from_columns(&[("title", false), ("year", true), ("title", false)])
                .unwrap();
        let err = SortKeyBuilder::new(&config, &headers(&["name"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: Sort columns missing: title, year"
        );
    }

    #[test]
    fn test_missing_language_column() {
        let mut config = ReorderConfig::from_columns(&[("title", false)]).unwrap();
        config.language_sorting(true);
        let err = SortKeyBuilder::new(&config, &headers(&["title"])).unwrap_err();
        assert!(err.to_string().contains("Language column 'language' missing"));
    }
}
