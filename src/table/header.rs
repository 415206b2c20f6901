//! Column lookup by header name.
//!
//! Builders never index fields by position. They ask the `HeaderIndex`
//! for a named column and supply a default for tables that predate the
//! column, so spreadsheets can add, drop and reorder columns freely.

use rustc_hash::FxHashMap;

use super::error::FieldError;
use super::parser::Row;

/// Immutable column-name → position map built from a table's header row.
#[derive(Clone, Debug, Default)]
pub struct HeaderIndex {
    columns: FxHashMap<String, usize>,
}

impl HeaderIndex {
    /// Build from a header row. Names are case-sensitive; on duplicates the
    /// first column wins.
    #[must_use]
    pub fn from_row(row: &Row) -> Self {
        let mut columns = FxHashMap::default();
        for (position, name) in row.fields().iter().enumerate() {
            columns.entry(name.clone()).or_insert(position);
        }
        Self { columns }
    }

    /// Position of a column, if the table has it.
    #[must_use]
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.get(column).copied()
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Field of `row` under `column`, or `default` when the column is absent
/// from this table or the row is too short to reach it.
///
/// ```
/// use depths_tabletop::table::{lookup, parse_row, HeaderIndex};
///
/// let header = HeaderIndex::from_row(&parse_row("Name,Count"));
/// let row = parse_row("Lantern,2");
/// assert_eq!(lookup(&row, &header, "Count", "0"), "2");
/// assert_eq!(lookup(&row, &header, "Cost", "0"), "0");
/// ```
#[must_use]
pub fn lookup<'a>(row: &'a Row, header: &HeaderIndex, column: &str, default: &'a str) -> &'a str {
    header
        .position(column)
        .and_then(|position| row.get(position))
        .unwrap_or(default)
}

fn parse_int(column: &str, raw: &str) -> Result<i32, FieldError> {
    raw.parse().map_err(|_| FieldError::InvalidFieldKind {
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// Text column that must be present and non-empty.
pub fn required_text<'a>(row: &'a Row, header: &HeaderIndex, column: &str) -> Result<&'a str, FieldError> {
    match lookup(row, header, column, "") {
        "" => Err(FieldError::MissingRequiredField {
            column: column.to_string(),
        }),
        value => Ok(value),
    }
}

/// Integer column that must be present and parse.
pub fn required_int(row: &Row, header: &HeaderIndex, column: &str) -> Result<i32, FieldError> {
    let raw = required_text(row, header, column)?;
    parse_int(column, raw)
}

/// Integer column that falls back to `default` when absent or empty, but
/// still reports a value that is present and not a number.
pub fn optional_int(row: &Row, header: &HeaderIndex, column: &str, default: i32) -> Result<i32, FieldError> {
    match lookup(row, header, column, "") {
        "" => Ok(default),
        raw => parse_int(column, raw),
    }
}
