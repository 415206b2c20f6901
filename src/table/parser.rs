//! Quote-aware row splitting.
//!
//! Rows are comma separated. A field that starts with `"` keeps absorbing
//! the following comma-split fragments until one closes the quote, so
//! `"Dig, then rest"` survives as one field. Doubled quotes inside a
//! quoted field decode to a single quote. Newlines inside quotes are not
//! supported: every line is one row.

use smallvec::SmallVec;

use super::header::HeaderIndex;

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// One parsed table line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<String>,
    malformed: bool,
}

impl Row {
    /// Build a row from already-split fields.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            malformed: false,
        }
    }

    /// Field at `index`, if the row is long enough.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// All fields in column order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when every field is empty (a spacer line in the spreadsheet).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.is_empty())
    }

    /// True when a quoted field was never closed and absorbed the rest of the line.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.malformed
    }
}

/// Count of `"` characters at the end of `s`.
fn trailing_quotes(s: &str) -> usize {
    s.chars().rev().take_while(|&c| c == QUOTE).count()
}

/// Whether `fragment` ends a quoted field. An even run of trailing quotes is
/// a run of escaped quotes, not a terminator.
fn closes_quote(fragment: &str, is_opening: bool) -> bool {
    let body = if is_opening { &fragment[1..] } else { fragment };
    trailing_quotes(body) % 2 == 1
}

/// Strip the enclosing quotes and decode `""` escapes.
fn unquote(raw: &str, terminated: bool) -> String {
    let inner = &raw[1..];
    let inner = if terminated && !inner.is_empty() {
        &inner[..inner.len() - 1]
    } else {
        inner
    };
    inner.replace("\"\"", "\"").trim().to_string()
}

/// Split one line into fields.
///
/// Never fails: an unterminated quote absorbs the rest of the line and the
/// row is flagged as malformed.
///
/// ```
/// use depths_tabletop::table::parse_row;
///
/// let row = parse_row(r#"Lantern,"Light, then dig",2"#);
/// assert_eq!(row.fields(), &["Lantern", "Light, then dig", "2"]);
/// ```
#[must_use]
pub fn parse_row(line: &str) -> Row {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let fragments: SmallVec<[&str; 16]> = line.split(DELIMITER).collect();

    let mut fields = Vec::with_capacity(fragments.len());
    let mut malformed = false;
    let mut i = 0;

    while i < fragments.len() {
        let fragment = fragments[i];
        i += 1;

        if !fragment.starts_with(QUOTE) {
            fields.push(fragment.trim().to_string());
            continue;
        }

        let mut joined = fragment.to_string();
        let mut terminated = closes_quote(fragment, true);
        while !terminated && i < fragments.len() {
            joined.push(DELIMITER);
            joined.push_str(fragments[i]);
            terminated = closes_quote(fragments[i], false);
            i += 1;
        }

        if !terminated {
            malformed = true;
        }
        fields.push(unquote(&joined, terminated));
    }

    Row { fields, malformed }
}

/// A parsed table: header index plus data rows in source order.
#[derive(Clone, Debug, Default)]
pub struct Table {
    header: HeaderIndex,
    rows: Vec<Row>,
}

impl Table {
    /// Parse raw table text. The first line is the header.
    ///
    /// A single empty line left by a trailing newline is dropped; other
    /// blank lines are kept, since the tile table uses them as group
    /// terminators.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut lines: Vec<&str> = text.split('\n').collect();
        if lines.last().is_some_and(|l| l.trim_end_matches('\r').is_empty()) {
            lines.pop();
        }

        let mut lines = lines.into_iter();
        let header = lines
            .next()
            .map(|l| HeaderIndex::from_row(&parse_row(l)))
            .unwrap_or_default();
        let rows = lines.map(parse_row).collect();

        Self { header, rows }
    }

    #[must_use]
    pub fn header(&self) -> &HeaderIndex {
        &self.header
    }

    /// Data rows, header excluded.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Take ownership of the data rows.
    #[must_use]
    pub fn into_parts(self) -> (HeaderIndex, Vec<Row>) {
        (self.header, self.rows)
    }
}
