//! Tabular parsing: rows, header lookup, and display text conventions.
//!
//! ## Key Types
//!
//! - `Row`: One quote-aware, comma-split table line
//! - `Table`: Header index plus data rows
//! - `HeaderIndex`: Column name → position, queried with explicit defaults
//! - `TableSource`: Supplier of raw table text (`InMemoryTables`, `DirectoryTables`)

pub mod error;
pub mod header;
pub mod parser;
pub mod source;
pub mod text;

pub use error::FieldError;
pub use header::{lookup, optional_int, required_int, required_text, HeaderIndex};
pub use parser::{parse_row, Row, Table};
pub use source::{DirectoryTables, InMemoryTables, TableKind, TableSource};
pub use text::{display_name, display_text, EMPTY_PLACEHOLDER, LINE_BREAK_MARKER};
