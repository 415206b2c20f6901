//! Display text conventions used by the spreadsheets.

/// Cell value meaning "deliberately blank".
pub const EMPTY_PLACEHOLDER: &str = "EMPTY";

/// Two-character marker the sheets use for a line break inside a cell.
pub const LINE_BREAK_MARKER: &str = "\\n";

/// Turn a raw cell into presentable text.
///
/// ```
/// use depths_tabletop::table::display_text;
///
/// assert_eq!(display_text("EMPTY"), "");
/// assert_eq!(display_text(r"Dig twice\nthen rest"), "Dig twice\nthen rest");
/// ```
#[must_use]
pub fn display_text(raw: &str) -> String {
    if raw == EMPTY_PLACEHOLDER {
        return String::new();
    }
    raw.replace(LINE_BREAK_MARKER, "\n")
}

/// Name to print on a card, falling back to the category label.
#[must_use]
pub fn display_name(name: &str, fallback: &str) -> String {
    if name.is_empty() {
        fallback.to_string()
    } else {
        display_text(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_only_when_exact() {
        assert_eq!(display_text("EMPTY"), "");
        assert_eq!(display_text("EMPTY slot"), "EMPTY slot");
        assert_eq!(display_text(""), "");
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(display_text(r"a\nb\nc"), "a\nb\nc");
        assert_eq!(display_text("no breaks"), "no breaks");
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(display_name("", "UTILITY"), "UTILITY");
        assert_eq!(display_name("Rope", "UTILITY"), "Rope");
    }
}
