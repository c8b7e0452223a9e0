//! Terminal display utilities for CLI output formatting.
//!
//! Handles different screen sizes and Unicode text when laying out result
//! cards in a table.

use std::io::{self, IsTerminal};
use std::sync::OnceLock;
use terminal_size::terminal_size;
use unicode_width::UnicodeWidthChar;

/// Terminal information with cached size and capabilities.
#[derive(Debug, Clone)]
pub struct Terminal {
    width: usize,
    is_tty: bool,
}

static TERMINAL_INFO: OnceLock<Terminal> = OnceLock::new();

/// Default width when terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 100;

/// Get the global terminal information, initialized on first call.
pub fn terminal_info() -> &'static Terminal {
    TERMINAL_INFO.get_or_init(|| Terminal {
        width: terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(DEFAULT_WIDTH),
        is_tty: io::stdout().is_terminal(),
    })
}

/// Get the current terminal width in characters.
#[inline]
pub fn terminal_width() -> usize {
    terminal_info().width
}

/// Check if stdout is a terminal.
#[inline]
pub fn is_terminal() -> bool {
    terminal_info().is_tty
}

/// Display width of a string, counting wide characters as two columns.
pub fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate text to fit within `max_width` columns.
///
/// Appends an ellipsis when truncation occurred.
///
/// ```
/// use openlibrary_search::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
/// assert_eq!(truncate_with_ellipsis("Hi", 8), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return "...".to_string();
    }

    let budget = max_width - 3;
    let mut width = 0;
    let mut truncated = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        truncated.push(c);
    }

    format!("{}...", truncated.trim_end())
}

/// Width reserved for the link column. Links are never truncated.
pub const LINK_COLUMN_WIDTH: usize = 40;

/// Column widths for the card table: (title, authors).
///
/// The link column keeps [`LINK_COLUMN_WIDTH`]; title gets the larger share
/// of the rest.
pub fn card_table_columns(terminal_width: usize) -> (usize, usize) {
    // borders, padding and the index column
    let available = terminal_width
        .saturating_sub(LINK_COLUMN_WIDTH + 16)
        .max(32);

    let authors = (available * 40 / 100).clamp(12, 40);
    let title = (available - authors).max(16);

    (title, authors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("Hello", 10), "Hello");
        assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
        assert_eq!(truncate_with_ellipsis("", 10), "");
        assert_eq!(truncate_with_ellipsis("Hello", 3), "...");
    }

    #[test]
    fn test_truncate_wide_characters() {
        // each CJK character is two columns wide
        assert_eq!(truncate_with_ellipsis("日本語の本", 7), "日本...");
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn test_card_table_columns_fit() {
        for width in [40, 80, 120, 200] {
            let (title, authors) = card_table_columns(width);
            assert!(title >= 16);
            assert!(authors >= 12);
            assert!(title >= authors);
        }
    }
}
