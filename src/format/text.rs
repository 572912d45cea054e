//! Plain text listing.
//!
//! One line per issue: id, closed marker, priority, attachment count,
//! assignee, tags, summary. Every column but the summary is cut and padded
//! to a fixed display width.

use std::sync::LazyLock;

use lit_lib::Branch;
use lit_lib::field::{self, ASSIGNED, PRIORITY, SUMMARY, TAGS};
use unicode_width::UnicodeWidthChar;

const COLUMNS: [usize; 6] = [8, 1, 1, 1, 8, 15];

/// Column titles, laid out like [`format_list_line`].
pub static LIST_HEADER: LazyLock<String> =
    LazyLock::new(|| row(["id", "c", "p", "a", "assigned", "tags"], "summary"));

/// Cut `text` to at most `width` columns and pad it to exactly `width`.
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.extend(std::iter::repeat_n(' ', width - used));
    out
}

/// Attachment column: blank without a directory, the count below ten, else `*`.
#[must_use]
pub fn attachment_marker(count: Option<usize>) -> String {
    match count {
        None => " ".to_string(),
        Some(n) if n < 10 => n.to_string(),
        Some(_) => "*".to_string(),
    }
}

/// Format a single listing line. `attachments` is `None` when the issue
/// has no attachment directory.
#[must_use]
pub fn format_list_line(issue: &Branch, attachments: Option<usize>) -> String {
    let closed = if field::is_closed(issue) { "*" } else { " " };
    let get = |key| field::get(issue, key).unwrap_or_default();
    row(
        [
            issue.key(),
            closed,
            get(PRIORITY),
            &attachment_marker(attachments),
            get(ASSIGNED),
            get(TAGS),
        ],
        get(SUMMARY),
    )
}

fn row(cells: [&str; 6], last: &str) -> String {
    let mut line = String::new();
    for (cell, width) in cells.iter().zip(COLUMNS) {
        line.push_str(&fit(cell, width));
        line.push(' ');
    }
    line.push_str(last);
    line
}
