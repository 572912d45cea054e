//! Output formatting for `lit`.
//!
//! Supports the fixed-width listing, the outline text of `show`, and JSON.

mod output;
mod text;

pub use output::{CommentView, IssueView};
pub use text::{LIST_HEADER, attachment_marker, fit, format_list_line};
