//! List command implementation.
//!
//! Fixed-width one-line summaries under a header row.

use anyhow::Result;
use lit_lib::IssueStore;

use crate::cli::{Context, SpecArgs};
use crate::format::{LIST_HEADER, format_list_line};

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the issue file cannot be loaded or the selection
/// words are malformed.
pub fn execute(args: &SpecArgs, ctx: &Context) -> Result<()> {
    let spec = ctx.spec(args)?;
    let store = ctx.open_store()?;

    println!("{}", LIST_HEADER.as_str());
    for id in spec.resolve(&store, ctx.default_open()) {
        if let Some(issue) = store.issue(&id) {
            println!("{}", format_list_line(issue, attachment_count(&store, &id)));
        }
    }
    Ok(())
}

/// Number of attachments, or `None` without an attachment directory.
fn attachment_count(store: &IssueStore, id: &str) -> Option<usize> {
    let dir = store.issue_dir(id).ok()?;
    dir.is_dir().then(|| store.attachments(id).len())
}
