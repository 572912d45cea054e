//! Show command implementation.

use anyhow::Result;

use crate::cli::{Context, ShowArgs};
use crate::format::IssueView;

/// Execute the show command.
///
/// Prints each issue as outline text, or all of them as a JSON array.
///
/// # Errors
///
/// Returns an error if the issue file cannot be loaded or the selection
/// words are malformed.
pub fn execute(args: &ShowArgs, ctx: &Context) -> Result<()> {
    let spec = ctx.spec(&args.spec)?;
    let store = ctx.open_store()?;
    let ids = spec.resolve(&store, ctx.default_open());

    if args.json {
        let views: Vec<IssueView> = ids
            .iter()
            .filter_map(|id| store.issue(id))
            .map(|issue| IssueView::new(issue, store.attachments(issue.key())))
            .collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    for issue in ids.iter().filter_map(|id| store.issue(id)) {
        println!("{issue}");
    }
    Ok(())
}
