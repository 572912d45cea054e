use anyhow::Result;
use lit_lib::{LitError, compose_text};

use crate::cli::{CommentArgs, Context};

/// Execute the comment command.
///
/// Without text on the command line the comment is written in the editor.
///
/// # Errors
///
/// Returns an error if the issue does not exist, the editor fails or leaves
/// the text unchanged, or the issue file cannot be saved.
pub fn execute(args: &CommentArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    if store.issue(&args.id).is_none() {
        return Err(LitError::IssueNotFound {
            id: args.id.clone(),
        }
        .into());
    }

    let text = match &args.text {
        Some(text) => text.clone(),
        None => compose_text(&ctx.editor()?, "")?,
    };

    store.add_comment(&args.id, &ctx.settings.actor, &text)?;
    store.save()?;
    Ok(())
}
