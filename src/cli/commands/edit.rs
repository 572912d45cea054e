use anyhow::Result;
use lit_lib::edit_issues;

use crate::cli::{Context, SpecArgs};

/// Execute the edit command.
///
/// # Errors
///
/// Returns an error if no editor is configured, the editor fails or leaves
/// the file unchanged, the edited text does not parse, or none of the
/// selected issues are found in it.
pub fn execute(args: &SpecArgs, ctx: &Context) -> Result<()> {
    let editor = ctx.editor()?;
    let spec = ctx.spec(args)?;
    let mut store = ctx.open_store()?;
    let ids = spec.resolve(&store, ctx.default_open());

    let report = edit_issues(&mut store, &editor, &ids, &ctx.settings.actor)?;
    tracing::info!("Edited {} issue(s)", report.updated.len());
    Ok(())
}
