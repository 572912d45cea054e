use anyhow::Result;

use crate::cli::{Context, SpecArgs};

/// Execute the id command.
///
/// # Errors
///
/// Returns an error if the issue file cannot be loaded or the selection
/// words are malformed.
pub fn execute(args: &SpecArgs, ctx: &Context) -> Result<()> {
    let spec = ctx.spec(args)?;
    let store = ctx.open_store()?;
    for id in spec.resolve(&store, ctx.default_open()) {
        println!("{id}");
    }
    Ok(())
}
