use anyhow::Result;

use crate::cli::Context;

/// Execute the new command: create `count` issues and print their ids.
///
/// # Errors
///
/// Returns an error if the issue file cannot be loaded or saved.
pub fn execute(count: u16, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let ids = store.new_issues(&ctx.settings.actor, usize::from(count));
    store.save()?;

    for id in ids {
        println!("{id}");
    }
    Ok(())
}
