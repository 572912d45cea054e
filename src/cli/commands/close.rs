use anyhow::Result;
use lit_lib::field::{self, CLOSED};
use lit_lib::stamp;

use crate::cli::{Context, SpecArgs};

use super::update_each;

/// Execute the close or reopen command.
///
/// Closing sets `closed` to the current stamp; reopening clears it.
///
/// # Errors
///
/// Returns an error if the issue file cannot be loaded or saved.
pub fn execute(args: &SpecArgs, close: bool, ctx: &Context) -> Result<()> {
    let spec = ctx.spec(args)?;
    let mut store = ctx.open_store()?;
    let ids = spec.resolve(&store, false);

    let stamp = stamp(&ctx.settings.actor);
    let closed = if close { stamp.as_str() } else { "" };
    update_each(&mut store, &ids, &stamp, |issue| field::set(issue, CLOSED, closed));
    store.save()?;
    Ok(())
}
