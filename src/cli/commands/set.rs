use anyhow::Result;
use lit_lib::{field, stamp};

use crate::cli::{Context, SetArgs};

use super::update_each;

/// Execute the set command.
///
/// Only explicitly selected issues are changed; there is no default.
///
/// # Errors
///
/// Returns an error if the key cannot be written as a field, or the issue
/// file cannot be loaded or saved.
pub fn execute(args: &SetArgs, ctx: &Context) -> Result<()> {
    field::check_key(&args.key)?;
    let spec = ctx.spec(&args.spec)?;
    let mut store = ctx.open_store()?;
    let ids = spec.resolve(&store, false);

    let stamp = stamp(&ctx.settings.actor);
    update_each(&mut store, &ids, &stamp, |issue| {
        field::set(issue, &args.key, &args.value)
    });
    store.save()?;
    Ok(())
}
