use anyhow::Result;
use lit_lib::{modify_tag, stamp};

use crate::cli::{Context, TagArgs, TagOp};

use super::update_each;

/// Execute the tag command.
///
/// # Errors
///
/// Returns an error if the issue file cannot be loaded or saved.
pub fn execute(args: &TagArgs, ctx: &Context) -> Result<()> {
    let spec = ctx.spec(&args.spec)?;
    let mut store = ctx.open_store()?;
    let ids = spec.resolve(&store, false);

    let add = args.op == TagOp::Add;
    let stamp = stamp(&ctx.settings.actor);
    update_each(&mut store, &ids, &stamp, |issue| modify_tag(issue, &args.tag, add));
    store.save()?;
    Ok(())
}
