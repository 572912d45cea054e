use std::io::{self, Write};

use anyhow::{Context as _, Result};
use lit_lib::{LitError, compose_text};

use crate::cli::{AttachSubcommand, Context};

/// Execute an attach subcommand.
///
/// # Errors
///
/// Returns an error if the issue or attachment does not exist, the copy
/// fails, or the issue file cannot be loaded or saved.
pub fn execute(command: &AttachSubcommand, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;

    match command {
        AttachSubcommand::Add {
            id,
            file,
            description,
        } => {
            if store.issue(id).is_none() {
                return Err(LitError::IssueNotFound { id: id.clone() }.into());
            }
            if !file.is_file() {
                return Err(LitError::FileNotFound(file.clone()).into());
            }
            let description = match description {
                Some(text) => text.clone(),
                None => compose_text(&ctx.editor()?, "")?,
            };
            store.attach(id, file, &ctx.settings.actor, &description)?;
            store.save()?;
        }
        AttachSubcommand::List { id } => {
            if store.issue(id).is_none() {
                return Err(LitError::IssueNotFound { id: id.clone() }.into());
            }
            for name in store.attachments(id) {
                println!("{name}");
            }
        }
        AttachSubcommand::Get { id, name } => {
            let mut file = store.get_attachment(id, name)?;
            let mut stdout = io::stdout().lock();
            io::copy(&mut file, &mut stdout).with_context(|| format!("writing {name}"))?;
            stdout.flush()?;
        }
    }
    Ok(())
}
