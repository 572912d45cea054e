use std::fs;

use anyhow::Result;
use lit_lib::store::{IssueStore, Layout, TRACKER_DIR};

use crate::cli::Context;
use crate::config::{CONFIG_FILE, CONFIG_TEMPLATE};

/// Execute the init command.
///
/// Creates the issue file in the current directory. In tracker layout a
/// config template is written next to it.
///
/// # Errors
///
/// Returns an error if the directory or files cannot be created.
pub fn execute(ctx: &Context) -> Result<()> {
    let config = ctx.settings.store_config();
    let path = IssueStore::init(&config)?;

    if config.layout == Layout::Tracker {
        let config_path = config.start_dir.join(TRACKER_DIR).join(CONFIG_FILE);
        if !config_path.exists() {
            fs::write(&config_path, CONFIG_TEMPLATE)?;
        }
    }

    println!("Initialized issue file {}", dunce::simplified(&path).display());
    Ok(())
}
