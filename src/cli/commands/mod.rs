//! Command implementations.

pub mod attach;
pub mod close;
pub mod comment;
pub mod completions;
pub mod edit;
pub mod id;
pub mod init;
pub mod list;
pub mod new;
pub mod set;
pub mod show;
pub mod tag;

use lit_lib::field::{self, UPDATED};
use lit_lib::{Branch, IssueStore, LitError};

/// Apply `change` to each selected issue and stamp it updated.
///
/// Failures are logged and skipped so the rest of the selection still goes
/// through. Returns how many issues changed.
pub(crate) fn update_each(
    store: &mut IssueStore,
    ids: &[String],
    stamp: &str,
    mut change: impl FnMut(&mut Branch) -> lit_lib::Result<()>,
) -> usize {
    let mut updated = 0;
    for id in ids {
        let outcome = match store.issue_mut(id) {
            Some(issue) => change(&mut *issue).and_then(|()| field::set(issue, UPDATED, stamp)),
            None => Err(LitError::IssueNotFound { id: id.clone() }),
        };
        match outcome {
            Ok(()) => updated += 1,
            Err(e) => tracing::warn!("Skipping {id}: {e}"),
        }
    }
    tracing::info!("Updated {updated} of {} issue(s)", ids.len());
    updated
}
