//! Editing issues in an external editor.
//!
//! One edit runs as a fixed pipeline, each stage consuming the previous one:
//!
//! ```text
//! collect → snapshot → suspend → detect → reparse → merge → commit
//! ```
//!
//! The store is only read while collecting and only written on commit, so
//! every failure in between leaves it untouched.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::time::{Duration, SystemTime};

use tempfile::NamedTempFile;

use crate::error::{LitError, Result};
use crate::field::{self, UPDATED};
use crate::outline::Branch;
use crate::stamp::{check_actor, stamp};
use crate::store::IssueStore;

/// Something that lets a user change a file in place.
pub trait Editor {
    /// Edit the file at `path`, returning once the user is done.
    ///
    /// # Errors
    ///
    /// Returns `Editor` if the editor cannot be run or fails.
    fn edit(&self, path: &Path) -> Result<()>;
}

impl<F> Editor for F
where
    F: Fn(&Path) -> Result<()>,
{
    fn edit(&self, path: &Path) -> Result<()> {
        self(path)
    }
}

/// Runs an editor command line with the file path appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEditor {
    command: String,
}

impl CommandEditor {
    /// `command` is split on whitespace into a program and its arguments.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Editor for CommandEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        let mut words = self.command.split_whitespace();
        let program = words.next().ok_or_else(|| LitError::Editor {
            program: String::new(),
            reason: "no editor configured".to_string(),
        })?;

        tracing::debug!("Running editor: {} {}", self.command, path.display());
        let status = Command::new(program)
            .args(words)
            .arg(path)
            .status()
            .map_err(|e| LitError::Editor {
                program: program.to_string(),
                reason: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(LitError::Editor {
                program: program.to_string(),
                reason: format!("exited with {status}"),
            })
        }
    }
}

// ============================================================================
// Scratch files
// ============================================================================

/// Write `text` to a fresh temp file and backdate it, so a save within the
/// filesystem's timestamp granularity still moves the modification time.
fn scratch(text: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("lit-")
        .suffix(".txt")
        .tempfile()?;
    file.write_all(text.as_bytes())?;
    file.flush()?;

    let past = SystemTime::now()
        .checked_sub(Duration::from_secs(1))
        .unwrap_or(SystemTime::UNIX_EPOCH);
    file.as_file().set_modified(past)?;
    Ok(file)
}

fn modified(path: &Path) -> Result<SystemTime> {
    Ok(fs::metadata(path)?.modified()?)
}

// ============================================================================
// Pipeline stages
// ============================================================================

/// Selected issues written to a scratch file.
#[derive(Debug)]
pub struct Collected {
    scratch: NamedTempFile,
    ids: Vec<String>,
    stamp: String,
}

/// Scratch file with its modification time recorded.
#[derive(Debug)]
pub struct Snapshotted {
    collected: Collected,
    before: SystemTime,
}

/// The editor has exited.
#[derive(Debug)]
pub struct Edited {
    collected: Collected,
    before: SystemTime,
}

/// The scratch file was saved.
#[derive(Debug)]
pub struct Changed {
    collected: Collected,
}

/// The scratch file parsed as an outline document.
#[derive(Debug)]
pub struct Reparsed {
    ids: Vec<String>,
    stamp: String,
    tree: Branch,
}

/// Edited branches paired with the stored issues they replace.
#[derive(Debug)]
pub struct Merge {
    replacements: Vec<(String, Branch)>,
    stamp: String,
}

/// Outcome of a committed edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Identifiers whose contents were replaced, in selection order.
    pub updated: Vec<String>,
}

/// Write copies of the selected issues, with `updated` set to `stamp`, to a
/// scratch file.
///
/// Identifiers that do not resolve are logged and skipped.
///
/// # Errors
///
/// Returns `NoUpdate` if nothing resolves, or `Io` if the scratch file cannot
/// be written.
pub fn collect(store: &IssueStore, ids: &[String], stamp: &str) -> Result<Collected> {
    let mut doc = Branch::root();
    let mut resolved: Vec<String> = Vec::new();

    for id in ids {
        let Some(full) = store.resolve_id(id) else {
            tracing::warn!("No issue matches '{id}'; skipping");
            continue;
        };
        if resolved.iter().any(|seen| seen == full) {
            continue;
        }
        let Some(issue) = store.issue(full) else {
            continue;
        };

        let mut copy = issue.clone();
        field::set(&mut copy, UPDATED, stamp)?;
        doc.append(copy);
        resolved.push(full.to_string());
    }

    if resolved.is_empty() {
        return Err(LitError::NoUpdate);
    }

    let scratch = scratch(&doc.to_string())?;
    tracing::debug!(
        "Collected {} issue(s) into {}",
        resolved.len(),
        scratch.path().display()
    );
    Ok(Collected {
        scratch,
        ids: resolved,
        stamp: stamp.to_string(),
    })
}

impl Collected {
    #[must_use]
    pub fn path(&self) -> &Path {
        self.scratch.path()
    }

    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// # Errors
    ///
    /// Returns `Io` if the scratch file's metadata cannot be read.
    pub fn snapshot(self) -> Result<Snapshotted> {
        let before = modified(self.path())?;
        Ok(Snapshotted {
            collected: self,
            before,
        })
    }
}

impl Snapshotted {
    /// Hand the scratch file to `editor` and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Propagates the editor's failure.
    pub fn suspend<E: Editor + ?Sized>(self, editor: &E) -> Result<Edited> {
        editor.edit(self.collected.path())?;
        Ok(Edited {
            collected: self.collected,
            before: self.before,
        })
    }
}

impl Edited {
    /// # Errors
    ///
    /// Returns `NoChange` if the scratch file was not saved.
    pub fn detect(self) -> Result<Changed> {
        let after = modified(self.collected.path())?;
        if after == self.before {
            return Err(LitError::NoChange);
        }
        Ok(Changed {
            collected: self.collected,
        })
    }
}

impl Changed {
    /// # Errors
    ///
    /// Returns `Parse` if the edited text is not a valid outline.
    pub fn reparse(self) -> Result<Reparsed> {
        let text = fs::read_to_string(self.collected.path())?;
        let tree = Branch::parse(&text)?;
        Ok(Reparsed {
            ids: self.collected.ids,
            stamp: self.collected.stamp,
            tree,
        })
    }
}

impl Reparsed {
    /// Pair each selected identifier with the edited branch keyed by it, or
    /// failing that the first one whose key starts with it.
    ///
    /// # Errors
    ///
    /// Returns `NoUpdate` if no selected issue is found in the edited text.
    pub fn merge(self) -> Result<Merge> {
        let replacements: Vec<(String, Branch)> = self
            .ids
            .into_iter()
            .filter_map(|id| {
                let edited = self
                    .tree
                    .branches()
                    .find(|b| b.key() == id)
                    .or_else(|| self.tree.branches().find(|b| b.key().starts_with(&id)))?;
                Some((id, edited.clone()))
            })
            .collect();

        if replacements.is_empty() {
            return Err(LitError::NoUpdate);
        }
        Ok(Merge {
            replacements,
            stamp: self.stamp,
        })
    }
}

impl Merge {
    /// Replace the stored issues and save.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if an issue disappeared, or any save error.
    pub fn commit(self, store: &mut IssueStore) -> Result<MergeReport> {
        let mut updated = Vec::with_capacity(self.replacements.len());
        for (id, edited) in self.replacements {
            store.replace_issue(&id, edited)?;
            store.touch(&id, &self.stamp)?;
            updated.push(id);
        }
        store.save()?;
        tracing::debug!("Merged {} edited issue(s)", updated.len());
        Ok(MergeReport { updated })
    }
}

/// Edit the selected issues and store the result.
///
/// # Errors
///
/// Returns `NoUpdate`, `NoChange`, `Parse`, `Editor`, `Validation`, or a save error. On any
/// error the store is left as it was.
pub fn edit_issues<E: Editor + ?Sized>(
    store: &mut IssueStore,
    editor: &E,
    ids: &[String],
    actor: &str,
) -> Result<MergeReport> {
    check_actor(actor)?;
    let stamp = stamp(actor);
    collect(store, ids, &stamp)?
        .snapshot()?
        .suspend(editor)?
        .detect()?
        .reparse()?
        .merge()?
        .commit(store)
}

/// Let the user write free text starting from `initial`.
///
/// Trailing newlines are stripped from the result.
///
/// # Errors
///
/// Returns `NoChange` if the file was not saved, or the editor's failure.
pub fn compose_text<E: Editor + ?Sized>(editor: &E, initial: &str) -> Result<String> {
    let file = scratch(initial)?;
    let before = modified(file.path())?;
    editor.edit(file.path())?;
    if modified(file.path())? == before {
        return Err(LitError::NoChange);
    }
    let text = fs::read_to_string(file.path())?;
    Ok(text.trim_end_matches(['\n', '\r']).to_string())
}
