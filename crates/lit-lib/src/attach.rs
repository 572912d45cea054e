//! Per-issue attachment directories.
//!
//! Each issue with attachments has a directory named by its full
//! identifier, next to the backing file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{LitError, Result};
use crate::stamp::{check_actor, stamp};
use crate::store::IssueStore;

impl IssueStore {
    /// Directory for an issue's attachments (it may not exist yet).
    ///
    /// # Errors
    ///
    /// Returns `NotLoaded` before load, or `IssueNotFound`.
    pub fn issue_dir(&self, id: &str) -> Result<PathBuf> {
        let full = self
            .resolve_id(id)
            .ok_or_else(|| LitError::IssueNotFound { id: id.to_string() })?;
        Ok(self.dir()?.join(full))
    }

    /// Copy `src` into the issue's attachment directory and record it as a
    /// comment. Returns the stamp of the new comment.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound`, `FileNotFound` if `src` does not exist,
    /// `Validation` if `src` has no file name or `actor` cannot appear in a
    /// stamp, or `Io` if the copy fails.
    pub fn attach(&mut self, id: &str, src: &Path, actor: &str, comment: &str) -> Result<String> {
        check_actor(actor)?;
        let name = src
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| LitError::validation("file", format!("{} has no file name", src.display())))?
            .to_string();
        let dir = self.issue_dir(id)?;
        if !src.is_file() {
            return Err(LitError::FileNotFound(src.to_path_buf()));
        }

        fs::create_dir_all(&dir)?;
        fs::copy(src, dir.join(&name))?;
        tracing::debug!("Attached {} to {}", name, dir.display());

        let mut text = format!("Attached {name}");
        if !comment.is_empty() {
            text.push_str("\n\n");
            text.push_str(comment);
        }
        let stamp = stamp(actor);
        self.append_comment(id, &stamp, &text)?;
        Ok(stamp)
    }

    /// Attachment file names, sorted. Empty if the issue has none.
    #[must_use]
    pub fn attachments(&self, id: &str) -> Vec<String> {
        let Ok(dir) = self.issue_dir(id) else {
            return Vec::new();
        };
        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }

    /// Open an attachment for reading.
    ///
    /// # Errors
    ///
    /// Returns `AttachmentNotFound` if there is no such file, `Validation`
    /// if `name` is not a plain file name, or `IssueNotFound`.
    pub fn get_attachment(&self, id: &str, name: &str) -> Result<fs::File> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(LitError::validation("name", format!("'{name}' is not a file name")));
        }
        let path = self.issue_dir(id)?.join(name);
        fs::File::open(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                LitError::AttachmentNotFound {
                    id: id.to_string(),
                    name: name.to_string(),
                }
            } else {
                LitError::Io(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use crate::field::{self, UPDATED};
    use crate::store::{Layout, StoreConfig};

    fn store_in(dir: &Path) -> IssueStore {
        let config = StoreConfig::new(dir, Layout::Tracker);
        IssueStore::init(&config).unwrap();
        IssueStore::open(config).unwrap()
    }

    #[test]
    fn test_attach_copies_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        let id = store.new_issues("ada", 1).remove(0);
        let src = dir.path().join("trace.log");
        fs::write(&src, "boom").unwrap();

        let stamp = store.attach(&id, &src, "bob", "from CI").unwrap();

        let copied = dir.path().join(".lit").join(&id).join("trace.log");
        assert_eq!(fs::read_to_string(copied).unwrap(), "boom");
        let issue = store.issue(&id).unwrap();
        let comment = field::comments(issue).next().unwrap();
        assert_eq!(comment.key(), stamp);
        assert_eq!(
            comment.kids()[0].as_leaf().unwrap().value(),
            "Attached trace.log\n\nfrom CI"
        );
        assert_eq!(field::get(issue, UPDATED), Some(stamp.as_str()));
    }

    #[test]
    fn test_attach_rejects_bad_actor() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        let id = store.new_issues("ada", 1).remove(0);
        let src = dir.path().join("trace.log");
        fs::write(&src, "boom").unwrap();

        assert!(matches!(
            store.attach(&id, &src, "bob\r", ""),
            Err(LitError::Validation { .. })
        ));
        assert!(!dir.path().join(".lit").join(&id).exists());
    }

    #[test]
    fn test_attach_without_comment() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        let id = store.new_issues("ada", 1).remove(0);
        let src = dir.path().join("a.txt");
        fs::write(&src, "").unwrap();
        store.attach(&id, &src, "bob", "").unwrap();
        let comment = field::comments(store.issue(&id).unwrap()).next().unwrap();
        assert_eq!(comment.kids()[0].as_leaf().unwrap().value(), "Attached a.txt");
    }

    #[test]
    fn test_attach_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        let id = store.new_issues("ada", 1).remove(0);
        let err = store
            .attach(&id, &dir.path().join("nope.bin"), "bob", "")
            .unwrap_err();
        assert!(matches!(err, LitError::FileNotFound(_)));
        assert!(field::comments(store.issue(&id).unwrap()).next().is_none());
    }

    #[test]
    fn test_attachments_sorted_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        let ids = store.new_issues("ada", 2);
        assert!(store.attachments(&ids[0]).is_empty());

        for name in ["b.png", "a.txt", "c.md"] {
            let src = dir.path().join(name);
            fs::write(&src, name).unwrap();
            store.attach(&ids[0], &src, "bob", "").unwrap();
        }
        assert_eq!(store.attachments(&ids[0]), vec!["a.txt", "b.png", "c.md"]);
        assert!(store.attachments(&ids[1]).is_empty());
        assert!(store.attachments("missing").is_empty());
    }

    #[test]
    fn test_get_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        let id = store.new_issues("ada", 1).remove(0);
        let src = dir.path().join("notes.txt");
        fs::write(&src, "hello").unwrap();
        store.attach(&id, &src, "bob", "").unwrap();

        let mut contents = String::new();
        store
            .get_attachment(&id, "notes.txt")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "hello");

        assert!(matches!(
            store.get_attachment(&id, "other.txt"),
            Err(LitError::AttachmentNotFound { .. })
        ));
        assert!(matches!(
            store.get_attachment(&id, "../issues"),
            Err(LitError::Validation { .. })
        ));
    }
}
