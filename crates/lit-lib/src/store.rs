//! Issue store backed by a single outline file.
//!
//! The outline tree is the source of truth. The store keeps a derived index
//! (sorted identifiers plus identifier → child position) that is rebuilt
//! whenever issues are loaded, added, or replaced.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LitError, Result};
use crate::field::{self, UPDATED};
use crate::outline::{Branch, Leaf, Node};
use crate::stamp::{check_actor, stamp};

/// Marker directory searched for in tracker layout.
pub const TRACKER_DIR: &str = ".lit";
/// Name of the backing file.
pub const ISSUE_FILE: &str = "issues";

/// Where the backing file lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// `.lit/issues`, found by searching upward from the start directory.
    #[default]
    Tracker,
    /// `issues` in the start directory itself.
    Flat,
}

impl Layout {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tracker => "tracker",
            Self::Flat => "flat",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = LitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tracker" => Ok(Self::Tracker),
            "flat" => Ok(Self::Flat),
            other => Err(LitError::validation(
                "layout",
                format!("expected 'tracker' or 'flat', got '{other}'"),
            )),
        }
    }
}

/// How to find the backing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub start_dir: PathBuf,
    pub layout: Layout,
}

impl StoreConfig {
    #[must_use]
    pub fn new(start_dir: impl Into<PathBuf>, layout: Layout) -> Self {
        Self {
            start_dir: start_dir.into(),
            layout,
        }
    }

    /// Locate the backing file.
    ///
    /// # Errors
    ///
    /// Returns `TrackerNotFound` if no ancestor has a `.lit` directory.
    pub fn locate(&self) -> Result<PathBuf> {
        match self.layout {
            Layout::Flat => Ok(self.start_dir.join(ISSUE_FILE)),
            Layout::Tracker => self
                .start_dir
                .ancestors()
                .map(|dir| dir.join(TRACKER_DIR))
                .find(|marker| marker.is_dir())
                .map(|marker| marker.join(ISSUE_FILE))
                .ok_or_else(|| LitError::TrackerNotFound {
                    start: self.start_dir.clone(),
                }),
        }
    }
}

/// The issues of one tracker, held in memory for one invocation.
#[derive(Debug)]
pub struct IssueStore {
    config: StoreConfig,
    root: Branch,
    path: Option<PathBuf>,
    ids: Vec<String>,
    positions: HashMap<String, usize>,
}

impl IssueStore {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create an empty, unloaded store.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            root: Branch::root(),
            path: None,
            ids: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Create a store and load it.
    ///
    /// # Errors
    ///
    /// See [`IssueStore::load`].
    pub fn open(config: StoreConfig) -> Result<Self> {
        let mut store = Self::new(config);
        store.load()?;
        Ok(store)
    }

    /// Create the backing file (and `.lit` directory) in the start directory
    /// if they do not exist yet. Existing issues are left alone.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the directory or file cannot be created.
    pub fn init(config: &StoreConfig) -> Result<PathBuf> {
        let dir = match config.layout {
            Layout::Tracker => config.start_dir.join(TRACKER_DIR),
            Layout::Flat => config.start_dir.clone(),
        };
        fs::create_dir_all(&dir)?;

        let path = dir.join(ISSUE_FILE);
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        tracing::debug!("Initialized issue file {}", path.display());
        Ok(path)
    }

    /// Locate and parse the backing file, replacing whatever is in memory.
    ///
    /// # Errors
    ///
    /// Returns `TrackerNotFound`/`FileNotFound` if there is no backing file,
    /// `Parse` if it is malformed, or `Io` if it cannot be read.
    pub fn load(&mut self) -> Result<()> {
        let path = self.config.locate()?;
        let text = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LitError::FileNotFound(path.clone())
            } else {
                LitError::Io(e)
            }
        })?;

        self.root = Branch::parse(&text)?;
        self.path = Some(path);
        self.reindex();
        tracing::debug!("Loaded {} issue(s) from {}", self.ids.len(), self.display_path());
        Ok(())
    }

    /// Write the whole tree back to the backing file.
    ///
    /// Writes a sibling temp file and renames it over the original.
    ///
    /// # Errors
    ///
    /// Returns `NotLoaded` if the store was never loaded, or `Io` on write failure.
    pub fn save(&self) -> Result<()> {
        let path = self.path.as_ref().ok_or(LitError::NotLoaded)?;
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, self.root.to_string())?;
        fs::rename(&tmp_path, path)?;
        tracing::debug!("Stored {} issue(s) to {}", self.ids.len(), path.display());
        Ok(())
    }

    /// Path of the backing file, once loaded.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Directory holding the backing file and attachment directories.
    ///
    /// # Errors
    ///
    /// Returns `NotLoaded` if the store was never loaded.
    pub fn dir(&self) -> Result<&Path> {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .ok_or(LitError::NotLoaded)
    }

    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The whole document.
    #[must_use]
    pub const fn root(&self) -> &Branch {
        &self.root
    }

    // ========================================================================
    // Issues
    // ========================================================================

    /// Append `count` new issues stamped by `actor`. Returns their identifiers.
    pub fn new_issues(&mut self, actor: &str, count: usize) -> Vec<String> {
        let stamp = stamp(actor);
        let mut created = Vec::with_capacity(count);
        for _ in 0..count {
            let id = Uuid::new_v4().to_string();
            self.root.append(field::skeleton(&id, &stamp));
            created.push(id);
        }
        self.reindex();
        created
    }

    /// Look up an issue by identifier or identifier prefix.
    ///
    /// A prefix shared by several issues resolves to the first in sorted order.
    #[must_use]
    pub fn issue(&self, id: &str) -> Option<&Branch> {
        let pos = self.position(id)?;
        self.root.kids().get(pos).and_then(Node::as_branch)
    }

    /// Mutable variant of [`IssueStore::issue`].
    pub fn issue_mut(&mut self, id: &str) -> Option<&mut Branch> {
        let pos = self.position(id)?;
        match self.root.kids_mut().get_mut(pos) {
            Some(Node::Branch(issue)) => Some(issue),
            _ => None,
        }
    }

    /// Full identifier for an identifier or prefix.
    #[must_use]
    pub fn resolve_id(&self, id: &str) -> Option<&str> {
        if id.is_empty() {
            return None;
        }
        let idx = self.ids.partition_point(|known| known.as_str() < id);
        self.ids
            .get(idx)
            .filter(|known| known.starts_with(id))
            .map(String::as_str)
    }

    /// Every identifier that starts with `prefix`, in sorted order.
    #[must_use]
    pub fn matching_ids(&self, prefix: &str) -> Vec<&str> {
        if prefix.is_empty() {
            return Vec::new();
        }
        let start = self.ids.partition_point(|known| known.as_str() < prefix);
        self.ids[start..]
            .iter()
            .take_while(|known| known.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }

    /// All identifiers in document order.
    #[must_use]
    pub fn issue_ids(&self) -> Vec<String> {
        self.root
            .branches()
            .map(|issue| issue.key().to_string())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Set an issue's `updated` stamp.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the identifier does not resolve.
    pub fn touch(&mut self, id: &str, stamp: &str) -> Result<()> {
        let issue = self.require_mut(id)?;
        field::set(issue, UPDATED, stamp)
    }

    /// Append a comment and bump `updated`. Returns the comment's stamp.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an actor that cannot appear in a stamp, or
    /// `IssueNotFound` if the identifier does not resolve.
    pub fn add_comment(&mut self, id: &str, actor: &str, body: &str) -> Result<String> {
        check_actor(actor)?;
        let stamp = stamp(actor);
        self.append_comment(id, &stamp, body)?;
        Ok(stamp)
    }

    /// Replace an issue's contents with `edited`, keeping its identifier.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the identifier does not resolve.
    pub fn replace_issue(&mut self, id: &str, mut edited: Branch) -> Result<()> {
        let issue = self.require_mut(id)?;
        issue.replace_kids(edited.replace_kids(Vec::new()));
        Ok(())
    }

    pub(crate) fn append_comment(&mut self, id: &str, stamp: &str, body: &str) -> Result<()> {
        let issue = self.require_mut(id)?;
        let mut comment = Branch::new(stamp);
        comment.append(Leaf::text(body));
        issue.append(comment);
        field::set(issue, UPDATED, stamp)
    }

    pub(crate) fn require_mut(&mut self, id: &str) -> Result<&mut Branch> {
        self.issue_mut(id)
            .ok_or_else(|| LitError::IssueNotFound { id: id.to_string() })
    }

    fn position(&self, id: &str) -> Option<usize> {
        let full = self.resolve_id(id)?;
        self.positions.get(full).copied()
    }

    fn reindex(&mut self) {
        self.ids.clear();
        self.positions.clear();
        for (pos, node) in self.root.kids().iter().enumerate() {
            if let Node::Branch(issue) = node {
                let id = issue.key().to_string();
                if self.positions.contains_key(&id) {
                    tracing::warn!("Duplicate issue id {id}; only the first is addressable");
                    continue;
                }
                self.positions.insert(id.clone(), pos);
                self.ids.push(id);
            }
        }
        self.ids.sort();
    }

    fn display_path(&self) -> String {
        self.path
            .as_deref()
            .map_or_else(String::new, |path| path.display().to_string())
    }
}
