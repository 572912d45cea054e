//! `lit-lib` - issue tracking in a single plain-text outline file.
//!
//! Issues are top-level branches of an outline document, keyed by a UUID.
//! Fields are leaves, comments are nested branches keyed by a stamp, and
//! attachments live in a directory per issue next to the backing file.
//!
//! # Quick Start
//!
//! ```no_run
//! use lit_lib::{IssueStore, Layout, Selection, StoreConfig, field};
//!
//! let mut store = IssueStore::open(StoreConfig::new(".", Layout::Tracker)).unwrap();
//!
//! // Create
//! let id = store.new_issues("ada@lab", 1).remove(0);
//! field::set(store.issue_mut(&id).unwrap(), "summary", "Parser drops fence").unwrap();
//!
//! // Query
//! let mut open = store.select(&Selection::Default, true);
//! store.sort(&mut open, "priority", true);
//!
//! // Save back
//! store.save().unwrap();
//! ```

pub mod attach;
pub mod edit;
pub mod error;
pub mod field;
pub mod outline;
pub mod query;
pub mod stamp;
pub mod store;
pub mod tags;

pub use edit::{CommandEditor, Editor, MergeReport, compose_text, edit_issues};
pub use error::{LitError, Result};
pub use outline::{Branch, Leaf, LeafKind, Node};
pub use query::{Selection, SortSpec};
pub use stamp::stamp;
pub use store::{IssueStore, Layout, StoreConfig};
pub use tags::{TagSet, modify_tag};
