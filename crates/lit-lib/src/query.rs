//! Selection, predicates, and sorting over the issue set.
//!
//! Predicates walk the issues in document order and return identifiers in
//! that order. `comment` and `attach` are pseudo-fields: they look at an
//! issue's comment branches and attachment directory instead of a leaf.

use std::cmp::Ordering;

use crate::field::{self, CLOSED};
use crate::outline::{Branch, Node};
use crate::store::IssueStore;

/// Pseudo-field addressing an issue's comments.
pub const COMMENT: &str = "comment";
/// Pseudo-field addressing an issue's attachments.
pub const ATTACH: &str = "attach";

/// Which issues a command operates on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// No explicit selection: open issues when defaulting applies.
    #[default]
    Default,
    All,
    /// Identifiers or identifier prefixes, in the order given.
    Ids(Vec<String>),
    With(String, String),
    Without(String, String),
    Less(String, String),
    Greater(String, String),
}

/// Field to order a selection by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub ascending: bool,
}

impl SortSpec {
    #[must_use]
    pub fn new(field: impl Into<String>, ascending: bool) -> Self {
        Self {
            field: field.into(),
            ascending,
        }
    }
}

/// Substring test where empty never contains empty.
fn contains(value: &str, query: &str) -> bool {
    if value.is_empty() && query.is_empty() {
        return false;
    }
    value.contains(query)
}

fn comment_contains(issue: &Branch, query: &str) -> bool {
    field::comments(issue).any(|comment| {
        contains(comment.key(), query)
            || comment
                .kids()
                .iter()
                .filter_map(Node::as_leaf)
                .any(|leaf| contains(leaf.value(), query))
    })
}

impl IssueStore {
    /// Issues whose `field` contains `value`, or (with `want` false) does not.
    ///
    /// `Match(f, v, true)` and `Match(f, v, false)` partition the issues.
    #[must_use]
    pub fn matches(&self, field: &str, value: &str, want: bool) -> Vec<String> {
        self.root()
            .branches()
            .filter(|issue| self.contains_in(issue, field, value) == want)
            .map(|issue| issue.key().to_string())
            .collect()
    }

    /// Issues whose `field` sorts before `value` (`want_less`) or after it.
    ///
    /// Unset or empty fields count as greater than anything. An empty `value`
    /// selects nothing.
    #[must_use]
    pub fn compare(&self, field: &str, value: &str, want_less: bool) -> Vec<String> {
        if value.is_empty() {
            return Vec::new();
        }
        self.root()
            .branches()
            .filter(|issue| self.compares(issue, field, value, want_less))
            .map(|issue| issue.key().to_string())
            .collect()
    }

    /// Stable sort of `ids` by the value of `field`. Unresolved values sort
    /// as the empty string.
    pub fn sort(&self, ids: &mut [String], field: &str, ascending: bool) {
        let mut keyed: Vec<(String, String)> = ids
            .iter()
            .map(|id| {
                let value = self
                    .issue(id)
                    .and_then(|issue| field::get(issue, field))
                    .unwrap_or_default();
                (value.to_string(), id.clone())
            })
            .collect();

        keyed.sort_by(|a, b| {
            let ord = a.0.cmp(&b.0);
            if ascending { ord } else { ord.reverse() }
        });

        for (slot, (_, id)) in ids.iter_mut().zip(keyed) {
            *slot = id;
        }
    }

    /// Resolve a selection to identifiers.
    ///
    /// `Ids` resolves each prefix to its full identifier; prefixes that match
    /// nothing are logged and skipped. `Default` means open issues when
    /// `default_open` is set and nothing otherwise.
    #[must_use]
    pub fn select(&self, selection: &Selection, default_open: bool) -> Vec<String> {
        match selection {
            Selection::Default if default_open => self.matches(CLOSED, "", false),
            Selection::Default => Vec::new(),
            Selection::All => self.issue_ids(),
            Selection::Ids(ids) => ids.iter().filter_map(|id| self.select_id(id)).collect(),
            Selection::With(field, value) => self.matches(field, value, true),
            Selection::Without(field, value) => self.matches(field, value, false),
            Selection::Less(field, value) => self.compare(field, value, true),
            Selection::Greater(field, value) => self.compare(field, value, false),
        }
    }

    fn select_id(&self, id: &str) -> Option<String> {
        let candidates = self.matching_ids(id);
        match candidates.as_slice() {
            [] => {
                tracing::warn!("No issue matches '{id}'; skipping");
                None
            }
            [only] => Some((*only).to_string()),
            [first, ..] => {
                tracing::warn!(
                    "'{id}' matches {} issues; using {first}",
                    candidates.len()
                );
                Some((*first).to_string())
            }
        }
    }

    fn contains_in(&self, issue: &Branch, field: &str, query: &str) -> bool {
        match field {
            COMMENT => comment_contains(issue, query),
            ATTACH => {
                let names = self.attachments(issue.key());
                if query.is_empty() {
                    !names.is_empty()
                } else {
                    names.iter().any(|name| name.contains(query))
                }
            }
            _ => contains(field::get(issue, field).unwrap_or_default(), query),
        }
    }

    fn compares(&self, issue: &Branch, field: &str, query: &str, want_less: bool) -> bool {
        let wanted = if want_less {
            Ordering::Less
        } else {
            Ordering::Greater
        };

        match field {
            COMMENT => field::comments(issue)
                .next()
                .map_or(!want_less, |first| first.key().cmp(query) == wanted),
            ATTACH => query.trim().parse::<usize>().map_or(!want_less, |limit| {
                self.attachments(issue.key()).len().cmp(&limit) == wanted
            }),
            _ => match field::get(issue, field) {
                Some(value) if !value.is_empty() => value.cmp(query) == wanted,
                _ => !want_less,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::field::{PRIORITY, SUMMARY};
    use crate::store::{ISSUE_FILE, Layout, StoreConfig};

    fn open(dir: &Path, text: &str) -> IssueStore {
        fs::write(dir.join(ISSUE_FILE), text).unwrap();
        IssueStore::open(StoreConfig::new(dir, Layout::Flat)).unwrap()
    }

    fn prioritized(dir: &Path) -> IssueStore {
        open(
            dir,
            "= aaa\npriority: 1\nclosed:\n\
             = bbb\npriority: 3\nclosed: 2026-01-05T00:00:00Z ada\n\
             = ccc\npriority: 2\nclosed:\n",
        )
    }

    #[test]
    fn test_sort_priorities() {
        let dir = tempfile::tempdir().unwrap();
        let store = prioritized(dir.path());
        let mut ids = store.issue_ids();

        store.sort(&mut ids, PRIORITY, true);
        assert_eq!(ids, vec!["aaa", "ccc", "bbb"]);
        store.sort(&mut ids, "prio", false);
        assert_eq!(ids, vec!["bbb", "ccc", "aaa"]);
    }

    #[test]
    fn test_sort_is_stable_both_ways() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(
            dir.path(),
            "= x1\npriority: 1\n= x2\npriority: 2\n= x3\npriority: 1\n= x4\n",
        );

        let mut ids = vec!["x3".to_string(), "x4".into(), "x2".into(), "x1".into()];
        store.sort(&mut ids, PRIORITY, true);
        assert_eq!(ids, vec!["x4", "x3", "x1", "x2"]);

        let mut ids = vec!["x3".to_string(), "x4".into(), "x2".into(), "x1".into()];
        store.sort(&mut ids, PRIORITY, false);
        assert_eq!(ids, vec!["x2", "x3", "x1", "x4"]);
    }

    #[test]
    fn test_open_and_closed_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = prioritized(dir.path());
        assert_eq!(store.select(&Selection::Default, true), vec!["aaa", "ccc"]);
        assert!(store.select(&Selection::Default, false).is_empty());
        assert_eq!(
            store.select(&Selection::With(CLOSED.into(), String::new()), true),
            vec!["bbb"]
        );

        field::set(store.issue_mut("aaa").unwrap(), CLOSED, "2026-02-01T00:00:00Z bob").unwrap();
        assert_eq!(store.select(&Selection::Default, true), vec!["ccc"]);
        assert_eq!(
            store.select(&Selection::With(CLOSED.into(), String::new()), true),
            vec!["aaa", "bbb"]
        );
    }

    #[test]
    fn test_match_comment() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path(), "= one\nsummary: urgent in title\n= two\n= three\n");
        store.add_comment("two", "ada", "this is urgent").unwrap();
        store.add_comment("three", "ada", "can wait").unwrap();

        assert_eq!(store.matches(COMMENT, "urgent", true), vec!["two"]);
        assert_eq!(store.matches(COMMENT, "urgent", false), vec!["one", "three"]);
        // stamps are searchable too
        assert_eq!(store.matches(COMMENT, "ada", true), vec!["two", "three"]);
    }

    #[test]
    fn test_match_substring_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(
            dir.path(),
            "= a\nsummary: Crash on start\n= b\nsummary:\n= c\n",
        );
        assert_eq!(store.matches(SUMMARY, "crash", true), Vec::<String>::new());
        assert_eq!(store.matches(SUMMARY, "Crash", true), vec!["a"]);
        // empty never contains empty
        assert_eq!(store.matches(SUMMARY, "", true), vec!["a"]);
        assert_eq!(store.matches(SUMMARY, "", false), vec!["b", "c"]);
    }

    #[test]
    fn test_compare_empty_query_selects_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = prioritized(dir.path());
        for field in [PRIORITY, COMMENT, ATTACH, "nope"] {
            assert!(store.compare(field, "", true).is_empty());
            assert!(store.compare(field, "", false).is_empty());
        }
    }

    #[test]
    fn test_compare_unset_is_maximal() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(dir.path(), "= a\npriority: 1\n= b\npriority:\n= c\npriority: 3\n");
        assert_eq!(store.compare(PRIORITY, "2", true), vec!["a"]);
        assert_eq!(store.compare(PRIORITY, "2", false), vec!["b", "c"]);
        // boundary value is on neither side
        assert_eq!(store.compare(PRIORITY, "3", false), vec!["b"]);
    }

    #[test]
    fn test_compare_first_comment() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(
            dir.path(),
            "= a\n== 2026-01-01T00:00:00Z ada\n---\nfirst\n---\n\
             == 2026-03-01T00:00:00Z ada\n---\nlater\n---\n\
             = b\n",
        );
        assert_eq!(store.compare(COMMENT, "2026-02", true), vec!["a"]);
        assert_eq!(store.compare(COMMENT, "2026-02", false), vec!["b"]);
    }

    #[test]
    fn test_attach_predicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path(), "= a\n= b\n");
        for name in ["log.txt", "shot.png"] {
            let src = dir.path().join(name);
            fs::write(&src, name).unwrap();
            store.attach("a", &src, "ada", "").unwrap();
        }

        assert_eq!(store.matches(ATTACH, "", true), vec!["a"]);
        assert_eq!(store.matches(ATTACH, ".png", true), vec!["a"]);
        assert_eq!(store.matches(ATTACH, ".gif", false), vec!["a", "b"]);
        assert_eq!(store.compare(ATTACH, "1", false), vec!["a"]);
        assert_eq!(store.compare(ATTACH, "1", true), vec!["b"]);
        assert!(store.compare(ATTACH, "many", true).is_empty());
        assert_eq!(store.compare(ATTACH, "many", false), vec!["a", "b"]);
    }

    #[test]
    fn test_select_ids_resolves_prefixes() {
        let dir = tempfile::tempdir().unwrap();
        let store = prioritized(dir.path());
        let selection = Selection::Ids(vec!["cc".into(), "zzz".into(), "a".into()]);
        assert_eq!(store.select(&selection, true), vec!["ccc", "aaa"]);
        assert_eq!(store.select(&Selection::All, false), vec!["aaa", "bbb", "ccc"]);
    }
}
