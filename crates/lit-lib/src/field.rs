//! Field access on issue branches.
//!
//! Callers may abbreviate field names: a key addresses the first leaf (in
//! child order) whose key starts with it, so `assign` reaches `assigned`.
//! Comment branches and text leaves never take part in resolution. The
//! same resolver backs get, set, match, compare, and sort.

use crate::error::{LitError, Result};
use crate::outline::{Branch, Leaf, LeafKind, Node};

pub const CREATED: &str = "created";
pub const UPDATED: &str = "updated";
pub const CLOSED: &str = "closed";
pub const SUMMARY: &str = "summary";
pub const TAGS: &str = "tags";
pub const PRIORITY: &str = "priority";
pub const ASSIGNED: &str = "assigned";
pub const DESCRIPTION: &str = "description";

/// Fixed fields of a new issue, in creation order.
pub const FIELDS: [&str; 8] = [
    CREATED,
    UPDATED,
    CLOSED,
    SUMMARY,
    TAGS,
    PRIORITY,
    ASSIGNED,
    DESCRIPTION,
];

/// The leaf a key prefix resolves to, if any.
#[must_use]
pub fn resolve<'a>(issue: &'a Branch, key: &str) -> Option<&'a Leaf> {
    if key.is_empty() {
        return None;
    }
    issue.leaves().find(|leaf| leaf.key().starts_with(key))
}

/// The full key a prefix resolves to, if any.
#[must_use]
pub fn resolve_key<'a>(issue: &'a Branch, key: &str) -> Option<&'a str> {
    resolve(issue, key).map(Leaf::key)
}

/// Get the value for `key`.
#[must_use]
pub fn get<'a>(issue: &'a Branch, key: &str) -> Option<&'a str> {
    resolve(issue, key).map(Leaf::value)
}

/// Check that `key` reads back as the same leaf key once written.
///
/// # Errors
///
/// Returns `Validation` if `key` is empty, starts with `=`, or contains `:`,
/// whitespace, or control characters.
pub fn check_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "cannot be empty"
    } else if key.starts_with('=') {
        "cannot start with '='"
    } else if key.contains(':') {
        "cannot contain ':'"
    } else if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
        "cannot contain whitespace or control characters"
    } else {
        return Ok(());
    };
    Err(LitError::validation("key", format!("{key:?} {reason}")))
}

/// Set the value for `key`.
///
/// Updates the resolved leaf, or inserts a new one when nothing resolves.
/// A new single-line field goes after the last single-line leaf, ahead of
/// long blocks such as `description`; a new long field goes after the last
/// keyed leaf. It is named by the fixed field the key abbreviates, or by
/// the key itself.
///
/// # Errors
///
/// Returns `Validation` if `key` fails [`check_key`].
pub fn set(issue: &mut Branch, key: &str, value: &str) -> Result<()> {
    check_key(key)?;

    if let Some(leaf) = issue.leaves_mut().find(|leaf| leaf.key().starts_with(key)) {
        leaf.set_value(value);
        return Ok(());
    }

    let name = canonical_key(key);
    let leaf = if name == DESCRIPTION {
        Leaf::long(name, value)
    } else {
        Leaf::new(name, value)
    };
    let kids = issue.kids();
    let last_keyed = || {
        kids.iter()
            .rposition(|node| matches!(node, Node::Leaf(l) if !l.is_text()))
    };
    let last_short = kids
        .iter()
        .rposition(|node| matches!(node, Node::Leaf(l) if l.kind() == LeafKind::Short));
    let after = match leaf.kind() {
        LeafKind::Short => last_short.or_else(last_keyed),
        _ => last_keyed(),
    }
    .map_or(0, |idx| idx + 1);
    issue.insert(after, leaf);
    Ok(())
}

/// Expand a key to the fixed field it abbreviates.
#[must_use]
pub fn canonical_key(key: &str) -> &str {
    FIELDS
        .iter()
        .copied()
        .find(|field| !key.is_empty() && field.starts_with(key))
        .unwrap_or(key)
}

/// Build a new issue with every fixed field, stamped `created` and `updated`.
#[must_use]
pub fn skeleton(id: &str, stamp: &str) -> Branch {
    let mut issue = Branch::new(id);
    for field in FIELDS {
        let leaf = match field {
            CREATED | UPDATED => Leaf::new(field, stamp),
            DESCRIPTION => Leaf::long(field, ""),
            _ => Leaf::new(field, ""),
        };
        issue.append(leaf);
    }
    issue
}

/// An issue is closed when its `closed` stamp is non-empty.
#[must_use]
pub fn is_closed(issue: &Branch) -> bool {
    get(issue, CLOSED).is_some_and(|closed| !closed.is_empty())
}

/// Comment branches in insertion order.
pub fn comments(issue: &Branch) -> impl Iterator<Item = &Branch> {
    issue.branches()
}
