//! Tag sets stored in the space-separated `tags` field.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{LitError, Result};
use crate::field::{self, TAGS};
use crate::outline::Branch;

/// A deduplicated, sorted set of tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    /// Split a tag field on whitespace.
    #[must_use]
    pub fn parse(tags: &str) -> Self {
        Self(tags.split_whitespace().map(str::to_string).collect())
    }

    /// Returns whether the tag was newly added.
    pub fn insert(&mut self, tag: &str) -> bool {
        self.0.insert(tag.to_string())
    }

    /// Returns whether the tag was present.
    pub fn remove(&mut self, tag: &str) -> bool {
        self.0.remove(tag)
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for tag in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(tag)?;
            first = false;
        }
        Ok(())
    }
}

/// Add or remove `tag` in the issue's tag field and write it back in
/// canonical form.
///
/// # Errors
///
/// Returns `Validation` if the tag is empty or contains whitespace.
pub fn modify_tag(issue: &mut Branch, tag: &str, add: bool) -> Result<()> {
    if tag.is_empty() {
        return Err(LitError::validation("tag", "cannot be empty"));
    }
    if tag.chars().any(char::is_whitespace) {
        return Err(LitError::validation("tag", "cannot contain whitespace"));
    }

    let mut tags = TagSet::parse(field::get(issue, TAGS).unwrap_or_default());
    if add {
        tags.insert(tag);
    } else {
        tags.remove(tag);
    }
    field::set(issue, TAGS, &tags.to_string())
}
