//! Outline documents: the plain-text tree every issue lives in.
//!
//! A document is a root [`Branch`] whose children are [`Node`]s. The text
//! form is line oriented:
//!
//! ```text
//! = 6f1c0f52-5d0e-4c83-a36f-8f1a2e3c9b10
//! created: 2026-10-17T09:12:44Z ada@lab
//! summary: Parser drops trailing fence
//! description: ---
//! Any text, including lines that
//! look like = headers or key: value pairs.
//! ---
//! == 2026-10-17T10:01:02Z bob@lab
//! ---
//! A comment body.
//! ---
//! ```
//!
//! - `=` repeated *d* times opens a branch at depth *d*.
//! - `key: value` is a short leaf of the innermost open branch.
//! - `key: ---` opens a long leaf, closed by a line that is exactly `---`.
//! - a bare `---` opens a text leaf (no key), closed the same way.
//!
//! Inside a fenced block, a line that would read as the closing fence, or
//! that starts with `\`, is written with one extra leading `\`.

use std::fmt;

use crate::error::{LitError, Result};

const FENCE: &str = "---";
const ESCAPE: char = '\\';

/// How a leaf is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeafKind {
    /// `key: value` on one line.
    #[default]
    Short,
    /// `key: ---` followed by a fenced block.
    Long,
    /// A fenced block with no key.
    Text,
}

/// A named scalar or multi-line value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    key: String,
    value: String,
    kind: LeafKind,
}

impl Leaf {
    /// Create a single-line leaf.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind: LeafKind::Short,
        }
    }

    /// Create a multi-line leaf.
    #[must_use]
    pub fn long(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind: LeafKind::Long,
        }
    }

    /// Create a keyless text leaf.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            key: String::new(),
            value: value.into(),
            kind: LeafKind::Text,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub const fn kind(&self) -> LeafKind {
        self.kind
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        self.kind == LeafKind::Text
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Short leaves are trimmed on read, so a value that a short line would
    /// not reproduce is written as a block.
    fn needs_fence(&self) -> bool {
        self.kind != LeafKind::Short
            || self.value.contains('\n')
            || self.value.trim() != self.value
            || self.value == FENCE
    }
}

/// A child of a [`Branch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Branch(Branch),
    Leaf(Leaf),
}

impl Node {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Branch(branch) => branch.key(),
            Self::Leaf(leaf) => leaf.key(),
        }
    }

    #[must_use]
    pub const fn as_branch(&self) -> Option<&Branch> {
        match self {
            Self::Branch(branch) => Some(branch),
            Self::Leaf(_) => None,
        }
    }

    #[must_use]
    pub const fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Branch(_) => None,
        }
    }
}

impl From<Branch> for Node {
    fn from(branch: Branch) -> Self {
        Self::Branch(branch)
    }
}

impl From<Leaf> for Node {
    fn from(leaf: Leaf) -> Self {
        Self::Leaf(leaf)
    }
}

/// A named node with ordered children. The root branch has an empty key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Branch {
    key: String,
    kids: Vec<Node>,
}

impl Branch {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kids: Vec::new(),
        }
    }

    /// An empty document root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.key.is_empty()
    }

    #[must_use]
    pub fn kids(&self) -> &[Node] {
        &self.kids
    }

    pub fn kids_mut(&mut self) -> &mut Vec<Node> {
        &mut self.kids
    }

    /// Replace all children, returning the old ones.
    pub fn replace_kids(&mut self, kids: Vec<Node>) -> Vec<Node> {
        std::mem::replace(&mut self.kids, kids)
    }

    pub fn append(&mut self, node: impl Into<Node>) {
        self.kids.push(node.into());
    }

    /// Insert a child at `idx`, or append if `idx` is past the end.
    pub fn insert(&mut self, idx: usize, node: impl Into<Node>) {
        let idx = idx.min(self.kids.len());
        self.kids.insert(idx, node.into());
    }

    /// Keyed leaves in child order. Text leaves are skipped.
    pub fn leaves(&self) -> impl Iterator<Item = &Leaf> {
        self.kids
            .iter()
            .filter_map(Node::as_leaf)
            .filter(|leaf| !leaf.is_text())
    }

    /// Keyed leaves in child order, mutably.
    pub fn leaves_mut(&mut self) -> impl Iterator<Item = &mut Leaf> {
        self.kids.iter_mut().filter_map(|node| match node {
            Node::Leaf(leaf) if !leaf.is_text() => Some(leaf),
            _ => None,
        })
    }

    /// Child branches in order.
    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.kids.iter().filter_map(Node::as_branch)
    }

    /// Render this branch as the top of a document fragment at `depth`.
    #[must_use]
    pub fn render(&self, depth: usize) -> String {
        let mut out = String::new();
        write_branch(&mut out, self, depth.max(1));
        out
    }

    /// Parse outline text into a root branch.
    ///
    /// # Errors
    ///
    /// Returns `Parse` with the 1-based line number of the first line that
    /// is not a header, leaf, or fenced block, or of an unterminated block.
    pub fn parse(text: &str) -> Result<Self> {
        let mut root = Self::root();
        let mut open: Vec<Self> = Vec::new();
        let mut lines = text.lines().enumerate().map(|(idx, line)| (idx + 1, line));

        while let Some((line_no, raw)) = lines.next() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('=') {
                let depth = line.chars().take_while(|&c| c == '=').count();
                let key = line[depth..].trim();
                if key.is_empty() {
                    return Err(LitError::parse(line_no, "branch header without a key"));
                }
                if depth > open.len() + 1 {
                    return Err(LitError::parse(
                        line_no,
                        format!("branch at depth {depth} has no parent at depth {}", depth - 1),
                    ));
                }
                while open.len() >= depth {
                    close_innermost(&mut root, &mut open);
                }
                open.push(Self::new(key));
                continue;
            }

            let parent = open.last_mut().unwrap_or(&mut root);

            if line == FENCE {
                let body = read_block(&mut lines, line_no)?;
                parent.append(Leaf::text(body));
                continue;
            }

            if let Some((key, rest)) = line.split_once(':') {
                let key = key.trim();
                if key.is_empty() {
                    return Err(LitError::parse(line_no, "value without a key"));
                }
                let rest = rest.trim();
                if rest == FENCE {
                    let body = read_block(&mut lines, line_no)?;
                    parent.append(Leaf::long(key, body));
                } else {
                    parent.append(Leaf::new(key, rest));
                }
                continue;
            }

            return Err(LitError::parse(line_no, format!("unrecognized line '{line}'")));
        }

        while !open.is_empty() {
            close_innermost(&mut root, &mut open);
        }
        Ok(root)
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        if self.is_root() {
            write_kids(&mut out, &self.kids, 0);
        } else {
            write_branch(&mut out, self, 1);
        }
        f.write_str(&out)
    }
}

fn close_innermost(root: &mut Branch, open: &mut Vec<Branch>) {
    if let Some(done) = open.pop() {
        open.last_mut().unwrap_or(root).append(done);
    }
}

fn read_block<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    opened_at: usize,
) -> Result<String> {
    let mut body: Vec<&str> = Vec::new();
    for (_, raw) in lines.by_ref() {
        if raw.trim_end() == FENCE {
            return Ok(body.join("\n"));
        }
        body.push(raw.strip_prefix(ESCAPE).unwrap_or(raw));
    }
    Err(LitError::parse(opened_at, "block is never closed with ---"))
}

fn write_branch(out: &mut String, branch: &Branch, depth: usize) {
    for _ in 0..depth {
        out.push('=');
    }
    out.push(' ');
    out.push_str(branch.key());
    out.push('\n');
    write_kids(out, &branch.kids, depth);
}

fn write_kids(out: &mut String, kids: &[Node], depth: usize) {
    for kid in kids {
        match kid {
            Node::Leaf(leaf) => write_leaf(out, leaf),
            Node::Branch(branch) => {
                if depth == 0 && !out.is_empty() {
                    out.push('\n');
                }
                write_branch(out, branch, depth + 1);
            }
        }
    }
}

fn write_leaf(out: &mut String, leaf: &Leaf) {
    if !leaf.needs_fence() {
        out.push_str(leaf.key());
        out.push(':');
        if !leaf.value().is_empty() {
            out.push(' ');
            out.push_str(leaf.value());
        }
        out.push('\n');
        return;
    }

    if !leaf.is_text() {
        out.push_str(leaf.key());
        out.push_str(": ");
    }
    out.push_str(FENCE);
    out.push('\n');
    for line in leaf.value().split('\n') {
        if line.trim_end() == FENCE || line.starts_with(ESCAPE) {
            out.push(ESCAPE);
        }
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(FENCE);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Branch {
        let mut issue = Branch::new("abc-123");
        issue.append(Leaf::new("summary", "Crash on start"));
        issue.append(Leaf::new("tags", ""));
        issue.append(Leaf::long("description", "line one\n---\n\\escaped\n= not a header"));
        let mut comment = Branch::new("2026-01-02T03:04:05Z ada");
        comment.append(Leaf::text("looks urgent"));
        issue.append(comment);

        let mut root = Branch::root();
        root.append(issue);
        root.append(Branch::new("def-456"));
        root
    }

    #[test]
    fn test_render_then_parse_roundtrip() {
        let root = sample();
        let text = root.to_string();
        let parsed = Branch::parse(&text).unwrap();
        assert_eq!(parsed, root);
    }

    #[test]
    fn test_render_layout() {
        let text = sample().to_string();
        assert!(text.starts_with("= abc-123\nsummary: Crash on start\ntags:\n"));
        assert!(text.contains("description: ---\nline one\n\\---\n\\\\escaped\n= not a header\n---\n"));
        assert!(text.contains("== 2026-01-02T03:04:05Z ada\n---\nlooks urgent\n---\n"));
        assert!(text.contains("\n\n= def-456\n"));
    }

    #[test]
    fn test_parse_empty_document() {
        let root = Branch::parse("").unwrap();
        assert!(root.is_root());
        assert!(root.kids().is_empty());
    }

    #[test]
    fn test_parse_nested_and_dedent() {
        let text = "= a\nx: 1\n== b\n=== c\ny: 2\n= d\n";
        let root = Branch::parse(text).unwrap();
        let tops: Vec<&str> = root.branches().map(Branch::key).collect();
        assert_eq!(tops, vec!["a", "d"]);
        let a = root.branches().next().unwrap();
        let b = a.branches().next().unwrap();
        let c = b.branches().next().unwrap();
        assert_eq!(c.leaves().next().unwrap().value(), "2");
    }

    #[test]
    fn test_parse_rejects_skipped_depth() {
        let err = Branch::parse("= a\n=== c\n").unwrap_err();
        assert!(matches!(err, LitError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_rejects_garbage_line() {
        let err = Branch::parse("= a\nsummary: ok\njust words\n").unwrap_err();
        assert!(matches!(err, LitError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_parse_rejects_unterminated_block() {
        let err = Branch::parse("= a\ndescription: ---\nnever closed\n").unwrap_err();
        assert!(matches!(err, LitError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_short_leaf_with_newline_renders_as_block() {
        let mut root = Branch::root();
        let mut issue = Branch::new("id");
        issue.append(Leaf::new("summary", "two\nlines"));
        issue.append(Leaf::new("odd", "---"));
        root.append(issue);

        let parsed = Branch::parse(&root.to_string()).unwrap();
        let values: Vec<&str> = parsed.branches().next().unwrap().leaves().map(Leaf::value).collect();
        assert_eq!(values, vec!["two\nlines", "---"]);
    }

    #[test]
    fn test_padded_short_value_keeps_whitespace() {
        let mut root = Branch::root();
        let mut issue = Branch::new("id");
        issue.append(Leaf::new("summary", "  padded  "));
        issue.append(Leaf::new("blank", "   "));
        issue.append(Leaf::new("plain", "as is"));
        root.append(issue);

        let text = root.to_string();
        assert!(text.contains("summary: ---\n  padded  \n---\n"));
        assert!(text.contains("plain: as is\n"));

        let parsed = Branch::parse(&text).unwrap();
        let values: Vec<&str> = parsed.branches().next().unwrap().leaves().map(Leaf::value).collect();
        assert_eq!(values, vec!["  padded  ", "   ", "as is"]);
    }

    #[test]
    fn test_empty_long_value_roundtrip() {
        let mut root = Branch::root();
        let mut issue = Branch::new("id");
        issue.append(Leaf::long("description", ""));
        issue.append(Leaf::long("notes", "\n"));
        root.append(issue);

        let parsed = Branch::parse(&root.to_string()).unwrap();
        assert_eq!(parsed, root);
    }

    #[test]
    fn test_leaves_skip_text_and_branches() {
        let root = sample();
        let issue = root.branches().next().unwrap();
        let keys: Vec<&str> = issue.leaves().map(Leaf::key).collect();
        assert_eq!(keys, vec!["summary", "tags", "description"]);
    }

    #[test]
    fn test_render_single_branch() {
        let root = sample();
        let issue = root.branches().next().unwrap();
        assert!(issue.render(1).starts_with("= abc-123\n"));
        assert_eq!(issue.to_string(), issue.render(1));
    }

    #[test]
    fn test_crlf_input() {
        let root = Branch::parse("= a\r\nsummary: hi\r\n").unwrap();
        let issue = root.branches().next().unwrap();
        assert_eq!(issue.leaves().next().unwrap().value(), "hi");
    }
}
