//! Trailing selection words.
//!
//! ```text
//! [sortby|rsortby KEY] [all | IDS... | with|without KEY [VAL] | less|greater KEY VAL]
//! ```
//!
//! When stdin is a pipe its words are appended, and commands that would
//! otherwise default to open issues select nothing.

use std::io::{self, Read};

use lit_lib::{IssueStore, LitError, Result, Selection, SortSpec};

/// Parsed selection words.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Spec {
    pub sort: Option<SortSpec>,
    pub selection: Selection,
}

impl Spec {
    /// Parse spec words.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a sort or filter keyword is missing its key.
    pub fn parse(words: &[String]) -> Result<Self> {
        let mut rest = words;
        let mut sort = None;

        if let [order @ ("sortby" | "rsortby"), tail @ ..] = str_words(rest).as_slice() {
            let Some(key) = tail.first() else {
                return Err(LitError::validation(
                    *order,
                    "sort requested, but no key given to sort by",
                ));
            };
            sort = Some(SortSpec::new(*key, *order == "sortby"));
            rest = &rest[2..];
        }

        let selection = match str_words(rest).as_slice() {
            [] => Selection::Default,
            ["all", ..] => Selection::All,
            [op @ ("with" | "without" | "less" | "greater"), args @ ..] => {
                let Some(key) = args.first() else {
                    return Err(LitError::validation(*op, "you must specify a key"));
                };
                let key = (*key).to_string();
                let value = args.get(1).map_or_else(String::new, |v| (*v).to_string());
                match *op {
                    "with" => Selection::With(key, value),
                    "without" => Selection::Without(key, value),
                    "less" => Selection::Less(key, value),
                    _ => Selection::Greater(key, value),
                }
            }
            _ => Selection::Ids(rest.to_vec()),
        };

        Ok(Self { sort, selection })
    }

    /// Selected identifiers, sorted if requested.
    #[must_use]
    pub fn resolve(&self, store: &IssueStore, default_open: bool) -> Vec<String> {
        let mut ids = store.select(&self.selection, default_open);
        if let Some(sort) = &self.sort {
            store.sort(&mut ids, &sort.field, sort.ascending);
        }
        ids
    }
}

fn str_words(words: &[String]) -> Vec<&str> {
    words.iter().map(String::as_str).collect()
}

/// Words piped in on stdin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipedInput {
    pub piped: bool,
    pub words: Vec<String>,
}

impl PipedInput {
    /// Read stdin if it is a pipe.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipe cannot be read.
    pub fn detect() -> io::Result<Self> {
        if !stdin_is_pipe() {
            return Ok(Self::default());
        }
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(Self::from_text(&text))
    }

    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            piped: true,
            words: text.split_whitespace().map(str::to_string).collect(),
        }
    }
}

#[cfg(unix)]
fn stdin_is_pipe() -> bool {
    use std::os::unix::fs::FileTypeExt;
    std::fs::metadata("/dev/stdin").is_ok_and(|meta| meta.file_type().is_fifo())
}

#[cfg(not(unix))]
fn stdin_is_pipe() -> bool {
    false
}
