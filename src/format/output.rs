use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use lit_lib::field::{self, CREATED, UPDATED};
use lit_lib::stamp::parse_stamp;
use lit_lib::{Branch, Node};
use serde::{Deserialize, Serialize};

/// An issue for `show --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueView {
    pub id: String,
    pub closed: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub fields: BTreeMap<String, String>,
    pub comments: Vec<CommentView>,
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub stamp: String,
    pub author: String,
    pub created_at: Option<DateTime<Utc>>,
    pub body: String,
}

impl IssueView {
    #[must_use]
    pub fn new(issue: &Branch, attachments: Vec<String>) -> Self {
        let time = |key| field::get(issue, key).and_then(parse_stamp).map(|(time, _)| time);
        Self {
            id: issue.key().to_string(),
            closed: field::is_closed(issue),
            created_at: time(CREATED),
            updated_at: time(UPDATED),
            fields: issue
                .leaves()
                .map(|leaf| (leaf.key().to_string(), leaf.value().to_string()))
                .collect(),
            comments: field::comments(issue).map(CommentView::new).collect(),
            attachments,
        }
    }
}

impl CommentView {
    #[must_use]
    pub fn new(comment: &Branch) -> Self {
        let parsed = parse_stamp(comment.key());
        let body = comment
            .kids()
            .iter()
            .filter_map(Node::as_leaf)
            .map(lit_lib::Leaf::value)
            .collect::<Vec<_>>()
            .join("\n\n");
        Self {
            stamp: comment.key().to_string(),
            author: parsed.map(|(_, actor)| actor.to_string()).unwrap_or_default(),
            created_at: parsed.map(|(time, _)| time),
            body,
        }
    }
}
