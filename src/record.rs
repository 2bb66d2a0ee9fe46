//! Flat comment records and the mapping from raw GraphQL comment nodes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One top-level (parent) comment.
/// `replies` is `None` unless reply inclusion was requested.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: Option<String>,
    pub username: Option<String>,
    pub text: Option<String>,
    pub like_count: Option<u64>,
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<ReplyRecord>>,
}

/// A reply under a parent comment. Deeper nesting is not modeled.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRecord {
    pub id: Option<String>,
    pub username: Option<String>,
    pub text: Option<String>,
    pub like_count: Option<u64>,
    pub created_at: Option<i64>,
}

impl CommentRecord {
    #[inline]
    pub fn likes_or_zero(&self) -> u64 {
        self.like_count.unwrap_or(0)
    }

    pub fn reply_count(&self) -> usize {
        self.replies.as_ref().map_or(0, Vec::len)
    }
}

/// Fields shared by parent comments and replies.
struct NodeFields {
    id: Option<String>,
    username: Option<String>,
    text: Option<String>,
    like_count: Option<u64>,
    created_at: Option<i64>,
}

/// Ids are opaque strings; numeric ids are stringified rather than dropped.
fn id_of(node: &Value) -> Option<String> {
    match node.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn read_fields(node: &Value) -> NodeFields {
    NodeFields {
        id: id_of(node),
        username: node
            .get("owner")
            .and_then(|o| o.get("username"))
            .and_then(Value::as_str)
            .map(str::to_string),
        text: node.get("text").and_then(Value::as_str).map(str::to_string),
        like_count: node.get("like_count").and_then(Value::as_u64),
        created_at: node.get("created_at").and_then(Value::as_i64),
    }
}

/// Map a reply node. Absent fields become `None`.
pub fn extract_reply(node: &Value) -> ReplyRecord {
    let f = read_fields(node);
    ReplyRecord {
        id: f.id,
        username: f.username,
        text: f.text,
        like_count: f.like_count,
        created_at: f.created_at,
    }
}

/// Map a parent comment node. With `include_replies`, nodes under
/// `edge_threaded_comments.edges[].node` are mapped in order; a missing
/// container yields an empty list.
pub fn extract_comment(node: &Value, include_replies: bool) -> CommentRecord {
    let f = read_fields(node);
    let replies = include_replies.then(|| {
        node.get("edge_threaded_comments")
            .and_then(|t| t.get("edges"))
            .and_then(Value::as_array)
            .map(|edges| {
                edges
                    .iter()
                    .map(|e| e.get("node").map(extract_reply).unwrap_or_default())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    });
    CommentRecord {
        id: f.id,
        username: f.username,
        text: f.text,
        like_count: f.like_count,
        created_at: f.created_at,
        replies,
    }
}
