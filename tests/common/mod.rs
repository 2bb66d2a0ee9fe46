#![allow(dead_code)]

use anyhow::{Context, Result};
use instacomments::{QueryExecutor, QueryVariables, ScrapeError, ScrapeResult};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// In-memory executor that replays scripted page bodies (or errors) in order
/// and records every variables object it was called with.
#[derive(Default)]
pub struct ScriptedExecutor {
    script: RefCell<VecDeque<ScrapeResult<Value>>>,
    calls: RefCell<Vec<QueryVariables>>,
}

impl ScriptedExecutor {
    pub fn new(pages: Vec<Value>) -> Self {
        let s = Self::default();
        for p in pages {
            s.push_ok(p);
        }
        s
    }
    pub fn push_ok(&self, body: Value) {
        self.script.borrow_mut().push_back(Ok(body));
    }
    pub fn push_err(&self, err: ScrapeError) {
        self.script.borrow_mut().push_back(Err(err));
    }
    pub fn calls(&self) -> Vec<QueryVariables> {
        self.calls.borrow().clone()
    }
    pub fn request_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl QueryExecutor for ScriptedExecutor {
    fn fetch_page(&self, vars: &QueryVariables) -> ScrapeResult<Value> {
        self.calls.borrow_mut().push(vars.clone());
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request #{} ({vars:?})", self.request_count()))
    }
}

/// One raw comment node.
pub fn node(id: &str, user: &str, text: &str, likes: u64) -> Value {
    json!({
        "id": id,
        "owner": {"username": user},
        "text": text,
        "like_count": likes,
        "created_at": 1_700_000_000 + likes as i64
    })
}

/// A comment node carrying threaded replies.
pub fn node_with_replies(id: &str, user: &str, replies: &[Value]) -> Value {
    let mut n = node(id, user, "parent", 1);
    let edges: Vec<Value> = replies.iter().map(|r| json!({"node": r})).collect();
    n["edge_threaded_comments"] = json!({"count": edges.len(), "edges": edges});
    n
}

/// A full page body in the query's response shape.
pub fn page(nodes: Vec<Value>, next_cursor: Option<&str>) -> Value {
    let edges: Vec<Value> = nodes.into_iter().map(|n| json!({"node": n})).collect();
    json!({
        "data": {"shortcode_media": {"edge_media_to_parent_comment": {
            "count": edges.len(),
            "edges": edges,
            "page_info": {"has_next_page": next_cursor.is_some(), "end_cursor": next_cursor}
        }}},
        "status": "ok"
    })
}

/// The body returned for private/unknown media or an expired session.
pub fn missing_media_page() -> Value {
    json!({"data": {"shortcode_media": null}, "status": "ok"})
}

/// `n` nodes with ids `{prefix}{i}`, users `user{i}` and `likes` each.
pub fn nodes(prefix: &str, n: usize, likes: u64) -> Vec<Value> {
    (0..n).map(|i| node(&format!("{prefix}{i}"), &format!("user{i}"), "hi", likes)).collect()
}

pub fn read_to_string(path: &Path) -> Result<String> {
    let mut s = String::new();
    File::open(path)
        .with_context(|| format!("open {}", path.display()))?
        .read_to_string(&mut s)?;
    Ok(s)
}

pub fn read_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    BufReader::new(f).lines().map(|l| l.unwrap()).collect()
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_str(&read_to_string(path).unwrap()).unwrap()
}
