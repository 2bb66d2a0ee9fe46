//! In-memory dedupe and the username projection.
//! All helpers keep first-seen order; only `sort_usernames` reorders.

use crate::record::CommentRecord;
use ahash::AHashSet;

/// Keep the first record for each id. Records without an id are dropped.
/// Idempotent.
pub fn dedupe_by_id(records: Vec<CommentRecord>) -> Vec<CommentRecord> {
    let mut seen: AHashSet<String> = AHashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| match r.id.as_deref() {
            Some(id) => seen.insert(id.to_string()),
            None => false,
        })
        .collect()
}

/// Unique usernames in first-seen order (case-sensitive key). Missing or empty
/// usernames are skipped.
pub fn usernames_unique(records: &[CommentRecord]) -> Vec<String> {
    let mut seen: AHashSet<&str> = AHashSet::new();
    let mut out = Vec::new();
    for u in records.iter().filter_map(|r| r.username.as_deref()) {
        if !u.is_empty() && seen.insert(u) {
            out.push(u.to_string());
        }
    }
    out
}

/// Every username in record order, repeats included.
pub fn usernames_all(records: &[CommentRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.username.as_deref())
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}

/// Stable case-insensitive ascending sort.
pub fn sort_usernames(names: &mut [String]) {
    names.sort_by_cached_key(|s| s.to_lowercase());
}

/// Projection used by the usernames shape: deduped or raw, then sorted.
pub fn username_projection(records: &[CommentRecord], dedupe: bool) -> Vec<String> {
    let mut names = if dedupe { usernames_unique(records) } else { usernames_all(records) };
    sort_usernames(&mut names);
    names
}
