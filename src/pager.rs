//! Cursor-driven page loop: FETCHING until one of the stop conditions, then DONE.
//!
//! Fatal executor errors propagate as `Err`. Every other way the loop ends
//! (no more pages, count cap, missing container, malformed page structure) is a
//! `StopReason` returned with whatever was collected.

use crate::config::ScrapeOptions;
use crate::error::ScrapeResult;
use crate::filters::{cap_reached, passes_min_likes};
use crate::progress::{NoProgress, ProgressObserver};
use crate::query::{QueryExecutor, QueryVariables};
use crate::record::{extract_comment, CommentRecord};
use serde_json::Value;
use std::fmt;

static NULL_NODE: Value = Value::Null;

/// Why the page loop stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Last page reported `has_next_page = false`.
    Exhausted,
    /// `max_comments` qualifying records collected.
    CountCap,
    /// `data.shortcode_media` absent: bad shortcode, private content or expired session.
    MissingContainer,
    /// A page lacked structure the loop indexes directly.
    Structural(String),
}

impl StopReason {
    /// True for the two reasons that mean the target was read as far as requested.
    pub fn is_complete(&self) -> bool {
        matches!(self, StopReason::Exhausted | StopReason::CountCap)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Exhausted => f.write_str("no more pages"),
            StopReason::CountCap => f.write_str("max comment count reached"),
            StopReason::MissingContainer => f.write_str("comment container missing"),
            StopReason::Structural(msg) => write!(f, "malformed page: {msg}"),
        }
    }
}

/// Continuation state, replaced once per page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageState {
    pub cursor: Option<String>,
    pub has_next: bool,
}

/// Records collected by one run, in page-arrival then in-page order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collected {
    pub records: Vec<CommentRecord>,
    pub pages: usize,
    pub stop: StopReason,
}

enum PagerState {
    Fetching(PageState),
    Done(StopReason),
}

/// Result of reading one page.
enum PageStep {
    Next(String),
    Stop(StopReason),
}

pub struct CommentPager<'o, E> {
    executor: E,
    opts: ScrapeOptions,
    observer: Box<dyn ProgressObserver + 'o>,
}

impl<'o, E: QueryExecutor> CommentPager<'o, E> {
    pub fn new(executor: E, opts: &ScrapeOptions) -> Self {
        Self { executor, opts: opts.clone(), observer: Box::new(NoProgress) }
    }

    pub fn observer(mut self, observer: impl ProgressObserver + 'o) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn boxed_observer(mut self, observer: Box<dyn ProgressObserver + 'o>) -> Self {
        self.observer = observer;
        self
    }

    /// Drive the loop to DONE.
    pub fn collect(mut self) -> ScrapeResult<Collected> {
        let mut records: Vec<CommentRecord> = Vec::new();
        let mut pages = 0usize;
        let mut state = PagerState::Fetching(PageState { cursor: None, has_next: true });

        let stop = loop {
            let page = match state {
                PagerState::Done(reason) => break reason,
                PagerState::Fetching(page) => page,
            };

            let vars = QueryVariables {
                shortcode: self.opts.shortcode.clone(),
                first: self.opts.page_size.max(1),
                after: page.cursor,
            };
            let body = match self.executor.fetch_page(&vars) {
                Ok(v) => v,
                Err(e) => {
                    self.observer.on_finish(records.len());
                    return Err(e);
                }
            };
            pages += 1;

            let before = records.len();
            let step = ingest_page(&body, &self.opts, &mut records);
            tracing::debug!(page = pages, kept = records.len() - before, total = records.len(), "page read");

            state = match step {
                PageStep::Next(cursor) => PagerState::Fetching(PageState { cursor: Some(cursor), has_next: true }),
                PageStep::Stop(reason) => PagerState::Done(reason),
            };
            self.observer.on_page(records.len(), pages, matches!(state, PagerState::Done(_)));
        };

        match &stop {
            StopReason::MissingContainer => tracing::warn!(
                shortcode = %self.opts.shortcode,
                "'shortcode_media' missing (invalid URL, private content or expired session)"
            ),
            StopReason::Structural(msg) => tracing::warn!(shortcode = %self.opts.shortcode, "error parsing comment data: {msg}"),
            _ => {}
        }
        tracing::info!(pages, records = records.len(), stop = %stop, "comment fetch finished");
        self.observer.on_finish(records.len());

        Ok(Collected { records, pages, stop })
    }
}

/// Read one page body into `records`, applying min-likes then the cap.
fn ingest_page(body: &Value, opts: &ScrapeOptions, records: &mut Vec<CommentRecord>) -> PageStep {
    let media = match body.get("data").and_then(|d| d.get("shortcode_media")) {
        Some(m) if !m.is_null() => m,
        _ => return PageStep::Stop(StopReason::MissingContainer),
    };

    let Some(conn) = media.get("edge_media_to_parent_comment").filter(|c| c.is_object()) else {
        return PageStep::Stop(StopReason::Structural("'edge_media_to_parent_comment' missing".into()));
    };

    let edges: &[Value] = match conn.get("edges") {
        None | Some(Value::Null) => &[],
        Some(Value::Array(list)) => list,
        Some(_) => return PageStep::Stop(StopReason::Structural("'edges' is not an array".into())),
    };

    for edge in edges {
        let node = edge.get("node").unwrap_or(&NULL_NODE);
        let rec = extract_comment(node, opts.include_replies);
        if passes_min_likes(&rec, opts.min_likes) {
            records.push(rec);
        }
        if cap_reached(records.len(), opts.max_comments) {
            return PageStep::Stop(StopReason::CountCap);
        }
    }

    let page_info = conn.get("page_info");
    let has_next = page_info
        .and_then(|p| p.get("has_next_page"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !has_next {
        return PageStep::Stop(StopReason::Exhausted);
    }

    // A next page without a cursor would re-request the first page forever.
    match page_info
        .and_then(|p| p.get("end_cursor"))
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
    {
        Some(cursor) => PageStep::Next(cursor.to_string()),
        None => PageStep::Stop(StopReason::Structural("'has_next_page' set without 'end_cursor'".into())),
    }
}
