mod config;
mod error;
mod media;
mod session;

mod query;
mod record;
mod pager;
mod filters;
mod dedupe;
mod progress;

mod output;
mod pipeline;
mod util;

pub use crate::config::{DataShape, FileFormat, ScrapeOptions};
pub use crate::error::{ErrorClass, ScrapeError, ScrapeResult};
pub use crate::media::{MediaKind, MediaRef};
pub use crate::session::{build_headers, Session};
pub use crate::pipeline::{InstaComments, Prepared, RunSummary};

// Query executor seam and the HTTP implementation.
pub use crate::query::{parse_body, GraphqlClient, QueryExecutor, QueryVariables, PARENT_QUERY_HASH};

// Record model and node mapping.
pub use crate::record::{extract_comment, extract_reply, CommentRecord, ReplyRecord};

// Page loop.
pub use crate::pager::{Collected, CommentPager, PageState, StopReason};

// Filter/dedupe stage.
pub use crate::filters::{cap_reached, passes_min_likes};
pub use crate::dedupe::{dedupe_by_id, sort_usernames, username_projection, usernames_all, usernames_unique};

// Progress observers.
pub use crate::progress::{make_observer, BarProgress, NoProgress, ProgressObserver};

// Output writer.
pub use crate::output::{collapse_newlines, write_output, write_payload, OutputOptions, Payload, DETAILED_CSV_HEADER};

pub use crate::util::init_tracing_once;
