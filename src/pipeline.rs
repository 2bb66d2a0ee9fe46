use crate::config::{DataShape, FileFormat, ScrapeOptions};
use crate::dedupe::{dedupe_by_id, username_projection};
use crate::error::{ScrapeError, ScrapeResult};
use crate::media::MediaRef;
use crate::output::{write_output, OutputOptions, Payload};
use crate::pager::{Collected, CommentPager, StopReason};
use crate::progress::{make_observer, ProgressObserver};
use crate::query::QueryExecutor;
use crate::record::CommentRecord;
use crate::util::init_tracing_once;
use std::path::{Path, PathBuf};

/// Builder over `ScrapeOptions`: fetch → filter/dedupe → write.
#[derive(Clone, Debug, Default)]
pub struct InstaComments {
    pub(crate) opts: ScrapeOptions,
}

/// Data after the dedupe/projection stage, ready for the writer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prepared {
    Records(Vec<CommentRecord>),
    Usernames(Vec<String>),
}

impl Prepared {
    /// Detailed: dedupe by id when enabled. Usernames: unique or raw projection,
    /// always sorted case-insensitively.
    pub fn from_records(records: Vec<CommentRecord>, shape: DataShape, dedupe: bool) -> Self {
        match shape {
            DataShape::Detailed if dedupe => Prepared::Records(dedupe_by_id(records)),
            DataShape::Detailed => Prepared::Records(records),
            DataShape::Usernames => Prepared::Usernames(username_projection(&records, dedupe)),
        }
    }

    pub fn payload(&self) -> Payload<'_> {
        match self {
            Prepared::Records(r) => Payload::Records(r),
            Prepared::Usernames(u) => Payload::Usernames(u),
        }
    }

    pub fn len(&self) -> usize {
        self.payload().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of a full run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub path: PathBuf,
    pub written: usize,
    pub fetched: usize,
    pub pages: usize,
    pub stop: StopReason,
}

impl InstaComments {
    pub fn new() -> Self {
        Self { opts: ScrapeOptions::default() }
    }

    pub fn from_options(opts: ScrapeOptions) -> Self {
        Self { opts }
    }

    // -------- Builder methods --------
    pub fn shortcode(mut self, s: impl AsRef<str>) -> Self { self.opts = self.opts.with_shortcode(s); self }
    pub fn media(self, media: &MediaRef) -> Self { self.shortcode(&media.shortcode) }
    pub fn page_size(mut self, n: u32) -> Self { self.opts = self.opts.with_page_size(n); self }
    pub fn max_comments(mut self, max: Option<usize>) -> Self { self.opts = self.opts.with_max_comments(max); self }
    pub fn min_likes(mut self, n: u64) -> Self { self.opts = self.opts.with_min_likes(n); self }
    pub fn include_replies(mut self, yes: bool) -> Self { self.opts = self.opts.with_include_replies(yes); self }
    pub fn dedupe(mut self, yes: bool) -> Self { self.opts = self.opts.with_dedupe(yes); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn timestamps_human_readable(mut self, yes: bool) -> Self { self.opts = self.opts.with_human_timestamps(yes); self }

    pub fn options(&self) -> &ScrapeOptions {
        &self.opts
    }

    fn ensure_shortcode(&self) -> ScrapeResult<()> {
        if self.opts.shortcode.is_empty() {
            return Err(ScrapeError::InvalidConfig("shortcode is required".into()));
        }
        Ok(())
    }

    // -------- Operations --------

    /// Page through all parent comments, with a spinner when `progress` is on.
    pub fn fetch<E: QueryExecutor>(&self, executor: E) -> ScrapeResult<Collected> {
        self.ensure_shortcode()?;
        init_tracing_once();
        let observer = make_observer(self.opts.progress, self.opts.progress_label.as_deref());
        CommentPager::new(executor, &self.opts).boxed_observer(observer).collect()
    }

    /// Like `fetch`, reporting to a caller-supplied observer.
    pub fn fetch_with_observer<E: QueryExecutor>(&self, executor: E, observer: impl ProgressObserver) -> ScrapeResult<Collected> {
        self.ensure_shortcode()?;
        init_tracing_once();
        CommentPager::new(executor, &self.opts).observer(observer).collect()
    }

    /// Dedupe/projection stage for the chosen shape.
    pub fn prepare(&self, records: Vec<CommentRecord>, shape: DataShape) -> Prepared {
        Prepared::from_records(records, shape, self.opts.dedupe)
    }

    /// Write prepared data to `out_path`.
    pub fn write(&self, prepared: &Prepared, out_path: &Path, format: FileFormat) -> ScrapeResult<usize> {
        let opts = OutputOptions { human_timestamps: self.opts.human_timestamps };
        write_output(out_path, format, prepared.payload(), opts)
    }

    /// Fetch, prepare, write.
    pub fn run<E: QueryExecutor>(&self, executor: E, shape: DataShape, format: FileFormat, out_path: &Path) -> ScrapeResult<RunSummary> {
        let collected = self.fetch(executor)?;
        self.finish(collected, shape, format, out_path)
    }

    fn finish(&self, collected: Collected, shape: DataShape, format: FileFormat, out_path: &Path) -> ScrapeResult<RunSummary> {
        let Collected { records, pages, stop } = collected;
        let fetched = records.len();
        if !stop.is_complete() {
            tracing::warn!(%stop, fetched, "writing partial results");
        }
        let prepared = self.prepare(records, shape);
        let written = self.write(&prepared, out_path, format)?;
        tracing::info!(path = %out_path.display(), written, fetched, "saved");
        Ok(RunSummary { path: out_path.to_path_buf(), written, fetched, pages, stop })
    }

    /// `run` with a caller-supplied observer.
    pub fn run_with_observer<E: QueryExecutor>(
        &self,
        executor: E,
        observer: impl ProgressObserver,
        shape: DataShape,
        format: FileFormat,
        out_path: &Path,
    ) -> ScrapeResult<RunSummary> {
        let collected = self.fetch_with_observer(executor, observer)?;
        self.finish(collected, shape, format, out_path)
    }
}
