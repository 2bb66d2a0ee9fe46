//! Progress reporting: the observer the page loop notifies, plus an indicatif spinner.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Notified by the page loop after every page and once on termination.
/// Every method defaults to a no-op.
pub trait ProgressObserver {
    fn on_page(&mut self, _collected: usize, _pages: usize, _done: bool) {}
    fn on_finish(&mut self, _collected: usize) {}
}

/// Observer that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

impl<T: ProgressObserver + ?Sized> ProgressObserver for &mut T {
    fn on_page(&mut self, collected: usize, pages: usize, done: bool) {
        (**self).on_page(collected, pages, done)
    }
    fn on_finish(&mut self, collected: usize) {
        (**self).on_finish(collected)
    }
}

/// Count-style spinner (total unknown up front), with an optional label.
pub struct BarProgress {
    pb: ProgressBar,
}

impl BarProgress {
    pub fn new(label: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} {msg} {pos} comments  pages: {prefix}  elapsed: {elapsed_precise}",
        ) {
            pb.set_style(style);
        }
        if !label.is_empty() {
            pb.set_message(label.to_string());
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }
}

impl ProgressObserver for BarProgress {
    fn on_page(&mut self, collected: usize, pages: usize, _done: bool) {
        self.pb.set_position(collected as u64);
        self.pb.set_prefix(pages.to_string());
    }
    fn on_finish(&mut self, collected: usize) {
        self.pb.set_position(collected as u64);
        self.pb.finish_with_message("done");
    }
}

/// Spinner when `enabled`, otherwise the no-op observer.
pub fn make_observer(enabled: bool, label: Option<&str>) -> Box<dyn ProgressObserver> {
    if enabled {
        Box::new(BarProgress::new(label.unwrap_or("Fetching comments")))
    } else {
        Box::new(NoProgress)
    }
}
