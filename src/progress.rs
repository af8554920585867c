//! Progress-callback trait for per-item conversion events.
//!
//! Inject a [`ProgressCallback`] via [`crate::config::PackConfigBuilder::progress_callback`]
//! or [`crate::config::RasterConfigBuilder::progress_callback`] to receive
//! events as a pipeline works through its images or pages.
//!
//! Items are always processed one at a time, in order, so events for item
//! `n` arrive strictly before events for item `n + 1`.
//!
//! # Example
//!
//! ```rust
//! use imgpdf::{ConversionProgressCallback, RasterConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_item_complete(&self, item: usize, total: usize, bytes: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} done ({} bytes)", item, total, bytes);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { completed: AtomicUsize::new(0) });
//!
//! let config = RasterConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the pipelines as they process each image or page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `Send + Sync` because the pipelines run on a
/// blocking worker thread.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before the first item, after input validation.
    fn on_start(&self, total: usize) {
        let _ = total;
    }

    /// Called before an item is processed.
    ///
    /// # Arguments
    /// * `item`: 1-indexed position in processing order (for rasterisation,
    ///   the page number)
    /// * `total`: number of images when assembling; when rasterising, the
    ///   page count of the whole document, which can exceed the `total`
    ///   passed to [`on_start`](Self::on_start) (the size of the selection)
    fn on_item_start(&self, item: usize, total: usize) {
        let _ = (item, total);
    }

    /// Called after an item was added to the output.
    ///
    /// `bytes` is the encoded size for rasterised pages and the source image
    /// size for assembled pages.
    fn on_item_complete(&self, item: usize, total: usize, bytes: usize) {
        let _ = (item, total, bytes);
    }

    /// Called when processing an item failed; the conversion stops after this.
    fn on_item_error(&self, item: usize, total: usize, error: &str) {
        let _ = (item, total, error);
    }

    /// Called once after the output artifact has been finalised.
    fn on_complete(&self, total: usize) {
        let _ = total;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in the configs.
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        finished_total: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_start(&self, total: usize) {
            self.started_total.store(total, Ordering::SeqCst);
        }

        fn on_item_start(&self, _item: usize, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_item_complete(&self, _item: usize, _total: usize, _bytes: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_item_error(&self, _item: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_complete(&self, total: usize) {
            self.finished_total.store(total, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_start(5);
        cb.on_item_start(1, 5);
        cb.on_item_complete(1, 5, 42);
        cb.on_item_error(2, 5, "some error");
        cb.on_complete(5);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_start(3);
        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 3);

        tracker.on_item_start(1, 3);
        tracker.on_item_complete(1, 3, 100);
        tracker.on_item_start(2, 3);
        tracker.on_item_error(2, 3, "decode failed");

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);

        tracker.on_complete(3);
        assert_eq!(tracker.finished_total.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_start(10);
        cb.on_item_complete(1, 10, 512);
    }
}
