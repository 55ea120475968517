//! Progress-callback trait for per-table conversion events.
//!
//! Attach an [`Arc<dyn ConversionProgressCallback>`] with
//! [`crate::convert::TableConverter::with_progress`] to receive events as
//! each table is rendered and written.
//!
//! # Example
//!
//! ```rust
//! use mdtable2png::{ConversionProgressCallback, TableConverter};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     written: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_table_complete(&self, n: usize, total: usize, path: &Path, bytes: usize) {
//!         self.written.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Table {n}/{total} → {} ({bytes} bytes)", path.display());
//!     }
//! }
//!
//! let converter: TableConverter = TableConverter::default();
//! let converter = converter.with_progress(Arc::new(CountingCallback { written: AtomicUsize::new(0) }));
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the converter as it processes each table.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after detection, before anything is rendered.
    fn on_conversion_start(&self, total_tables: usize) {
        let _ = total_tables;
    }

    /// Called before table `n` (1-based) is parsed and rendered.
    fn on_table_start(&self, n: usize, total_tables: usize) {
        let _ = (n, total_tables);
    }

    /// Called after table `n` has been written to `path`.
    ///
    /// # Arguments
    /// * `n`            — 1-based table number
    /// * `total_tables` — tables in the document
    /// * `path`         — destination of the image
    /// * `bytes`        — encoded image size
    fn on_table_complete(&self, n: usize, total_tables: usize, path: &Path, bytes: usize) {
        let _ = (n, total_tables, path, bytes);
    }

    /// Called once after every table has been written.
    fn on_conversion_complete(&self, total_tables: usize) {
        let _ = total_tables;
    }
}

/// A no-op implementation for callers that need a callback value but no events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Shared callback handle held by [`crate::convert::TableConverter`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        started_total: AtomicUsize,
        written: Mutex<Vec<(usize, String)>>,
        completed_total: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_conversion_start(&self, total_tables: usize) {
            self.started_total.store(total_tables, Ordering::SeqCst);
        }

        fn on_table_start(&self, _n: usize, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_table_complete(&self, n: usize, _total: usize, path: &Path, _bytes: usize) {
            self.written
                .lock()
                .unwrap()
                .push((n, path.display().to_string()));
        }

        fn on_conversion_complete(&self, total_tables: usize) {
            self.completed_total.store(total_tables, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(2);
        cb.on_table_start(1, 2);
        cb.on_table_complete(1, 2, Path::new("t.png"), 42);
        cb.on_conversion_complete(2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_conversion_start(2);
        tracker.on_table_start(1, 2);
        tracker.on_table_start(2, 2);
        tracker.on_table_complete(1, 2, Path::new("a.png"), 100);
        tracker.on_table_complete(2, 2, Path::new("b.png"), 200);
        tracker.on_conversion_complete(2);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(
            *tracker.written.lock().unwrap(),
            vec![(1, "a.png".to_string()), (2, "b.png".to_string())]
        );
        assert_eq!(tracker.completed_total.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_conversion_start(1);
        cb.on_table_complete(1, 1, Path::new("t.png"), 512);
    }
}
