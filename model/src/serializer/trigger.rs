//! Re-entrancy guard for serialize-on-change hooks.
//!
//! A serialization triggered while another one is running is skipped, not
//! queued: the running pass already sees the latest graph.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Runs at most one serialization at a time.
#[derive(Debug, Default)]
pub struct SerializeTrigger {
    in_progress: AtomicBool,
    dropped: AtomicUsize,
}

impl SerializeTrigger {
    /// An idle trigger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` unless a serialization is already in progress, in which
    /// case the request is dropped and `None` is returned.
    pub fn on_model_changed<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce() -> T,
    {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("serialize_skipped");
            return None;
        }
        let _guard = Reset(&self.in_progress);
        Some(f())
    }

    /// Returns true while a serialization runs.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Requests skipped so far.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Clears the flag even if `f` panics.
struct Reset<'a>(&'a AtomicBool);

impl Drop for Reset<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
