use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters for one monitoring session.
#[derive(Debug, Default)]
pub struct MonitorCounters {
    frames_seen: AtomicU64,
    frames_sampled: AtomicU64,
    faces_submitted: AtomicU64,
    samples_observed: AtomicU64,
    samples_dropped: AtomicU64,
    windows_evaluated: AtomicU64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStats {
    pub frames_seen: u64,
    pub frames_sampled: u64,
    pub faces_submitted: u64,
    pub samples_observed: u64,
    pub samples_dropped: u64,
    pub windows_evaluated: u64,
}

impl MonitorStats {
    /// Classifier calls that have not resolved yet.
    pub fn in_flight(&self) -> u64 {
        self.faces_submitted
            .saturating_sub(self.samples_observed + self.samples_dropped)
    }
}

impl MonitorCounters {
    pub fn record_frame(&self) {
        self.frames_seen.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sampled(&self) {
        self.frames_sampled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_submitted(&self) {
        self.faces_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_observed(&self) {
        self.samples_observed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.samples_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_window(&self) {
        self.windows_evaluated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MonitorStats {
        MonitorStats {
            frames_seen: self.frames_seen.load(Ordering::Relaxed),
            frames_sampled: self.frames_sampled.load(Ordering::Relaxed),
            faces_submitted: self.faces_submitted.load(Ordering::Relaxed),
            samples_observed: self.samples_observed.load(Ordering::Relaxed),
            samples_dropped: self.samples_dropped.load(Ordering::Relaxed),
            windows_evaluated: self.windows_evaluated.load(Ordering::Relaxed),
        }
    }
}
