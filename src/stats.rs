use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared sink for operator-level counters, handed through compilation into
/// the operators that report. One instance per execution context.
#[derive(Debug, Default)]
pub struct OperatorStats {
    hash_builds: AtomicUsize,
    hash_build_rows: AtomicUsize,
}

impl OperatorStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hash_build(&self, indexed_rows: usize) {
        self.hash_builds.fetch_add(1, Ordering::Relaxed);
        self.hash_build_rows.fetch_add(indexed_rows, Ordering::Relaxed);
    }

    /// How many join hash tables were materialized.
    pub fn hash_builds(&self) -> usize {
        self.hash_builds.load(Ordering::Relaxed)
    }

    /// How many build-side rows went into those tables.
    pub fn hash_build_rows(&self) -> usize {
        self.hash_build_rows.load(Ordering::Relaxed)
    }
}
