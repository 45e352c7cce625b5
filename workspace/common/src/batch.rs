use serde::{Deserialize, Serialize};

/// Outcome counters of a batch job. A failed item never stops the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub processed: usize,
    /// Items looked at but left unchanged, e.g. goals with nothing to measure.
    #[serde(default)]
    pub skipped: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn record_success(&mut self) {
        self.processed += 1;
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.failed
    }

    /// Adds the counters of another report to this one.
    pub fn merge(&mut self, other: BatchReport) {
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}
