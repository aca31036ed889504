use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing corpus activity since startup.
#[derive(Default)]
pub struct CorpusMetrics {
    corpora_assembled: AtomicU64,
    items_assembled: AtomicU64,
    searches_served: AtomicU64,
    documents_prepared: AtomicU64,
    chunks_produced: AtomicU64,
}

impl CorpusMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed corpus assembly and the number of items it produced.
    pub fn record_assembly(&self, item_count: u64) {
        self.corpora_assembled.fetch_add(1, Ordering::Relaxed);
        self.items_assembled.fetch_add(item_count, Ordering::Relaxed);
    }

    /// Record a served search request.
    pub fn record_search(&self) {
        self.searches_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a prepared document and the number of chunks produced for it.
    pub fn record_preparation(&self, chunk_count: u64) {
        self.documents_prepared.fetch_add(1, Ordering::Relaxed);
        self.chunks_produced.fetch_add(chunk_count, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            corpora_assembled: self.corpora_assembled.load(Ordering::Relaxed),
            items_assembled: self.items_assembled.load(Ordering::Relaxed),
            searches_served: self.searches_served.load(Ordering::Relaxed),
            documents_prepared: self.documents_prepared.load(Ordering::Relaxed),
            chunks_produced: self.chunks_produced.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of corpus counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Number of corpus assemblies performed.
    pub corpora_assembled: u64,
    /// Total items produced across all assemblies.
    pub items_assembled: u64,
    /// Number of search requests answered.
    pub searches_served: u64,
    /// Number of documents chunked and measured.
    pub documents_prepared: u64,
    /// Total chunks produced across all prepared documents.
    pub chunks_produced: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_assemblies_and_searches() {
        let metrics = CorpusMetrics::new();
        metrics.record_assembly(2);
        metrics.record_assembly(3);
        metrics.record_search();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.corpora_assembled, 2);
        assert_eq!(snapshot.items_assembled, 5);
        assert_eq!(snapshot.searches_served, 1);
    }

    #[test]
    fn records_preparations() {
        let metrics = CorpusMetrics::new();
        metrics.record_preparation(4);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_prepared, 1);
        assert_eq!(snapshot.chunks_produced, 4);
        assert_eq!(snapshot.corpora_assembled, 0);
    }
}
