use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for one range's scan.
///
/// One instance per range, dropped when the range's pool drains. Every
/// mutation goes through an atomic so completions can never be lost.
#[derive(Debug)]
pub struct ProgressState {
    total: u64,
    completed: AtomicU64,
    matched: AtomicU64,
}

/// A consistent view of [`ProgressState`] taken right after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub total: u64,
    pub completed: u64,
    pub matched: u64,
}

impl ProgressState {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            completed: AtomicU64::new(0),
            matched: AtomicU64::new(0),
        }
    }

    /// Counts one finished probe and returns the counters after the update.
    pub fn record(&self, matched: bool) -> ProgressSnapshot {
        let matched = if matched {
            self.matched.fetch_add(1, Ordering::AcqRel) + 1
        } else {
            self.matched.load(Ordering::Acquire)
        };
        let completed = self.completed.fetch_add(1, Ordering::AcqRel) + 1;

        ProgressSnapshot {
            total: self.total,
            completed,
            matched,
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            total: self.total,
            completed: self.completed.load(Ordering::Acquire),
            matched: self.matched.load(Ordering::Acquire),
        }
    }
}

impl ProgressSnapshot {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn record_counts_completions_and_matches() {
        let state = ProgressState::new(3);
        assert_eq!(state.record(false).completed, 1);
        let snap = state.record(true);
        assert_eq!((snap.completed, snap.matched), (2, 1));
        let snap = state.record(false);
        assert!(snap.is_complete());
        assert_eq!(snap.matched, 1);
        assert_eq!(state.snapshot(), snap);
    }

    #[test]
    fn percentage_of_empty_range_is_complete() {
        let snap = ProgressState::new(0).snapshot();
        assert_eq!(snap.percentage(), 100.0);
    }

    #[test]
    fn concurrent_records_are_not_lost() {
        let state = Arc::new(ProgressState::new(8_000));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let state = Arc::clone(&state);
                std::thread::spawn(move || {
                    for n in 0..1_000 {
                        state.record((n + i) % 4 == 0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snap = state.snapshot();
        assert_eq!(snap.completed, 8_000);
        assert_eq!(snap.matched, 2_000);
    }
}
