//! Score ledger
//!
//! Tracks the running score and the best score across sessions. The best
//! score is loaded once at run start and written exactly once, at game over.

use crate::persistence::KvStore;

/// Storage key for the persisted best score
pub const HIGH_SCORE_KEY: &str = "high_score";

/// Current and best score for a run
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreLedger {
    score: u32,
    best: u32,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current run score
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Best score seen, including the persisted one
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Add points to the running score; the best score follows it upward
    pub fn add_score(&mut self, points: u32) {
        self.score += points;
        if self.score > self.best {
            self.best = self.score;
        }
    }

    /// Reset the run score and pull the stored best (absent reads as 0)
    pub fn load(&mut self, store: &dyn KvStore) {
        self.score = 0;
        self.best = store.get_int(HIGH_SCORE_KEY, 0).max(0) as u32;
        log::info!("high score loaded: {}", self.best);
    }

    /// Persist the best score and flush. Write failure is best-effort only.
    pub fn save(&self, store: &mut dyn KvStore) {
        log::info!("high score save: {}", self.best);
        store.set_int(HIGH_SCORE_KEY, self.best.min(i32::MAX as u32) as i32);
        if let Err(err) = store.flush() {
            log::warn!("high score save failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn test_best_follows_score() {
        let mut ledger = ScoreLedger::new();
        ledger.add_score(10);
        ledger.add_score(100);
        assert_eq!(ledger.score(), 110);
        assert_eq!(ledger.best(), 110);
    }

    #[test]
    fn test_load_resets_score_and_keeps_stored_best() {
        let mut store = MemoryStore::new();
        store.set_int(HIGH_SCORE_KEY, 500);

        let mut ledger = ScoreLedger::new();
        ledger.add_score(120);
        ledger.load(&store);
        assert_eq!(ledger.score(), 0);
        assert_eq!(ledger.best(), 500);
    }

    #[test]
    fn test_load_missing_defaults_to_zero() {
        let store = MemoryStore::new();
        let mut ledger = ScoreLedger::new();
        ledger.load(&store);
        assert_eq!(ledger.best(), 0);
    }

    #[test]
    fn test_save_writes_best_and_flushes() {
        let mut store = MemoryStore::new();
        let mut ledger = ScoreLedger::new();
        ledger.add_score(220);
        ledger.save(&mut store);
        assert_eq!(store.get_int(HIGH_SCORE_KEY, 0), 220);
        assert_eq!(store.flush_count(), 1);
    }

    proptest! {
        /// Score is the total sum; best is the maximum prefix sum. With only
        /// non-negative additions the two coincide at every step.
        #[test]
        fn prop_score_is_sum_and_best_is_max_prefix(points in prop::collection::vec(0u32..1000, 0..64)) {
            let mut ledger = ScoreLedger::new();
            let mut sum = 0u32;
            let mut max_prefix = 0u32;
            for &p in &points {
                ledger.add_score(p);
                sum += p;
                max_prefix = max_prefix.max(sum);
                prop_assert_eq!(ledger.score(), sum);
                prop_assert_eq!(ledger.best(), max_prefix);
            }
        }

        /// The best score never decreases, whatever the stored starting point.
        #[test]
        fn prop_best_monotonic(start in 0i32..10000, points in prop::collection::vec(0u32..1000, 0..32)) {
            let mut store = MemoryStore::new();
            store.set_int(HIGH_SCORE_KEY, start);
            let mut ledger = ScoreLedger::new();
            ledger.load(&store);
            let mut prev_best = ledger.best();
            for &p in &points {
                ledger.add_score(p);
                prop_assert!(ledger.best() >= prev_best);
                prev_best = ledger.best();
            }
        }
    }
}
