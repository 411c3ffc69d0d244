//! Best score tracking
//!
//! A single best score, persisted in the key-value store.

use serde::{Deserialize, Serialize};

use crate::persistence::{HIGH_SCORE_KEY, KeyValueStore, StoreError, load_json, save_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScore {
    pub best: u64,
    /// Level reached on the best run
    pub level: u32,
}

impl HighScore {
    /// Check if a score beats the current best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a score. Returns true if it became the new best.
    pub fn submit(&mut self, score: u64, level: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        self.level = level;
        true
    }

    pub fn load(store: &impl KeyValueStore) -> Self {
        match load_json::<HighScore>(store, HIGH_SCORE_KEY) {
            Ok(Some(score)) => {
                log::info!("Loaded high score {}", score.best);
                score
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring stored high score: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StoreError> {
        save_json(store, HIGH_SCORE_KEY, self)?;
        log::info!("High score saved ({})", self.best);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_submit_only_improves() {
        let mut hs = HighScore::default();
        assert!(!hs.submit(0, 1));
        assert!(hs.submit(30, 2));
        assert!(!hs.submit(30, 5));
        assert!(!hs.submit(12, 5));
        assert_eq!(hs, HighScore { best: 30, level: 2 });
    }

    #[test]
    fn test_round_trip_through_store() {
        let mut store = MemoryStore::new();
        assert_eq!(HighScore::load(&store), HighScore::default());
        let hs = HighScore { best: 1234, level: 7 };
        hs.save(&mut store).unwrap();
        assert_eq!(HighScore::load(&store), hs);
    }
}
