use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::HistoryStore;
use crate::model::{LeaderboardEntry, PlayRecord};

pub const DEFAULT_LIMIT: usize = 10;

/// Screen names mixed into every ranking so the board never looks empty.
const SYNTHETIC_POOL: [&str; 8] = [
    "NeonNinja",
    "PixelPilot",
    "TurboTortoise",
    "LuckyLlama",
    "ComboQueen",
    "ByteBandit",
    "SirTapsalot",
    "MissMemory",
];

const SYNTHETIC_SCORE_MIN: u32 = 20;
const SYNTHETIC_SCORE_MAX: u32 = 120;

/// Derives a ranking from the play log: each real user contributes their best
/// score, padded with freshly rolled synthetic entries. Nothing here is
/// persisted; callers re-rank on whatever cadence they like.
pub struct LeaderboardEngine {
    history: Rc<HistoryStore>,
    rng: RefCell<StdRng>,
}

impl LeaderboardEngine {
    pub fn new(history: Rc<HistoryStore>, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or(rand::rng().next_u64());
        Self {
            history,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut rng = self.rng.borrow_mut();
        let synthetics = SYNTHETIC_POOL.iter().map(|name| LeaderboardEntry {
            user: (*name).to_string(),
            score: rng.random_range(SYNTHETIC_SCORE_MIN..=SYNTHETIC_SCORE_MAX),
        });
        rank_records(&self.history.all(), synthetics, limit)
    }
}

/// Per-user best scores (first-seen order) merged with the given synthetic
/// entries, sorted descending. The sort is stable, so ties keep input order:
/// real users ahead of same-score synthetics.
pub fn rank_records(
    records: &[PlayRecord],
    synthetics: impl IntoIterator<Item = LeaderboardEntry>,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let mut best: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<LeaderboardEntry> = Vec::new();
    for record in records {
        match best.get(record.user_id.as_str()) {
            Some(&slot) => {
                if record.score > entries[slot].score {
                    entries[slot].score = record.score;
                }
            }
            None => {
                best.insert(record.user_id.as_str(), entries.len());
                entries.push(LeaderboardEntry {
                    user: record.user_id.clone(),
                    score: record.score,
                });
            }
        }
    }
    entries.extend(synthetics);
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GameOutcome;
    use crate::storage::MemoryStore;

    fn record(user: &str, score: u32) -> PlayRecord {
        PlayRecord::new(GameOutcome::ReflexCounter, score, user.to_string())
    }

    #[test]
    fn test_best_score_per_user_wins() {
        let log = vec![record("a", 50), record("a", 80), record("b", 60)];
        let ranked = rank_records(&log, [], DEFAULT_LIMIT);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].user, "a");
        assert_eq!(ranked[0].score, 80);
        assert_eq!(ranked[1].user, "b");
        assert_eq!(ranked[1].score, 60);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let log = vec![record("first", 60), record("second", 60)];
        let synthetic = LeaderboardEntry {
            user: "Synth".to_string(),
            score: 60,
        };
        let ranked = rank_records(&log, [synthetic], DEFAULT_LIMIT);

        let users: Vec<_> = ranked.iter().map(|e| e.user.as_str()).collect();
        assert_eq!(users, vec!["first", "second", "Synth"]);
    }

    #[test]
    fn test_limit_truncates() {
        let log: Vec<PlayRecord> = (0..20)
            .map(|i| record(&format!("user{i}"), i))
            .collect();
        let ranked = rank_records(&log, [], 5);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].score, 19);
    }

    #[test]
    fn test_engine_pads_with_synthetics() {
        let history = Rc::new(HistoryStore::new(Rc::new(MemoryStore::new())));
        history.append(&record("real@example.com", 999));
        let engine = LeaderboardEngine::new(history, Some(3));

        let board = engine.top(DEFAULT_LIMIT);
        assert_eq!(board.len(), 9); // 1 real + 8 synthetic
        assert_eq!(board[0].user, "real@example.com");
        for entry in &board[1..] {
            assert!(SYNTHETIC_POOL.contains(&entry.user.as_str()));
            assert!((SYNTHETIC_SCORE_MIN..=SYNTHETIC_SCORE_MAX).contains(&entry.score));
        }
    }

    #[test]
    fn test_synthetic_scores_reroll_each_call() {
        let history = Rc::new(HistoryStore::new(Rc::new(MemoryStore::new())));
        let engine = LeaderboardEngine::new(history, Some(5));

        let first: Vec<u32> = engine.top(DEFAULT_LIMIT).iter().map(|e| e.score).collect();
        let second: Vec<u32> = engine.top(DEFAULT_LIMIT).iter().map(|e| e.score).collect();
        // the rng state advances between calls, so a fresh roll each time
        assert_ne!(first, second);
    }
}
