use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use itertools::Itertools;
use log::info;

use crate::model::{GameId, HistoryStats, PlayRecord};
use crate::storage::keys::{BEST_SCORES_KEY, HISTORY_KEY};
use crate::storage::{read_json, write_json, KeyValueStore};

/// Sort orders the history screen offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySort {
    /// Newest first.
    Date,
    /// Highest first.
    Score,
    GameName,
}

/// The persisted play log and the aggregates derived from it. `append` is the
/// single mutation point; the read-modify-write of the backing key stays
/// inside it.
pub struct HistoryStore {
    store: Rc<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Full log in play order (most recent last). A missing or corrupt log
    /// reads as empty.
    pub fn all(&self) -> Vec<PlayRecord> {
        read_json(self.store.as_ref(), HISTORY_KEY).unwrap_or_default()
    }

    pub fn append(&self, record: &PlayRecord) {
        let mut log = self.all();
        log.push(record.clone());
        write_json(self.store.as_ref(), HISTORY_KEY, &log);
        self.update_best_cache(record);
        info!(
            target: "history",
            "Recorded {} play: score {} by {}",
            record.game_id().slug(),
            record.score,
            record.user_id
        );
    }

    /// Irreversibly empties the log (and the derived best-score cache).
    /// Confirmation is the caller's concern. A no-op on an empty log.
    pub fn clear(&self) {
        self.store.remove(HISTORY_KEY);
        self.store.remove(BEST_SCORES_KEY);
    }

    /// Single-pass aggregates over the log; `None` filter means all games.
    pub fn stats_for(&self, filter: Option<GameId>) -> HistoryStats {
        let mut stats = HistoryStats::default();
        let mut games_seen: HashSet<GameId> = HashSet::new();
        for record in self.all() {
            if let Some(game) = filter {
                if record.game_id() != game {
                    continue;
                }
            }
            stats.count += 1;
            stats.total_score += u64::from(record.score);
            stats.best_score = stats.best_score.max(record.score);
            games_seen.insert(record.game_id());
        }
        stats.distinct_games_played = games_seen.len();
        stats
    }

    pub fn best_score(&self, game: GameId) -> u32 {
        self.stats_for(Some(game)).best_score
    }

    /// Read-fast-path per-game bests, refreshed on every append. The log
    /// itself stays authoritative.
    pub fn cached_best_scores(&self) -> HashMap<GameId, u32> {
        read_json(self.store.as_ref(), BEST_SCORES_KEY).unwrap_or_default()
    }

    fn update_best_cache(&self, record: &PlayRecord) {
        let mut cache = self.cached_best_scores();
        let best = cache.entry(record.game_id()).or_insert(0);
        if record.score > *best {
            *best = record.score;
            write_json(self.store.as_ref(), BEST_SCORES_KEY, &cache);
        }
    }

    /// Presentation ordering helper; does not touch the persisted order.
    pub fn sorted_for_display(records: &[PlayRecord], sort: HistorySort) -> Vec<PlayRecord> {
        match sort {
            HistorySort::Date => records
                .iter()
                .cloned()
                .sorted_by(|a, b| b.played_at.cmp(&a.played_at))
                .collect(),
            HistorySort::Score => records
                .iter()
                .cloned()
                .sorted_by(|a, b| b.score.cmp(&a.score))
                .collect(),
            HistorySort::GameName => records
                .iter()
                .cloned()
                .sorted_by(|a, b| a.game_name.cmp(&b.game_name))
                .collect(),
        }
    }
}
