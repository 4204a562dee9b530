/// Aggregates over (a filtered view of) the history log. All zeros when the
/// filtered set is empty; `best_score` is never negative or missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub count: usize,
    pub total_score: u64,
    pub best_score: u32,
    pub distinct_games_played: usize,
}
