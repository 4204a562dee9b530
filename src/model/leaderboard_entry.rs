/// Derived ranking row; recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user: String,
    pub score: u32,
}
