/// Session phases across all three engines; each engine moves through its own
/// subset (e.g. only SequenceMemory ever enters `Showing`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Ready,
    Showing,
    Playing,
    Revealing,
    Finished,
}
