use super::{GamePhase, PlayRecord, Prize, Symbol};

/// Events a game engine publishes for the presentation layer. Each engine
/// emits the subset relevant to its game type.
#[derive(Debug, Clone)]
pub enum GameSessionEvent {
    PhaseChanged(GamePhase),
    ScoreChanged(u32),
    BestScoreChanged(u32),
    /// Seconds remaining on the reflex countdown.
    CountdownTick(u32),
    /// Playback highlight during `Showing`; `None` turns the highlight off.
    SequenceStep(Option<Symbol>),
    LevelChanged(u8),
    BoxRevealed {
        index: usize,
        prize: Prize,
    },
    /// A fresh set of boxes is up; carries the 1-based round about to play.
    RoundStarted(u8),
    Finished(PlayRecord),
}
