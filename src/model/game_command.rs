/// Action triggers the presentation layer sends to a game engine. Commands
/// that do not apply to the receiving engine or its current phase are
/// silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    Start,
    Tap,
    Select(usize),
    FinishEarly,
    Reset,
}
