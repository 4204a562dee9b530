/// The sequence-memory alphabet: six distinct symbols the pattern is drawn
/// from and the player clicks back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl Symbol {
    pub const ALL: [Symbol; 6] = [
        Symbol::Red,
        Symbol::Blue,
        Symbol::Green,
        Symbol::Yellow,
        Symbol::Purple,
        Symbol::Orange,
    ];

    pub fn from_index(index: usize) -> Option<Symbol> {
        Symbol::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        Symbol::ALL
            .iter()
            .position(|symbol| symbol == self)
            .unwrap_or(0)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Symbol::Red => "red",
            Symbol::Blue => "blue",
            Symbol::Green => "green",
            Symbol::Yellow => "yellow",
            Symbol::Purple => "purple",
            Symbol::Orange => "orange",
        }
    }
}
