#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rarity {
    Legendary,
    Epic,
    Rare,
    Uncommon,
    Common,
}

/// One entry in the fixed mystery-reward prize table. Never persisted; a
/// play's record only keeps the accumulated points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prize {
    pub emoji: &'static str,
    pub name: &'static str,
    pub points: u32,
    pub rarity: Rarity,
}

pub const PRIZE_TABLE: [Prize; 10] = [
    Prize {
        emoji: "💎",
        name: "Diamond",
        points: 100,
        rarity: Rarity::Legendary,
    },
    Prize {
        emoji: "👑",
        name: "Crown",
        points: 80,
        rarity: Rarity::Epic,
    },
    Prize {
        emoji: "🎯",
        name: "Target",
        points: 60,
        rarity: Rarity::Rare,
    },
    Prize {
        emoji: "⭐",
        name: "Star",
        points: 40,
        rarity: Rarity::Uncommon,
    },
    Prize {
        emoji: "🎪",
        name: "Circus",
        points: 30,
        rarity: Rarity::Common,
    },
    Prize {
        emoji: "🎨",
        name: "Art",
        points: 25,
        rarity: Rarity::Common,
    },
    Prize {
        emoji: "🎭",
        name: "Drama",
        points: 20,
        rarity: Rarity::Common,
    },
    Prize {
        emoji: "🎪",
        name: "Fun",
        points: 15,
        rarity: Rarity::Common,
    },
    Prize {
        emoji: "🎈",
        name: "Balloon",
        points: 10,
        rarity: Rarity::Common,
    },
    Prize {
        emoji: "🍀",
        name: "Luck",
        points: 5,
        rarity: Rarity::Common,
    },
];
