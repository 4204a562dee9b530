use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    ReflexCounter,
    SequenceMemory,
    MysteryReward,
}

impl GameId {
    pub fn all() -> [GameId; 3] {
        [
            GameId::ReflexCounter,
            GameId::SequenceMemory,
            GameId::MysteryReward,
        ]
    }

    pub fn slug(&self) -> &'static str {
        match self {
            GameId::ReflexCounter => "reflex-counter",
            GameId::SequenceMemory => "sequence-memory",
            GameId::MysteryReward => "mystery-reward",
        }
    }

    pub fn from_slug(slug: &str) -> Option<GameId> {
        GameId::all().into_iter().find(|game| game.slug() == slug)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GameId::ReflexCounter => "Reflex Counter",
            GameId::SequenceMemory => "Sequence Memory",
            GameId::MysteryReward => "Mystery Reward",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_slug() {
        let encoded = serde_json::to_string(&GameId::ReflexCounter).unwrap();
        assert_eq!(encoded, "\"reflex-counter\"");
    }

    #[test]
    fn test_from_slug_round_trips() {
        for game in GameId::all() {
            assert_eq!(GameId::from_slug(game.slug()), Some(game));
        }
        assert_eq!(GameId::from_slug("bogus"), None);
    }
}
