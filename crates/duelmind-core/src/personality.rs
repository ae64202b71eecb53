use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownPersonalityError;

/// Engine personality: a fixed flavor profile chosen at construction.
///
/// Personality affects two things only: the trait profile fed into the
/// feature vector (slots 40-49) and the presentational thinking-time
/// multiplier. It never bypasses the learned scoring.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    #[display("strategist")]
    Strategist,
    #[display("berserker")]
    Berserker,
    #[display("trickster")]
    Trickster,
    #[display("scholar")]
    Scholar,
    #[display("gambler")]
    Gambler,
    #[display("perfectionist")]
    Perfectionist,
    #[display("adaptive")]
    Adaptive,
}

/// Personality trait profile encoded into the feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitProfile {
    /// How quickly the personality shifts with the opponent.
    pub adaptation: f32,
    /// Appetite for unconventional candidates.
    pub creativity: f32,
    /// Weight given to the opponent's modeled emotional state.
    pub empathy: f32,
}

impl Personality {
    pub const ALL: [Self; 7] = [
        Self::Strategist,
        Self::Berserker,
        Self::Trickster,
        Self::Scholar,
        Self::Gambler,
        Self::Perfectionist,
        Self::Adaptive,
    ];

    /// Multiplier applied to the advisory thinking time.
    ///
    /// Deliberate personalities "think" longer; impulsive ones answer
    /// faster. Purely presentational.
    #[must_use]
    pub fn thinking_multiplier(self) -> f32 {
        match self {
            Self::Strategist => 1.5,
            Self::Berserker => 0.6,
            Self::Trickster => 1.2,
            Self::Scholar => 1.3,
            Self::Gambler => 0.8,
            Self::Perfectionist => 2.0,
            Self::Adaptive => 1.0,
        }
    }

    /// Trait profile fed into feature slots 40-49.
    #[must_use]
    pub fn traits(self) -> TraitProfile {
        let (adaptation, creativity, empathy) = match self {
            Self::Strategist => (0.7, 0.5, 0.6),
            Self::Berserker => (0.4, 0.3, 0.2),
            Self::Trickster => (0.8, 0.9, 0.5),
            Self::Scholar => (0.9, 0.6, 0.7),
            Self::Gambler => (0.6, 0.7, 0.4),
            Self::Perfectionist => (0.5, 0.4, 0.6),
            Self::Adaptive => (1.0, 1.0, 1.0),
        };
        TraitProfile {
            adaptation,
            creativity,
            empathy,
        }
    }
}

impl Default for Personality {
    fn default() -> Self {
        Self::Adaptive
    }
}

impl FromStr for Personality {
    type Err = UnknownPersonalityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|personality| personality.to_string() == s)
            .ok_or_else(|| UnknownPersonalityError {
                name: s.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for personality in Personality::ALL {
            let parsed: Personality = personality.to_string().parse().unwrap();
            assert_eq!(parsed, personality);
        }
    }

    #[test]
    fn test_parse_unknown_name_fails() {
        let err = "overthinker".parse::<Personality>().unwrap_err();
        assert_eq!(err.name, "overthinker");
    }

    #[test]
    fn test_traits_stay_in_range() {
        for personality in Personality::ALL {
            let traits = personality.traits();
            for value in [traits.adaptation, traits.creativity, traits.empathy] {
                assert!((0.0..=1.0).contains(&value));
            }
        }
    }
}
