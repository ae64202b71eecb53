use serde::{Deserialize, Serialize};

/// Five-dimension estimate of the opponent's affect.
///
/// Every dimension lives in `[0.0, 1.0]`; [`EmotionalState::clamp_all`]
/// restores the invariant after each update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionalState {
    pub frustration: f32,
    pub confidence: f32,
    pub engagement: f32,
    pub stress: f32,
    pub satisfaction: f32,
}

impl Default for EmotionalState {
    fn default() -> Self {
        Self {
            frustration: 0.0,
            confidence: 0.5,
            engagement: 0.5,
            stress: 0.0,
            satisfaction: 0.5,
        }
    }
}

/// Play-style adjustment derived from the opponent's emotional state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum PlayStyle {
    #[display("less_aggressive")]
    LessAggressive,
    #[display("more_creative")]
    MoreCreative,
    #[display("more_surprising")]
    MoreSurprising,
    #[display("balanced")]
    Balanced,
}

/// Response policy derived from the current emotional state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmpatheticResponse {
    /// Mood shift applied to the engine's own presentation.
    pub mood_adjustment: f32,
    pub style: PlayStyle,
    /// Whether the engine should surface an encouraging remark.
    pub encouragement: bool,
    /// Probability of a deliberately weakened move per decision.
    pub mistake_rate: f32,
}

impl EmotionalState {
    /// Clamps every dimension back into `[0.0, 1.0]`.
    pub fn clamp_all(&mut self) {
        self.frustration = self.frustration.clamp(0.0, 1.0);
        self.confidence = self.confidence.clamp(0.0, 1.0);
        self.engagement = self.engagement.clamp(0.0, 1.0);
        self.stress = self.stress.clamp(0.0, 1.0);
        self.satisfaction = self.satisfaction.clamp(0.0, 1.0);
    }

    /// Derives the response policy from the current state.
    ///
    /// Threshold rules, checked in order:
    ///
    /// - frustration > 0.7 or stress > 0.8: back off and let the
    ///   opponent breathe (mistake rate 0.15)
    /// - confidence > 0.8 and engagement > 0.7: the opponent can take a
    ///   real challenge (mistake rate 0.03)
    /// - engagement < 0.3: shake things up (mistake rate 0.12)
    /// - otherwise: balanced play (mistake rate 0.08)
    #[must_use]
    pub fn empathetic_response(&self) -> EmpatheticResponse {
        if self.frustration > 0.7 || self.stress > 0.8 {
            return EmpatheticResponse {
                mood_adjustment: -0.2,
                style: PlayStyle::LessAggressive,
                encouragement: true,
                mistake_rate: 0.15,
            };
        }

        if self.confidence > 0.8 && self.engagement > 0.7 {
            return EmpatheticResponse {
                mood_adjustment: 0.1,
                style: PlayStyle::MoreCreative,
                encouragement: false,
                mistake_rate: 0.03,
            };
        }

        if self.engagement < 0.3 {
            return EmpatheticResponse {
                mood_adjustment: 0.0,
                style: PlayStyle::MoreSurprising,
                encouragement: true,
                mistake_rate: 0.12,
            };
        }

        EmpatheticResponse {
            mood_adjustment: 0.0,
            style: PlayStyle::Balanced,
            encouragement: false,
            mistake_rate: 0.08,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_frustration_backs_off() {
        let state = EmotionalState {
            frustration: 0.9,
            ..EmotionalState::default()
        };
        let response = state.empathetic_response();
        assert_eq!(response.style, PlayStyle::LessAggressive);
        assert_eq!(response.mistake_rate, 0.15);
        assert!(response.encouragement);
    }

    #[test]
    fn test_confident_engaged_opponent_gets_challenge() {
        let state = EmotionalState {
            confidence: 0.9,
            engagement: 0.8,
            ..EmotionalState::default()
        };
        let response = state.empathetic_response();
        assert_eq!(response.style, PlayStyle::MoreCreative);
        assert_eq!(response.mistake_rate, 0.03);
    }

    #[test]
    fn test_disengaged_opponent_gets_surprises() {
        let state = EmotionalState {
            engagement: 0.2,
            ..EmotionalState::default()
        };
        let response = state.empathetic_response();
        assert_eq!(response.style, PlayStyle::MoreSurprising);
        assert_eq!(response.mistake_rate, 0.12);
    }

    #[test]
    fn test_neutral_state_is_balanced() {
        let response = EmotionalState::default().empathetic_response();
        assert_eq!(response.style, PlayStyle::Balanced);
        assert_eq!(response.mistake_rate, 0.08);
    }

    #[test]
    fn test_clamp_restores_range() {
        let mut state = EmotionalState {
            frustration: 1.4,
            confidence: -0.3,
            engagement: 0.5,
            stress: 2.0,
            satisfaction: -1.0,
        };
        state.clamp_all();
        for value in [
            state.frustration,
            state.confidence,
            state.engagement,
            state.stress,
            state.satisfaction,
        ] {
            assert!((0.0..=1.0).contains(&value));
        }
    }
}
