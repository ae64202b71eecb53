//! Feature encoding: the fixed 50-slot input shared by all three
//! scorer networks.
//!
//! Slot layout:
//!
//! | slots | source                                            |
//! |-------|---------------------------------------------------|
//! | 0-19  | game context and raw board/resource magnitudes    |
//! | 20-29 | emotional state estimate                          |
//! | 30-39 | memory recall summary                             |
//! | 40-49 | personality trait profile                         |
//!
//! Slots without a defined source stay at the 0 sentinel. Every slot is
//! clamped to `[0.0, 1.0]` so downstream layers see a bounded input
//! regardless of how extreme the snapshot is.

use duelmind_core::{GameContext, GamePhase, GameSnapshot, Personality};
use duelmind_emotion::EmotionalState;
use duelmind_memory::RecallResult;

/// Width of the encoded feature vector and of every network input.
pub const FEATURE_WIDTH: usize = 50;

const EMOTION_BASE: usize = 20;
const MEMORY_BASE: usize = 30;
const PERSONALITY_BASE: usize = 40;

/// A fully-encoded network input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f32; FEATURE_WIDTH]);

impl FeatureVector {
    /// Encodes one decision moment into the fixed slot layout.
    pub fn encode(
        context: &GameContext,
        snapshot: &GameSnapshot,
        emotional: &EmotionalState,
        recall: &RecallResult,
        personality: Personality,
    ) -> Self {
        let mut slots = [0.0f32; FEATURE_WIDTH];

        // Game features (0-19).
        slots[0] = context.board_control;
        slots[1] = context.resource_advantage;
        slots[2] = context.threat_level;
        slots[3] = context.opportunity_score;
        #[expect(clippy::cast_precision_loss)]
        let turn = context.turn_count as f32;
        slots[4] = (turn / 20.0).min(1.0);
        slots[5] = (snapshot.resources.player / 10.0).min(1.0);
        slots[6] = (snapshot.player_board_power() / 20.0).min(1.0);
        slots[7] = (snapshot.opponent_board_power() / 20.0).min(1.0);
        #[expect(clippy::cast_precision_loss)]
        let hand = snapshot.player_hand.len() as f32;
        slots[8] = (hand / 10.0).min(1.0);
        slots[9] = f32::from(context.phase == GamePhase::Early);
        slots[10] = f32::from(context.phase == GamePhase::Mid);
        slots[11] = f32::from(context.phase == GamePhase::Late);

        // Emotional features (20-29).
        slots[EMOTION_BASE] = emotional.frustration;
        slots[EMOTION_BASE + 1] = emotional.confidence;
        slots[EMOTION_BASE + 2] = emotional.engagement;
        slots[EMOTION_BASE + 3] = emotional.stress;
        slots[EMOTION_BASE + 4] = emotional.satisfaction;

        // Memory features (30-39).
        slots[MEMORY_BASE] = recall.confidence;
        slots[MEMORY_BASE + 1] = recall.top_recommendation_confidence();

        // Personality features (40-49).
        let traits = personality.traits();
        slots[PERSONALITY_BASE] = traits.adaptation;
        slots[PERSONALITY_BASE + 1] = traits.creativity;
        slots[PERSONALITY_BASE + 2] = traits.empathy;

        for slot in &mut slots {
            *slot = slot.clamp(0.0, 1.0);
        }
        Self(slots)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}
