//! Per-decision candidate scoring records.

use duelmind_core::Action;
use duelmind_strategy::CreativeCandidate;

/// One legal action with its component scores for the current decision.
///
/// Candidates exist only inside a single `make_decision` call; they are
/// never persisted.
#[derive(Debug, Clone, Copy)]
pub struct ActionCandidate {
    pub action: Action,
    /// Decision-network score for the action's kind.
    pub neural_score: f32,
    /// Policy-network score for the action's kind.
    pub policy_score: f32,
    /// Matched creative candidate's novelty × 0.3, or 0.
    pub creativity_bonus: f32,
    /// Combined score after composition and empathy adjustments.
    pub total_score: f32,
    /// The creative annotation the action matched, if any.
    pub creative: Option<CreativeCandidate>,
    /// Whether the empathy stage halved this candidate on purpose.
    pub deliberate_mistake: bool,
}

impl ActionCandidate {
    #[must_use]
    pub fn is_creative(&self) -> bool {
        self.creative.is_some()
    }

    /// Novelty of the matched creative annotation, 0 without one.
    #[must_use]
    pub fn novelty(&self) -> f32 {
        self.creative.map_or(0.0, |candidate| candidate.novelty)
    }
}
