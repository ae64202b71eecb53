//! The three-network scorer and its online training rule.

use duelmind_core::ActionKind;
use rand::Rng;

use crate::{
    feature::{FEATURE_WIDTH, FeatureVector},
    network::FeedForward,
};

/// Output width of the policy network.
pub const POLICY_WIDTH: usize = 20;

/// Forward-pass results for one decision moment.
#[derive(Debug, Clone)]
pub struct ScoreSet {
    /// Per-action-kind scores, indexed by [`ActionKind::index`].
    pub action_scores: Vec<f32>,
    /// Scalar estimate of how good the position is.
    pub value_estimate: f32,
    /// Preference distribution over the wider policy slots.
    pub policy: Vec<f32>,
}

impl ScoreSet {
    /// Decision-network score for one action kind.
    #[must_use]
    pub fn action_score(&self, kind: ActionKind) -> f32 {
        self.action_scores[kind.index()]
    }

    /// Policy-network score for one action kind.
    #[must_use]
    pub fn policy_score(&self, kind: ActionKind) -> f32 {
        self.policy[kind.index()]
    }
}

/// Three independently-sized networks over the shared feature vector.
///
/// | network  | architecture      | estimates                        |
/// |----------|-------------------|----------------------------------|
/// | decision | 50→64→32→16→10    | per-action success probability   |
/// | value    | 50→32→16→1        | overall position value           |
/// | policy   | 50→64→32→20       | action preference distribution   |
#[derive(Debug, Clone)]
pub struct NeuralScorer {
    decision: FeedForward,
    value: FeedForward,
    policy: FeedForward,
}

impl NeuralScorer {
    /// Creates a scorer with freshly initialized networks.
    pub fn new<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            decision: FeedForward::new(FEATURE_WIDTH, &[64, 32, 16], ActionKind::COUNT, 0.001, rng),
            value: FeedForward::new(FEATURE_WIDTH, &[32, 16], 1, 0.0005, rng),
            policy: FeedForward::new(FEATURE_WIDTH, &[64, 32], POLICY_WIDTH, 0.002, rng),
        }
    }

    /// Forwards all three networks on the encoded features.
    #[must_use]
    pub fn score(&self, features: &FeatureVector) -> ScoreSet {
        let input = features.as_slice();
        ScoreSet {
            action_scores: self.decision.forward(input),
            value_estimate: self.value.forward(input)[0],
            policy: self.policy.forward(input),
        }
    }

    /// One online training step from a realized outcome.
    ///
    /// - decision target: near-uniform 0.1 baseline with the taken
    ///   kind's slot boosted to the outcome
    /// - policy target: 0.05 baseline, slot boosted to the outcome,
    ///   renormalized to sum to 1
    /// - value target: the outcome itself
    pub fn train(&mut self, features: &FeatureVector, taken: ActionKind, outcome: f32) {
        let input = features.as_slice();

        let mut decision_target = vec![0.1; self.decision.output_len()];
        decision_target[taken.index()] = outcome;
        let trace = self.decision.forward_trace(input);
        self.decision.update(&trace, &decision_target);

        let trace = self.value.forward_trace(input);
        self.value.update(&trace, &[outcome]);

        let mut policy_target = vec![0.05; self.policy.output_len()];
        policy_target[taken.index()] = outcome;
        let total: f32 = policy_target.iter().sum();
        if total > 0.0 {
            for value in &mut policy_target {
                *value /= total;
            }
        }
        let trace = self.policy.forward_trace(input);
        self.policy.update(&trace, &policy_target);
    }
}

#[cfg(test)]
mod tests {
    use duelmind_core::{GameContext, GameSnapshot, Personality};
    use duelmind_emotion::EmotionalState;
    use duelmind_memory::RecallResult;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn scorer() -> NeuralScorer {
        NeuralScorer::new(&mut Pcg32::from_seed([42; 16]))
    }

    fn features() -> FeatureVector {
        FeatureVector::encode(
            &GameContext::default(),
            &GameSnapshot::default(),
            &EmotionalState::default(),
            &RecallResult::default(),
            Personality::Adaptive,
        )
    }

    #[test]
    fn test_score_shapes() {
        let scores = scorer().score(&features());
        assert_eq!(scores.action_scores.len(), ActionKind::COUNT);
        assert_eq!(scores.policy.len(), POLICY_WIDTH);
        assert!((0.0..=1.0).contains(&scores.value_estimate));
    }

    #[test]
    fn test_scores_stay_in_unit_range() {
        let scores = scorer().score(&features());
        for value in scores.action_scores.iter().chain(&scores.policy) {
            assert!((0.0..=1.0).contains(value));
        }
    }

    #[test]
    fn test_training_raises_taken_action_score() {
        let mut scorer = scorer();
        let features = features();
        let before = scorer.score(&features).action_score(ActionKind::Attack);
        for _ in 0..500 {
            scorer.train(&features, ActionKind::Attack, 1.0);
        }
        let after = scorer.score(&features).action_score(ActionKind::Attack);
        assert!(after > before, "training had no effect: {before} -> {after}");
    }

    #[test]
    fn test_training_moves_value_toward_outcome() {
        let mut scorer = scorer();
        let features = features();
        for _ in 0..500 {
            scorer.train(&features, ActionKind::Pass, 1.0);
        }
        let estimate = scorer.score(&features).value_estimate;
        assert!(estimate > 0.5, "value estimate did not rise: {estimate}");
    }
}
