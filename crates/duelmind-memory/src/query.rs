use chrono::TimeDelta;

use duelmind_core::{ActionKind, GameContext};

use crate::record::MemoryKind;

/// Filter for a [`recall`] pass. Unset fields match everything.
///
/// [`recall`]: crate::MemoryStore::recall
#[derive(Debug, Clone, Default)]
pub struct MemoryQuery {
    pub kind: Option<MemoryKind>,
    /// Match memories from similar situations: exact phase, board
    /// control within 0.2.
    pub context: Option<GameContext>,
    pub min_importance: Option<f32>,
    /// Only memories younger than this.
    pub max_age: Option<TimeDelta>,
    /// Semantic concepts to look up by name.
    pub concepts: Vec<&'static str>,
    /// Procedural skill (action family) to look up.
    pub skill: Option<ActionKind>,
}

/// What a recall pass distilled from the matching memories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecallResult {
    /// Mean relevance of the matches; 0 when nothing matched.
    pub confidence: f32,
    pub recommendations: Vec<Recommendation>,
    pub insights: Vec<Insight>,
    pub warnings: Vec<Warning>,
}

impl RecallResult {
    /// Strength of the best recommendation, 0 when there is none.
    #[must_use]
    pub fn top_recommendation_confidence(&self) -> f32 {
        self.recommendations
            .first()
            .map_or(0.0, |recommendation| recommendation.confidence)
    }
}

/// Direction a recommendation points in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationKind {
    /// Similar situations went well before; lean into them.
    RepeatSuccess,
    /// Similar situations went badly before; steer away.
    AvoidFailure,
}

/// One actionable lesson from the matched memories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub confidence: f32,
    /// Number of matched memories backing this recommendation.
    pub support: usize,
}

impl Recommendation {
    /// One-line description for decision rationales.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self.kind {
            RecommendationKind::RepeatSuccess => "similar situations have been successful before",
            RecommendationKind::AvoidFailure => "avoid patterns that have failed before",
        }
    }
}

/// A recurring pattern found by grouping matches by similarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insight {
    /// Size of the similarity group (always ≥ 3).
    pub members: usize,
    pub mean_outcome: f32,
    pub confidence: f32,
}

/// Something the matched memories say to watch out for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    /// More than two failures in the last ten minutes.
    RepeatedFailure { recent_failures: usize },
}
