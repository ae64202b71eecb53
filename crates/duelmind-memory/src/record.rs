use serde::{Deserialize, Serialize};

use duelmind_core::{ActionKind, ContextClass, GameContext};

/// What kind of moment a memory records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    /// A decision the engine made (outcome still provisional).
    #[display("decision")]
    Decision,
    /// A decision whose real outcome has been reported back.
    #[display("outcome")]
    Outcome,
}

/// One moment worth remembering, as handed to [`store`].
///
/// [`store`]: crate::MemoryStore::store
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub kind: MemoryKind,
    pub action: ActionKind,
    pub context: GameContext,
    /// Realized or provisional outcome in `[0.0, 1.0]`.
    pub outcome: f32,
    /// How emotionally charged the moment was.
    pub emotional_impact: f32,
    /// How much the moment mattered strategically.
    pub strategic_significance: f32,
    /// How unusual the chosen action was.
    pub novelty: f32,
}

impl MemoryRecord {
    /// Importance of this moment in `[0.0, 1.0]`.
    ///
    /// Starts at a 0.5 baseline and accumulates bonuses for extreme
    /// outcomes, novelty, emotional charge, and strategic weight.
    #[must_use]
    pub fn importance(&self) -> f32 {
        let mut importance: f32 = 0.5;
        if self.outcome > 0.8 || self.outcome < 0.2 {
            importance += 0.3;
        }
        if self.novelty > 0.7 {
            importance += 0.2;
        }
        if self.emotional_impact > 0.6 {
            importance += 0.2;
        }
        if self.strategic_significance > 0.7 {
            importance += 0.3;
        }
        importance.min(1.0)
    }

    /// Canonical signature for long-term deduplication.
    ///
    /// Two records with the same kind, the same bucketed context, and
    /// outcomes in the same decile share a signature and therefore merge
    /// into one long-term entry.
    #[must_use]
    pub fn signature(&self) -> String {
        #[derive(Serialize)]
        struct SignatureKey {
            kind: MemoryKind,
            context: ContextClass,
            outcome_decile: i32,
        }

        #[expect(clippy::cast_possible_truncation)]
        let outcome_decile = (self.outcome * 10.0).round() as i32;
        let key = SignatureKey {
            kind: self.kind,
            context: self.context.classify(),
            outcome_decile,
        };
        serde_json::to_string(&key).expect("signature key serialization cannot fail")
    }
}
