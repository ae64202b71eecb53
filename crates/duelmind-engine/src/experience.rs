//! The experience ring buffer feeding online learning.

use std::collections::VecDeque;

use chrono::{DateTime, TimeDelta, Utc};

use duelmind_core::{Action, GameContext};
use duelmind_emotion::EmotionalState;
use duelmind_neural::FeatureVector;

/// Ring-buffer capacity; the oldest experience drops on overflow.
pub const EXPERIENCE_CAP: usize = 1000;
/// Maximum experiences consumed per training batch.
pub const TRAINING_BATCH: usize = 32;
/// A training batch runs every this many decisions.
pub const TRAINING_INTERVAL: u64 = 10;

/// One recorded decision and its eventual outcome.
///
/// The outcome starts unknown and is back-filled exactly once via
/// [`ExperienceBuffer::backfill`]; a second report for the same
/// experience is ignored.
#[derive(Debug, Clone)]
pub struct Experience {
    id: u64,
    pub context: GameContext,
    pub action: Action,
    pub features: FeatureVector,
    pub emotional: EmotionalState,
    pub recorded_at: DateTime<Utc>,
    pub importance: f32,
    /// Whether the action carried a creative annotation when chosen.
    pub was_creative: bool,
    outcome: Option<f32>,
}

impl Experience {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn outcome(&self) -> Option<f32> {
        self.outcome
    }
}

/// Bounded buffer of pending and completed experiences.
#[derive(Debug, Clone, Default)]
pub struct ExperienceBuffer {
    entries: VecDeque<Experience>,
    next_id: u64,
}

impl ExperienceBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Experience> {
        self.entries.iter()
    }

    /// Records a new open experience and returns its id.
    #[expect(clippy::too_many_arguments)]
    pub fn record(
        &mut self,
        context: GameContext,
        action: Action,
        features: FeatureVector,
        emotional: EmotionalState,
        importance: f32,
        was_creative: bool,
        now: DateTime<Utc>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push_back(Experience {
            id,
            context,
            action,
            features,
            emotional,
            recorded_at: now,
            importance,
            was_creative,
            outcome: None,
        });
        if self.entries.len() > EXPERIENCE_CAP {
            self.entries.pop_front();
        }
        id
    }

    /// Back-fills an outcome, making the experience trainable.
    ///
    /// Matches by id first; if the id is unknown (or already resolved),
    /// falls back to the most recent open experience recorded within the
    /// last ten seconds. Returns the resolved experience, or `None` when
    /// nothing matched (the caller treats that as a silent no-op).
    pub fn backfill(
        &mut self,
        id: u64,
        outcome: f32,
        now: DateTime<Utc>,
    ) -> Option<&Experience> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == id && entry.outcome.is_none())
            .or_else(|| {
                self.entries.iter().rposition(|entry| {
                    entry.outcome.is_none() && now - entry.recorded_at <= TimeDelta::seconds(10)
                })
            })?;
        let entry = &mut self.entries[index];
        entry.outcome = Some(outcome.clamp(0.0, 1.0));
        Some(&self.entries[index])
    }

    /// Removes and returns up to [`TRAINING_BATCH`] of the most recent
    /// outcome-bearing experiences. Open experiences stay in the buffer
    /// so late outcome reports can still land.
    pub fn take_training_batch(&mut self) -> Vec<Experience> {
        let mut batch = Vec::new();
        let mut index = self.entries.len();
        while index > 0 && batch.len() < TRAINING_BATCH {
            index -= 1;
            if self.entries[index].outcome.is_some() {
                batch.push(self.entries.remove(index).expect("index is in range"));
            }
        }
        batch
    }
}
