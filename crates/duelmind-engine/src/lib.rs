//! The DuelMind decision engine: composition of scoring, memory,
//! emotion, and creativity into single decisions.
//!
//! # Pipeline
//!
//! One [`DecisionEngine::make_decision`] call runs these stages, in
//! order, with no loops back:
//!
//! ```text
//! Sense      read snapshot + behavior signals
//! Model      update the opponent's emotional estimate, derive empathy
//! Recall     query the memory store for similar situations
//! Encode     build the 50-slot feature vector
//! Score      forward the three scorer networks
//! Diversify  generate creative candidates (max risk 0.8, min novelty 0.6)
//! Compose    total = neural·0.5 + policy·0.3 + creativity bonus
//! Empathize  style multipliers + probabilistic deliberate mistakes
//! Select     exploit the best, or explore among the top three
//! Explain    assemble the rationale and emotional response lines
//! Record     push an open experience, maybe run a training batch
//! ```
//!
//! The pipeline performs no I/O and cannot fail: an empty action list
//! yields a pass decision, and missing snapshot fields fall back to
//! neutral defaults inside `duelmind-core`.
//!
//! # Background Tasks
//!
//! Memory consolidation and strategy evolution are **not** on the
//! decision path. The host scheduler calls
//! [`DecisionEngine::consolidate_memories`] and
//! [`DecisionEngine::evolve_strategies`] on its own cadence. Both take
//! `&mut self`, so a multi-threaded host has to serialize them with
//! decisions - the single-writer requirement is enforced by the borrow
//! checker rather than by convention.
//!
//! # Determinism
//!
//! Every random draw comes from one seeded `Pcg32` owned by the engine;
//! [`DecisionEngine::with_seed`] plus the `*_at` method variants (which
//! take an explicit `now`) make whole sessions reproducible.

pub use self::{candidate::*, engine::*, experience::*};

pub mod candidate;
pub mod engine;
pub mod experience;
