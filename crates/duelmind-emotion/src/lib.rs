//! Opponent emotional modeling.
//!
//! This crate estimates the human opponent's emotional state from raw
//! behavior signals (action log, decision timings, resource usage) and
//! derives a response policy from it.
//!
//! # How It Works
//!
//! 1. **Behavior Analysis** - raw signals are reduced to four
//!    intermediate ratios: decision speed, play pattern, risk behavior,
//!    and resource management (all in `[0.0, 1.0]`).
//! 2. **State Update** - the five emotional dimensions (frustration,
//!    confidence, engagement, stress, satisfaction) are nudged or blended
//!    by per-dimension rules and clamped to `[0.0, 1.0]` after every
//!    update.
//! 3. **Empathy Policy** - [`EmotionalState::empathetic_response`] maps
//!    the current state to a play-style adjustment and an induced mistake
//!    rate via fixed threshold rules.
//!
//! The model keeps a bounded history (last 20 states) for trend
//! inspection; it never grows without limit.

pub use self::{behavior::*, model::*, state::*};

pub mod behavior;
pub mod model;
pub mod state;
