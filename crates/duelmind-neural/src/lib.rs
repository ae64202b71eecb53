//! Neural scoring for the DuelMind opponent engine.
//!
//! This crate implements the trainable part of the decision pipeline:
//!
//! 1. **Feature Encoding** ([`feature`]) - collapses game context,
//!    emotional estimate, memory recall, and personality into a fixed
//!    50-slot vector, every slot in `[0.0, 1.0]`.
//! 2. **Forward Scoring** ([`scorer`]) - three small feed-forward
//!    networks read the same vector: a decision network (one output per
//!    action kind), a value network (one scalar position estimate), and
//!    a policy network (a 20-slot preference distribution).
//! 3. **Online Updates** ([`network`]) - after an outcome is reported,
//!    a delta rule with momentum nudges the networks toward it.
//!
//! # Design: Output-Layer-Only Updates
//!
//! The online update adjusts only each network's final layer; hidden
//! layers keep their random initialization. This makes every update
//! cheap and keeps the hidden layers as a fixed random projection of the
//! feature space. The trade-off is that the networks cannot learn new
//! intermediate representations, only re-weight the existing ones. See
//! [`network::FeedForward::update`].
//!
//! # Determinism
//!
//! All weight initialization draws from a caller-supplied [`rand::Rng`],
//! so an engine seeded with a fixed generator scores reproducibly.

pub use self::{feature::*, network::*, scorer::*};

pub mod feature;
pub mod network;
pub mod scorer;
