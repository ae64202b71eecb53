//! Strategy discovery and creative move generation.
//!
//! Two complementary sources of unconventional play:
//!
//! - [`miner`] - mines recent turn sequences for repeatable patterns,
//!   deduplicates them by canonical signature, and evolves proven
//!   strategies through mutation and heuristic scoring.
//! - [`creative`] - enumerates a fixed catalog of unconventional move
//!   archetypes tagged with novelty and risk, filtered and ranked per
//!   decision.
//!
//! The miner learns from what actually happened; the creative catalog
//! injects options no history would suggest. The decision pipeline
//! consumes both.

pub use self::{creative::*, miner::*};

pub mod creative;
pub mod miner;
