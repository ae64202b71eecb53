//! Multi-tier memory for the DuelMind opponent engine.
//!
//! Five cooperating tiers, each with its own retention policy:
//!
//! | tier       | shape                              | bound                     |
//! |------------|------------------------------------|---------------------------|
//! | short-term | recency list of recent moments     | 20, consolidates on overflow |
//! | long-term  | signature-keyed consolidated table | unbounded, deduplicated   |
//! | episodic   | plain recency log                  | 100, drop-oldest          |
//! | semantic   | concept → strength/confidence      | fixed concept vocabulary  |
//! | procedural | action family → success/usage      | fixed action vocabulary   |
//!
//! # Consolidation
//!
//! Short-term entries that prove important (importance > 0.7) or get
//! recalled often (access count above a threshold) migrate to long-term
//! storage under a canonical signature: memory kind + bucketed context +
//! outcome rounded to one decimal. Re-storing an existing signature
//! increments its reinforcement count instead of duplicating the entry.
//!
//! # Recall
//!
//! [`MemoryStore::recall`] searches every tier, ranks matches by a
//! relevance score (importance baseline, recency decay over about a day,
//! logarithmic reinforcement bonus, context-similarity bonus), and
//! synthesizes the matches into recommendations, grouped insights, and
//! warnings about repeated recent failures.
//!
//! All time-dependent operations take `now` as a parameter; the store
//! never reads the wall clock itself.

pub use self::{query::*, record::*, store::*};

pub mod query;
pub mod record;
pub mod store;
