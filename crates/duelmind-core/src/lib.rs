//! Core data model for the DuelMind opponent engine.
//!
//! This crate defines the typed boundary between the engine and its host:
//! the game snapshot handed in by the rules engine, the closed set of
//! action kinds the engine can score, the normalized [`GameContext`]
//! derived from a snapshot, and the engine personalities.
//!
//! # Design Principles
//!
//! ## Defaults Instead of Failures
//!
//! A host may only be able to populate part of a [`GameSnapshot`]. Every
//! field has a neutral default (`0`, `0.5`, or empty), so deriving a
//! context from a sparse snapshot always succeeds. Denominators are
//! guarded at the point of computation; no snapshot can make context
//! derivation panic or return values outside `[0.0, 1.0]`.
//!
//! ## Closed Action Vocabulary
//!
//! [`ActionKind`] is a closed enum of the ten action families the scorer
//! networks have output slots for. The rules engine describes legal
//! actions in this vocabulary; the engine never fabricates a kind that
//! was not handed to it.

pub use self::{action::*, card::*, context::*, personality::*, snapshot::*};

pub mod action;
pub mod card;
pub mod context;
pub mod personality;
pub mod snapshot;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown personality: {name}")]
pub struct UnknownPersonalityError {
    #[error(not(source))]
    pub name: String,
}
