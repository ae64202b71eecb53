//! Normalized game context: the engine-facing summary of a snapshot.
//!
//! A [`GameContext`] collapses a raw [`GameSnapshot`] into a handful of
//! ratios in `[0.0, 1.0]` plus a coarse game phase. It is the common
//! currency of the pipeline: the feature encoder, the memory store, and
//! the strategy miner all consume contexts rather than raw snapshots.
//!
//! Canonical signatures (memory keys, strategy signatures) use the
//! bucketed [`ContextClass`] form so that nearby contexts collapse onto
//! the same key.

use serde::{Deserialize, Serialize};

use crate::snapshot::GameSnapshot;

/// Coarse game phase derived from the turn counter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[display("early")]
    Early,
    #[display("mid")]
    Mid,
    #[display("late")]
    Late,
}

impl GamePhase {
    /// Turn 0-2 is early, 3-7 is mid, 8+ is late.
    #[must_use]
    pub fn from_turn(turn_count: u32) -> Self {
        if turn_count < 3 {
            Self::Early
        } else if turn_count < 8 {
            Self::Mid
        } else {
            Self::Late
        }
    }
}

/// Normalized snapshot of board, resources, threat, and phase.
///
/// All ratio fields are in `[0.0, 1.0]`. `0.5` means parity for the
/// advantage ratios; `0.0` means no threat / no opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameContext {
    pub turn_count: u32,
    /// Engine's share of total board power (0.5 on an empty board).
    pub board_control: f32,
    /// Engine's share of total spendable resources (0.5 at parity).
    pub resource_advantage: f32,
    /// Opponent board power relative to the engine's health.
    pub threat_level: f32,
    /// Fraction of the hand that is currently payable.
    pub opportunity_score: f32,
    pub phase: GamePhase,
}

impl GameContext {
    /// Derives a context from a snapshot, falling back to neutral values
    /// where the snapshot is empty.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Self {
        let player_power = snapshot.player_board_power();
        let opponent_power = snapshot.opponent_board_power();
        let total_power = player_power + opponent_power;
        let board_control = if total_power > 0.0 {
            player_power / total_power
        } else {
            0.5
        };

        let total_resources = snapshot.resources.player + snapshot.resources.opponent;
        let resource_advantage = if total_resources > 0.0 {
            snapshot.resources.player / total_resources
        } else {
            0.5
        };

        let threat_level = (opponent_power / snapshot.player_health.max(1.0)).min(1.0);

        let hand_size = snapshot.player_hand.len().max(1) as f32;
        let opportunity_score = (snapshot.playable_hand_cards() as f32 / hand_size).min(1.0);

        Self {
            turn_count: snapshot.turn_count,
            board_control,
            resource_advantage,
            threat_level,
            opportunity_score,
            phase: GamePhase::from_turn(snapshot.turn_count),
        }
    }

    /// Buckets the numeric fields into the coarse form used by canonical
    /// signatures.
    #[must_use]
    pub fn classify(&self) -> ContextClass {
        ContextClass {
            board: BoardStanding::from_ratio(self.board_control),
            resources: ResourceStanding::from_ratio(self.resource_advantage),
            phase: self.phase,
            pressure: Pressure::from_threat(self.threat_level),
        }
    }

    /// Similarity in `[0.0, 1.0]`: exact phase match plus closeness of
    /// board control and resource advantage, averaged.
    #[must_use]
    pub fn similarity(&self, other: &Self) -> f32 {
        let phase = if self.phase == other.phase { 1.0 } else { 0.0 };
        let board = 1.0 - (self.board_control - other.board_control).abs();
        let resources = 1.0 - (self.resource_advantage - other.resource_advantage).abs();
        (phase + board.max(0.0) + resources.max(0.0)) / 3.0
    }

    /// Whether this context is close enough to `other` to count as the
    /// same situation: phase must match exactly, board control within
    /// `tolerance`.
    #[must_use]
    pub fn matches(&self, other: &Self, tolerance: f32) -> bool {
        self.phase == other.phase && (self.board_control - other.board_control).abs() <= tolerance
    }
}

impl Default for GameContext {
    fn default() -> Self {
        Self::from_snapshot(&GameSnapshot::default())
    }
}

/// Bucketed board standing used in canonical signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardStanding {
    Advantage,
    Neutral,
    Disadvantage,
}

impl BoardStanding {
    #[must_use]
    pub fn from_ratio(board_control: f32) -> Self {
        if board_control > 0.6 {
            Self::Advantage
        } else if board_control < 0.4 {
            Self::Disadvantage
        } else {
            Self::Neutral
        }
    }
}

/// Bucketed resource standing used in canonical signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStanding {
    Abundant,
    Moderate,
    Scarce,
}

impl ResourceStanding {
    #[must_use]
    pub fn from_ratio(resource_advantage: f32) -> Self {
        if resource_advantage > 0.6 {
            Self::Abundant
        } else if resource_advantage < 0.4 {
            Self::Scarce
        } else {
            Self::Moderate
        }
    }
}

/// Bucketed threat pressure used in canonical signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pressure {
    High,
    Medium,
    Low,
}

impl Pressure {
    #[must_use]
    pub fn from_threat(threat_level: f32) -> Self {
        if threat_level > 0.7 {
            Self::High
        } else if threat_level < 0.3 {
            Self::Low
        } else {
            Self::Medium
        }
    }
}

/// Coarse, serializable form of a context. Its JSON encoding is stable,
/// which makes it usable inside canonical signature keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextClass {
    pub board: BoardStanding,
    pub resources: ResourceStanding,
    pub phase: GamePhase,
    pub pressure: Pressure,
}
