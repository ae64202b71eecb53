use serde::{Deserialize, Serialize};

use crate::card::{Card, ResourceTurn};

/// Both sides of the board, from the engine's point of view.
///
/// `player_side` is the side the engine plays; `opponent_side` is the
/// human opponent's side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    pub player_side: Vec<Card>,
    pub opponent_side: Vec<Card>,
}

/// Spendable resources for both players.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub player: f32,
    pub opponent: f32,
}

/// Snapshot of game state handed in by the rules engine.
///
/// Only the fields that feed the decision pipeline appear here. A host
/// that cannot populate a field leaves its default in place; the derived
/// [`GameContext`](crate::GameContext) falls back to neutral values
/// rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub turn_count: u32,
    pub board: BoardState,
    pub resources: Resources,
    pub player_hand: Vec<Card>,
    pub player_health: f32,
    /// Per-turn resource usage of the opponent, oldest first.
    pub resource_history: Vec<ResourceTurn>,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            turn_count: 0,
            board: BoardState::default(),
            resources: Resources::default(),
            player_hand: Vec::new(),
            player_health: 20.0,
            resource_history: Vec::new(),
        }
    }
}

impl GameSnapshot {
    /// Total power on the engine's side of the board.
    #[must_use]
    pub fn player_board_power(&self) -> f32 {
        self.board.player_side.iter().map(|card| card.power).sum()
    }

    /// Total power on the opponent's side of the board.
    #[must_use]
    pub fn opponent_board_power(&self) -> f32 {
        self.board.opponent_side.iter().map(|card| card.power).sum()
    }

    /// Number of hand cards the engine could pay for right now.
    #[must_use]
    pub fn playable_hand_cards(&self) -> usize {
        self.player_hand
            .iter()
            .filter(|card| card.cost <= self.resources.player)
            .count()
    }
}
