use serde::{Deserialize, Serialize};

/// A card as the decision engine sees it: just the numeric properties
/// that influence scoring. Card identity, text, and abilities stay with
/// the rules engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Resource cost to play the card.
    pub cost: f32,
    /// Combat power the card contributes while on the board.
    pub power: f32,
}

impl Card {
    #[must_use]
    pub fn new(cost: f32, power: f32) -> Self {
        Self { cost, power }
    }
}

/// Resource usage recorded for one past opponent turn.
///
/// Used to judge how tightly the opponent spends: a turn with a large
/// unused fraction counts as wasteful when estimating resource
/// management skill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceTurn {
    /// Resources left unspent at end of turn.
    pub unused: f32,
    /// Total resources that were available that turn.
    pub total: f32,
}

impl ResourceTurn {
    #[must_use]
    pub fn new(unused: f32, total: f32) -> Self {
        Self { unused, total }
    }

    /// Whether more than 30% of the turn's resources went unused.
    #[must_use]
    pub fn is_wasteful(self) -> bool {
        self.unused > self.total * 0.3
    }
}
