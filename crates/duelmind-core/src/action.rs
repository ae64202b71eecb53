use serde::{Deserialize, Serialize};

/// The closed set of action families the engine can score.
///
/// The decision network has one output slot per kind; [`ActionKind::index`]
/// maps a kind to its slot. The rules engine describes every legal action
/// using one of these kinds, so a decision can never name an action family
/// the host does not understand.
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
pub enum ActionKind {
    #[display("play_card")]
    PlayCard,
    #[display("attack")]
    Attack,
    #[display("defend")]
    Defend,
    #[display("pass")]
    Pass,
    #[display("activate_ability")]
    ActivateAbility,
    #[display("reposition")]
    Reposition,
    #[display("sacrifice")]
    Sacrifice,
    #[display("counter")]
    Counter,
    #[display("combo")]
    Combo,
    #[display("resource_shift")]
    ResourceShift,
}

impl ActionKind {
    /// Number of action kinds; also the decision network's output width.
    pub const COUNT: usize = 10;

    /// Every kind, in output-slot order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::PlayCard,
        Self::Attack,
        Self::Defend,
        Self::Pass,
        Self::ActivateAbility,
        Self::Reposition,
        Self::Sacrifice,
        Self::Counter,
        Self::Combo,
        Self::ResourceShift,
    ];

    /// Output slot of this kind in the scorer networks.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One legal action as described by the rules engine.
///
/// The stance flags (`aggressive`, `defensive`, `creative`) are supplied
/// by the host; the engine uses them for empathy adjustments and
/// creative-candidate matching but never mutates them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub cost: f32,
    pub power: f32,
    pub aggressive: bool,
    pub defensive: bool,
    pub creative: bool,
}

impl Action {
    /// A plain action of the given kind with no cost, power, or stance.
    #[must_use]
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            cost: 0.0,
            power: 0.0,
            aggressive: false,
            defensive: false,
            creative: false,
        }
    }

    /// The do-nothing action; returned whenever no legal action exists.
    #[must_use]
    pub fn pass() -> Self {
        Self::new(ActionKind::Pass)
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::pass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, kind) in ActionKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i, "slot mismatch for {kind}");
        }
    }

    #[test]
    fn test_serializes_snake_case() {
        let json = serde_json::to_string(&ActionKind::ActivateAbility).unwrap();
        assert_eq!(json, "\"activate_ability\"");
    }
}
