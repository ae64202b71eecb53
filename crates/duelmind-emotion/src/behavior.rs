use serde::{Deserialize, Serialize};

use duelmind_core::ActionKind;

/// One recent opponent action, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorRecord {
    pub kind: ActionKind,
    /// Power committed by the action (0 when not applicable).
    pub power: f32,
    /// Resources the action spent.
    pub stake: f32,
    /// The opponent committed everything at once.
    pub all_in: bool,
    /// The action looked like an experiment rather than a known line.
    pub experimental: bool,
    /// The action deliberately held strength back.
    pub conservative: bool,
}

impl BehaviorRecord {
    /// A plain record of the given kind with no power, stake, or flags.
    #[must_use]
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            power: 0.0,
            stake: 0.0,
            all_in: false,
            experimental: false,
            conservative: false,
        }
    }
}

/// Raw behavior signals for one analysis pass.
///
/// `timings_ms` holds per-action decision times, oldest first. Both lists
/// may be empty; analysis then falls back to neutral values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorData {
    pub actions: Vec<BehaviorRecord>,
    pub timings_ms: Vec<f32>,
}

/// The four intermediate signals derived from raw behavior.
///
/// All values are in `[0.0, 1.0]`; `0.5` is the neutral fallback when a
/// signal cannot be computed from the available data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorAnalysis {
    /// Recent decision pace relative to the opponent's own baseline:
    /// 0.8 fast, 0.5 normal, 0.2 slow.
    pub decision_speed: f32,
    /// Aggressive-vs-defensive tilt over the recent action window.
    pub play_pattern: f32,
    /// Weighted sum of risk markers (large stakes, all-ins, experiments).
    pub risk_behavior: f32,
    /// 1 minus the fraction of past turns that wasted resources.
    pub resource_management: f32,
}

impl Default for BehaviorAnalysis {
    fn default() -> Self {
        Self {
            decision_speed: 0.5,
            play_pattern: 0.5,
            risk_behavior: 0.5,
            resource_management: 0.5,
        }
    }
}
