use arrayvec::ArrayVec;

use duelmind_core::GameSnapshot;
use duelmind_stats::blend::ewma;

use crate::{
    behavior::{BehaviorAnalysis, BehaviorData},
    state::EmotionalState,
};

/// Maximum number of past states kept for trend inspection.
pub const HISTORY_CAP: usize = 20;

/// Tracks the opponent's emotional state across a session.
///
/// Call [`EmotionalModel::analyze`] once per decision with the latest
/// behavior signals; it updates the state in place and returns the
/// intermediate analysis. The previous state is recorded in a bounded
/// history (oldest dropped at capacity).
#[derive(Debug, Clone, Default)]
pub struct EmotionalModel {
    state: EmotionalState,
    history: ArrayVec<EmotionalState, HISTORY_CAP>,
}

impl EmotionalModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> EmotionalState {
        self.state
    }

    /// Past states, oldest first. At most [`HISTORY_CAP`] entries.
    #[must_use]
    pub fn history(&self) -> &[EmotionalState] {
        &self.history
    }

    /// Analyzes the latest behavior signals and updates the emotional
    /// state in place.
    pub fn analyze(&mut self, snapshot: &GameSnapshot, behavior: &BehaviorData) -> BehaviorAnalysis {
        let analysis = BehaviorAnalysis {
            decision_speed: decision_speed(&behavior.timings_ms),
            play_pattern: play_pattern(behavior),
            risk_behavior: risk_behavior(behavior, snapshot),
            resource_management: resource_management(snapshot),
        };
        self.update_state(&analysis);
        analysis
    }

    fn update_state(&mut self, analysis: &BehaviorAnalysis) {
        let state = &mut self.state;

        // Rushed decisions build frustration; a normal pace lets it decay.
        if analysis.decision_speed > 0.7 {
            state.frustration += 0.1;
        } else {
            state.frustration -= 0.05;
        }

        if analysis.resource_management > 0.6 {
            state.confidence += 0.08;
        } else if analysis.risk_behavior > 0.7 {
            state.confidence -= 0.1;
        }

        let engagement_factor =
            (analysis.play_pattern + (1.0 - (analysis.decision_speed - 0.5).abs())) / 2.0;
        state.engagement = ewma(state.engagement, engagement_factor, 0.3);

        state.clamp_all();
        state.stress = (state.frustration + analysis.decision_speed) / 2.0;
        state.satisfaction = ((1.0 - state.frustration) + state.confidence) / 2.0;
        state.clamp_all();

        if self.history.is_full() {
            self.history.remove(0);
        }
        self.history.push(self.state);
    }
}

/// Recent pace relative to the opponent's own average.
///
/// Noticeably faster recent decisions read as pressure (0.8); noticeably
/// slower ones as deliberation (0.2). No timing data reads as normal.
fn decision_speed(timings_ms: &[f32]) -> f32 {
    if timings_ms.is_empty() {
        return 0.5;
    }
    let overall = mean(timings_ms);
    let recent_window = &timings_ms[timings_ms.len().saturating_sub(5)..];
    let recent = mean(recent_window);

    if recent < overall * 0.7 {
        0.8
    } else if recent > overall * 1.5 {
        0.2
    } else {
        0.5
    }
}

fn play_pattern(behavior: &BehaviorData) -> f32 {
    if behavior.actions.len() < 3 {
        return 0.5;
    }
    let recent = &behavior.actions[behavior.actions.len().saturating_sub(5)..];
    let aggressive = recent
        .iter()
        .filter(|record| record.kind.is_attack() || record.power > 5.0)
        .count();
    let defensive = recent
        .iter()
        .filter(|record| record.kind.is_defend() || record.conservative)
        .count();

    if aggressive > defensive { 0.7 } else { 0.3 }
}

fn risk_behavior(behavior: &BehaviorData, snapshot: &GameSnapshot) -> f32 {
    if behavior.actions.is_empty() {
        return 0.5;
    }
    let recent = &behavior.actions[behavior.actions.len().saturating_sub(5)..];
    let mut risk: f32 = 0.0;
    for record in recent {
        if record.stake > snapshot.resources.opponent * 0.7 {
            risk += 0.3;
        }
        if record.all_in {
            risk += 0.4;
        }
        if record.experimental {
            risk += 0.2;
        }
    }
    risk.min(1.0)
}

#[expect(clippy::cast_precision_loss)]
fn resource_management(snapshot: &GameSnapshot) -> f32 {
    if snapshot.resource_history.is_empty() {
        return 0.5;
    }
    let wasteful = snapshot
        .resource_history
        .iter()
        .filter(|turn| turn.is_wasteful())
        .count();
    1.0 - wasteful as f32 / snapshot.resource_history.len() as f32
}

#[expect(clippy::cast_precision_loss)]
fn mean(values: &[f32]) -> f32 {
    values.iter().sum::<f32>() / values.len().max(1) as f32
}

#[cfg(test)]
mod tests {
    use duelmind_core::{ActionKind, ResourceTurn, Resources};

    use super::*;
    use crate::behavior::BehaviorRecord;

    fn aggressive_behavior() -> BehaviorData {
        let mut record = BehaviorRecord::new(ActionKind::Attack);
        record.power = 6.0;
        BehaviorData {
            actions: vec![record; 6],
            timings_ms: vec![1000.0; 6],
        }
    }

    #[test]
    fn test_empty_signals_are_neutral() {
        let mut model = EmotionalModel::new();
        let analysis = model.analyze(&GameSnapshot::default(), &BehaviorData::default());
        assert_eq!(analysis.decision_speed, 0.5);
        assert_eq!(analysis.play_pattern, 0.5);
        assert_eq!(analysis.risk_behavior, 0.5);
        assert_eq!(analysis.resource_management, 0.5);
    }

    #[test]
    fn test_fast_recent_decisions_read_as_pressure() {
        let timings = vec![2000.0, 2000.0, 2000.0, 2000.0, 2000.0, 100.0, 100.0, 100.0, 100.0, 100.0];
        assert_eq!(decision_speed(&timings), 0.8);
    }

    #[test]
    fn test_slow_recent_decisions_read_as_deliberation() {
        let timings = vec![500.0, 500.0, 500.0, 500.0, 500.0, 5000.0, 5000.0, 5000.0, 5000.0, 5000.0];
        assert_eq!(decision_speed(&timings), 0.2);
    }

    #[test]
    fn test_aggressive_pattern_detected() {
        assert_eq!(play_pattern(&aggressive_behavior()), 0.7);
    }

    #[test]
    fn test_risk_caps_at_one() {
        let mut record = BehaviorRecord::new(ActionKind::Attack);
        record.all_in = true;
        record.experimental = true;
        record.stake = 100.0;
        let behavior = BehaviorData {
            actions: vec![record; 5],
            timings_ms: Vec::new(),
        };
        let snapshot = GameSnapshot {
            resources: Resources {
                player: 0.0,
                opponent: 10.0,
            },
            ..GameSnapshot::default()
        };
        assert_eq!(risk_behavior(&behavior, &snapshot), 1.0);
    }

    #[test]
    fn test_wasteful_history_lowers_management() {
        let snapshot = GameSnapshot {
            resource_history: vec![
                ResourceTurn::new(5.0, 10.0),
                ResourceTurn::new(0.0, 10.0),
                ResourceTurn::new(6.0, 10.0),
                ResourceTurn::new(1.0, 10.0),
            ],
            ..GameSnapshot::default()
        };
        assert_eq!(resource_management(&snapshot), 0.5);
    }

    #[test]
    fn test_dimensions_stay_in_range_under_repeated_updates() {
        let mut model = EmotionalModel::new();
        let behavior = aggressive_behavior();
        let snapshot = GameSnapshot::default();
        for _ in 0..200 {
            model.analyze(&snapshot, &behavior);
            let state = model.state();
            for value in [
                state.frustration,
                state.confidence,
                state.engagement,
                state.stress,
                state.satisfaction,
            ] {
                assert!((0.0..=1.0).contains(&value), "dimension escaped: {value}");
            }
        }
    }

    #[test]
    fn test_history_is_bounded() {
        let mut model = EmotionalModel::new();
        let behavior = BehaviorData::default();
        let snapshot = GameSnapshot::default();
        for _ in 0..50 {
            model.analyze(&snapshot, &behavior);
        }
        assert_eq!(model.history().len(), HISTORY_CAP);
    }
}
