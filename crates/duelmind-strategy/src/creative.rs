//! Creative candidate generation.
//!
//! A fixed catalog of unconventional move archetypes, five families with
//! two candidates each. Candidates carry novelty and risk literals;
//! generation filters the catalog by the caller's constraints and ranks
//! what survives by `0.7 * novelty + 0.3 * (1 - risk)`, returning the
//! top three.
//!
//! The catalog is deliberately static: creativity here means offering
//! the pipeline options that mined history would never produce, not
//! inventing actions the rules engine cannot perform. A candidate only
//! ever *annotates* a legal action it matches.

use serde::{Deserialize, Serialize};

use duelmind_core::{Action, ActionKind};

/// The five archetype families.
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
)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeFamily {
    #[display("reverse_psychology")]
    ReversePsychology,
    #[display("sacrificial")]
    Sacrificial,
    #[display("misdirection")]
    Misdirection,
    #[display("resource_manipulation")]
    ResourceManipulation,
    #[display("timing_surprise")]
    TimingSurprise,
}

/// One unconventional move descriptor from the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreativeCandidate {
    pub family: ArchetypeFamily,
    pub name: &'static str,
    /// One-line rationale surfaced in decision explanations.
    pub rationale: &'static str,
    pub novelty: f32,
    pub risk: f32,
}

/// The full archetype catalog.
pub const ARCHETYPES: [CreativeCandidate; 10] = [
    CreativeCandidate {
        family: ArchetypeFamily::ReversePsychology,
        name: "weak_play",
        rationale: "lure the opponent into overconfidence",
        novelty: 0.8,
        risk: 0.6,
    },
    CreativeCandidate {
        family: ArchetypeFamily::ReversePsychology,
        name: "resource_waste",
        rationale: "hide true resource management capability",
        novelty: 0.7,
        risk: 0.7,
    },
    CreativeCandidate {
        family: ArchetypeFamily::Sacrificial,
        name: "sacrifice_for_position",
        rationale: "trade immediate power for strategic positioning",
        novelty: 0.6,
        risk: 0.5,
    },
    CreativeCandidate {
        family: ArchetypeFamily::Sacrificial,
        name: "bait_and_switch",
        rationale: "sacrifice to force an unfavorable position",
        novelty: 0.8,
        risk: 0.8,
    },
    CreativeCandidate {
        family: ArchetypeFamily::Misdirection,
        name: "false_telegraph",
        rationale: "signal one strategy while preparing another",
        novelty: 0.9,
        risk: 0.4,
    },
    CreativeCandidate {
        family: ArchetypeFamily::Misdirection,
        name: "pattern_break",
        rationale: "suddenly change the established play pattern",
        novelty: 0.7,
        risk: 0.5,
    },
    CreativeCandidate {
        family: ArchetypeFamily::ResourceManipulation,
        name: "artificial_scarcity",
        rationale: "create false resource pressure",
        novelty: 0.8,
        risk: 0.6,
    },
    CreativeCandidate {
        family: ArchetypeFamily::ResourceManipulation,
        name: "abundance_display",
        rationale: "show strength to discourage aggression",
        novelty: 0.6,
        risk: 0.3,
    },
    CreativeCandidate {
        family: ArchetypeFamily::TimingSurprise,
        name: "premature_climax",
        rationale: "peak power earlier than expected",
        novelty: 0.7,
        risk: 0.7,
    },
    CreativeCandidate {
        family: ArchetypeFamily::TimingSurprise,
        name: "delayed_gratification",
        rationale: "hold back for an unexpected late surge",
        novelty: 0.8,
        risk: 0.5,
    },
];

/// Constraints applied before ranking. Unset bounds admit everything.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    pub max_risk: Option<f32>,
    pub min_novelty: Option<f32>,
    pub exclude: Vec<ArchetypeFamily>,
}

impl Constraints {
    fn allows(&self, candidate: &CreativeCandidate) -> bool {
        if self.max_risk.is_some_and(|max| candidate.risk > max) {
            return false;
        }
        if self.min_novelty.is_some_and(|min| candidate.novelty < min) {
            return false;
        }
        !self.exclude.contains(&candidate.family)
    }
}

impl CreativeCandidate {
    /// Ranking score: novelty-weighted, risk-discounted.
    #[must_use]
    pub fn creative_score(&self) -> f32 {
        0.7 * self.novelty + 0.3 * (1.0 - self.risk)
    }

    /// Whether this candidate can annotate the given legal action.
    ///
    /// Per-family rules:
    ///
    /// - reverse psychology: passing, or anything already tagged creative
    /// - sacrificial: sacrifices, or aggressive actions with a real cost
    /// - misdirection: anything tagged creative
    /// - resource manipulation: resource-shift actions
    /// - timing surprise: combos and ability activations
    #[must_use]
    pub fn matches(&self, action: &Action) -> bool {
        match self.family {
            ArchetypeFamily::ReversePsychology => action.kind.is_pass() || action.creative,
            ArchetypeFamily::Sacrificial => {
                action.kind.is_sacrifice() || (action.aggressive && action.cost > 0.0)
            }
            ArchetypeFamily::Misdirection => action.creative,
            ArchetypeFamily::ResourceManipulation => action.kind.is_resource_shift(),
            ArchetypeFamily::TimingSurprise => {
                matches!(action.kind, ActionKind::Combo | ActionKind::ActivateAbility)
            }
        }
    }
}

/// Filters the catalog by `constraints`, ranks by creative score, and
/// returns the top three candidates.
#[must_use]
pub fn generate(constraints: &Constraints) -> Vec<CreativeCandidate> {
    let mut candidates: Vec<_> = ARCHETYPES
        .iter()
        .copied()
        .filter(|candidate| constraints.allows(candidate))
        .collect();
    candidates.sort_by(|a, b| b.creative_score().total_cmp(&a.creative_score()));
    candidates.truncate(3);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconstrained_returns_top_three() {
        let candidates = generate(&Constraints::default());
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].name, "false_telegraph");
        for pair in candidates.windows(2) {
            assert!(pair[0].creative_score() >= pair[1].creative_score());
        }
    }

    #[test]
    fn test_risk_bound_filters() {
        let constraints = Constraints {
            max_risk: Some(0.4),
            ..Constraints::default()
        };
        for candidate in generate(&constraints) {
            assert!(candidate.risk <= 0.4);
        }
    }

    #[test]
    fn test_novelty_bound_filters() {
        let constraints = Constraints {
            min_novelty: Some(0.85),
            ..Constraints::default()
        };
        let candidates = generate(&constraints);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "false_telegraph");
    }

    #[test]
    fn test_excluded_families_are_absent() {
        let constraints = Constraints {
            exclude: vec![ArchetypeFamily::Misdirection],
            ..Constraints::default()
        };
        for candidate in generate(&constraints) {
            assert_ne!(candidate.family, ArchetypeFamily::Misdirection);
        }
    }

    #[test]
    fn test_impossible_constraints_yield_nothing() {
        let constraints = Constraints {
            max_risk: Some(0.0),
            ..Constraints::default()
        };
        assert!(generate(&constraints).is_empty());
    }

    #[test]
    fn test_sacrifice_matches_sacrificial_family() {
        let candidate = ARCHETYPES
            .iter()
            .find(|c| c.family == ArchetypeFamily::Sacrificial)
            .unwrap();
        assert!(candidate.matches(&Action::new(ActionKind::Sacrifice)));
        assert!(!candidate.matches(&Action::new(ActionKind::Defend)));
    }
}
