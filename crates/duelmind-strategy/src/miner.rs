//! Pattern mining over recent turn history.
//!
//! # How It Works
//!
//! 1. **Window Analysis** - a 3-turn window slides across the session
//!    history; each window's effectiveness is its mean outcome plus a
//!    consistency bonus (`max(0, 0.2 - variance)`).
//! 2. **Consolidation** - windows collapse onto canonical signatures
//!    (classified move/context pairs plus the effectiveness decile);
//!    duplicates merge by summing frequency and averaging effectiveness.
//!    Only patterns seen more than once survive.
//! 3. **Discovery** - a surviving pattern becomes a new [`Strategy`]
//!    when its signature is unregistered and its effectiveness exceeds
//!    the discovery threshold (0.6).
//! 4. **Evolution** - strategies that keep recurring accumulate
//!    mutations (timing shifts, an efficiency variant, hybrids of two
//!    strategies); mutations scoring above 0.6 are recorded as
//!    adaptations and can raise the strategy's effectiveness.
//!
//! Re-mining an already-registered signature counts as one usage of that
//! strategy, which is what eventually makes it eligible for evolution.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand_distr::Normal;
use serde::Serialize;

use duelmind_core::{ActionKind, ContextClass, GameContext};
use duelmind_stats::descriptive::OutcomeStats;

/// Sliding window length in turns.
pub const PATTERN_WINDOW: usize = 3;
/// A consolidated pattern must beat this to become a strategy.
pub const DISCOVERY_THRESHOLD: f32 = 0.6;
/// Usages required before a strategy is mutated.
const EVOLUTION_USAGE_THRESHOLD: u32 = 5;
/// Mutations scoring above this survive as adaptations.
const ADAPTATION_THRESHOLD: f32 = 0.6;

/// One completed turn as the miner sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnRecord {
    pub action: ActionKind,
    pub context: GameContext,
    pub outcome: f32,
}

/// One move inside a mined pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternMove {
    pub action: ActionKind,
    pub context: GameContext,
}

/// A repeated action sequence with its observed effectiveness.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub moves: Vec<PatternMove>,
    /// How many windows collapsed onto this signature.
    pub frequency: u32,
    pub effectiveness: f32,
}

impl Pattern {
    fn from_window(window: &[TurnRecord]) -> Self {
        let moves = window
            .iter()
            .map(|turn| PatternMove {
                action: turn.action,
                context: turn.context,
            })
            .collect();
        let effectiveness = window_effectiveness(window);
        Self {
            moves,
            frequency: 1,
            effectiveness,
        }
    }

    /// Canonical signature: classified move/context pairs plus the
    /// effectiveness decile. Nearby patterns collapse onto one key.
    #[must_use]
    pub fn signature(&self) -> String {
        #[derive(Serialize)]
        struct MoveKey {
            action: ActionKind,
            context: ContextClass,
        }

        #[derive(Serialize)]
        struct SignatureKey {
            moves: Vec<MoveKey>,
            effectiveness_decile: i32,
        }

        #[expect(clippy::cast_possible_truncation)]
        let effectiveness_decile = (self.effectiveness * 10.0).round() as i32;
        let key = SignatureKey {
            moves: self
                .moves
                .iter()
                .map(|m| MoveKey {
                    action: m.action,
                    context: m.context.classify(),
                })
                .collect(),
            effectiveness_decile,
        };
        serde_json::to_string(&key).expect("signature key serialization cannot fail")
    }

    /// Structural complexity in `[0.0, 1.0]`: sequence length, context
    /// breadth, and action variety.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn complexity(&self) -> f32 {
        let unique_actions = self
            .moves
            .iter()
            .map(|m| m.action)
            .collect::<HashSet<_>>()
            .len();
        let length = self.moves.len() as f32 * 0.2;
        let context_breadth = 0.4;
        let variety = unique_actions as f32 * 0.3;
        (length + context_breadth + variety).min(1.0)
    }

    /// Situational requirements inferred from the pattern's contexts.
    #[must_use]
    pub fn prerequisites(&self) -> Vec<Prerequisite> {
        let mut prerequisites = Vec::new();
        for m in &self.moves {
            if m.context.resource_advantage > 0.6 {
                prerequisites.push(Prerequisite::ResourceAdvantage);
            }
            if m.context.board_control > 0.6 {
                prerequisites.push(Prerequisite::BoardControl);
            }
            if m.context.phase.is_late() {
                prerequisites.push(Prerequisite::LateGame);
            }
        }
        prerequisites.sort_unstable();
        prerequisites.dedup();
        prerequisites
    }
}

/// What a pattern needs before it applies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, derive_more::Display,
)]
pub enum Prerequisite {
    #[display("resource_advantage")]
    ResourceAdvantage,
    #[display("board_control")]
    BoardControl,
    #[display("late_game")]
    LateGame,
}

/// A fixed tweak of a pattern generated at discovery time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variation {
    pub name: &'static str,
    pub modifier: f32,
}

fn standard_variations() -> Vec<Variation> {
    vec![
        Variation { name: "low_resource", modifier: 0.7 },
        Variation { name: "high_resource", modifier: 1.3 },
        Variation { name: "aggressive_timing", modifier: 1.5 },
        Variation { name: "patient_timing", modifier: 0.7 },
    ]
}

/// A mutation family tried during evolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MutationKind {
    #[display("timing_early")]
    TimingEarly,
    #[display("timing_late")]
    TimingLate,
    #[display("efficiency")]
    Efficiency,
    #[display("hybrid")]
    Hybrid,
}

/// A mutation that scored well enough to keep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adaptation {
    pub kind: MutationKind,
    pub effectiveness: f32,
}

/// A registered, evolving strategy.
#[derive(Debug, Clone)]
pub struct Strategy {
    pub signature: String,
    pub pattern: Pattern,
    pub complexity: f32,
    pub prerequisites: Vec<Prerequisite>,
    pub variations: Vec<Variation>,
    pub discovered_at: DateTime<Utc>,
    pub effectiveness: f32,
    /// Times this pattern has recurred in mined history since discovery.
    pub usage_count: u32,
    pub adaptations: Vec<Adaptation>,
}

/// Mines, registers, and evolves strategies for one engine instance.
#[derive(Debug, Clone, Default)]
pub struct StrategyMiner {
    registry: HashSet<String>,
    strategies: Vec<Strategy>,
}

impl StrategyMiner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Slides the pattern window over `history` and consolidates the
    /// results. Only patterns observed more than once survive.
    #[must_use]
    pub fn analyze_patterns(history: &[TurnRecord]) -> Vec<Pattern> {
        let mut consolidated: Vec<Pattern> = Vec::new();
        let mut signatures: Vec<String> = Vec::new();

        for window in history.windows(PATTERN_WINDOW) {
            let pattern = Pattern::from_window(window);
            let signature = pattern.signature();
            if let Some(position) = signatures.iter().position(|s| *s == signature) {
                let existing = &mut consolidated[position];
                existing.frequency += 1;
                existing.effectiveness = (existing.effectiveness + pattern.effectiveness) / 2.0;
            } else {
                signatures.push(signature);
                consolidated.push(pattern);
            }
        }

        consolidated.retain(|pattern| pattern.frequency > 1);
        consolidated
    }

    /// Mines `history` and registers every novel, effective pattern as a
    /// strategy. Patterns that hit an already-registered signature count
    /// as one usage of that strategy. Returns the number of strategies
    /// discovered.
    pub fn discover(&mut self, history: &[TurnRecord], now: DateTime<Utc>) -> usize {
        let mut discovered = 0;
        for pattern in Self::analyze_patterns(history) {
            let signature = pattern.signature();
            if self.registry.contains(&signature) {
                if let Some(strategy) = self
                    .strategies
                    .iter_mut()
                    .find(|strategy| strategy.signature == signature)
                {
                    strategy.usage_count += 1;
                }
                continue;
            }
            if pattern.effectiveness <= DISCOVERY_THRESHOLD {
                continue;
            }

            self.registry.insert(signature.clone());
            self.strategies.push(Strategy {
                complexity: pattern.complexity(),
                prerequisites: pattern.prerequisites(),
                variations: standard_variations(),
                discovered_at: now,
                effectiveness: pattern.effectiveness,
                usage_count: 0,
                adaptations: Vec::new(),
                signature,
                pattern,
            });
            discovered += 1;
        }
        discovered
    }

    /// Mutates well-used strategies and keeps the mutations that score
    /// above the adaptation threshold.
    ///
    /// Heuristic scores start from a 0.5 baseline: efficiency mutations
    /// get +0.1, timing mutations get Gaussian jitter (σ 0.1), hybrids
    /// get a uniform bonus in `[0, 0.3)`. A kept adaptation can raise
    /// the strategy's effectiveness.
    pub fn evolve<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let jitter = Normal::new(0.0f32, 0.1).expect("valid standard deviation");
        let strategy_count = self.strategies.len();

        for strategy in &mut self.strategies {
            if strategy.usage_count <= EVOLUTION_USAGE_THRESHOLD {
                continue;
            }

            let mut kinds = vec![
                MutationKind::TimingEarly,
                MutationKind::TimingLate,
                MutationKind::Efficiency,
            ];
            if strategy_count > 1 {
                kinds.push(MutationKind::Hybrid);
            }

            for kind in kinds {
                let score = match kind {
                    MutationKind::Efficiency => 0.6,
                    MutationKind::TimingEarly | MutationKind::TimingLate => {
                        0.5 + rng.sample(jitter)
                    }
                    MutationKind::Hybrid => 0.5 + rng.random_range(0.0..0.3),
                };
                if score > ADAPTATION_THRESHOLD {
                    strategy.adaptations.push(Adaptation {
                        kind,
                        effectiveness: score,
                    });
                    strategy.effectiveness = strategy.effectiveness.max(score);
                }
            }
        }
    }
}

/// Mean outcome plus a consistency bonus, capped at 1.0.
fn window_effectiveness(window: &[TurnRecord]) -> f32 {
    let Some(stats) = OutcomeStats::new(window.iter().map(|turn| turn.outcome)) else {
        return 0.5;
    };
    (stats.mean + stats.consistency_bonus(0.2)).min(1.0)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn turn(action: ActionKind, outcome: f32) -> TurnRecord {
        TurnRecord {
            action,
            context: GameContext::default(),
            outcome,
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    /// A history where the same successful 3-turn loop repeats.
    fn winning_loop(repeats: usize) -> Vec<TurnRecord> {
        let mut history = Vec::new();
        for _ in 0..repeats {
            history.push(turn(ActionKind::PlayCard, 0.8));
            history.push(turn(ActionKind::Attack, 0.8));
            history.push(turn(ActionKind::Defend, 0.8));
        }
        history
    }

    #[test]
    fn test_short_history_yields_nothing() {
        assert!(StrategyMiner::analyze_patterns(&winning_loop(1)[..2]).is_empty());
    }

    #[test]
    fn test_single_occurrence_patterns_are_dropped() {
        let history = vec![
            turn(ActionKind::PlayCard, 0.9),
            turn(ActionKind::Attack, 0.1),
            turn(ActionKind::Defend, 0.9),
            turn(ActionKind::Counter, 0.1),
        ];
        assert!(StrategyMiner::analyze_patterns(&history).is_empty());
    }

    #[test]
    fn test_repeating_window_consolidates() {
        let patterns = StrategyMiner::analyze_patterns(&winning_loop(4));
        assert!(!patterns.is_empty());
        assert!(patterns.iter().any(|pattern| pattern.frequency > 1));
    }

    #[test]
    fn test_effective_patterns_become_strategies() {
        let mut miner = StrategyMiner::new();
        let discovered = miner.discover(&winning_loop(4), now());
        assert!(discovered > 0);
        assert_eq!(miner.strategies().len(), discovered);
    }

    #[test]
    fn test_rediscovery_counts_usage_not_duplicates() {
        let mut miner = StrategyMiner::new();
        let history = winning_loop(4);
        let first = miner.discover(&history, now());
        let second = miner.discover(&history, now());
        assert_eq!(second, 0);
        assert_eq!(miner.strategies().len(), first);
        assert!(miner.strategies().iter().any(|s| s.usage_count > 0));
    }

    #[test]
    fn test_ineffective_patterns_are_not_registered() {
        let mut miner = StrategyMiner::new();
        let mut history = Vec::new();
        for _ in 0..4 {
            history.push(turn(ActionKind::PlayCard, 0.2));
            history.push(turn(ActionKind::Attack, 0.2));
            history.push(turn(ActionKind::Defend, 0.2));
        }
        assert_eq!(miner.discover(&history, now()), 0);
    }

    #[test]
    fn test_consistency_bonus_rewards_stable_outcomes() {
        let stable = window_effectiveness(&winning_loop(1));
        let erratic = window_effectiveness(&[
            turn(ActionKind::PlayCard, 0.2),
            turn(ActionKind::Attack, 1.0),
            turn(ActionKind::Defend, 0.2),
        ]);
        assert!(stable > 0.8);
        assert!(erratic < stable);
    }

    #[test]
    fn test_prerequisites_inferred_from_context() {
        let context = GameContext {
            board_control: 0.8,
            resource_advantage: 0.7,
            ..GameContext::default()
        };
        let pattern = Pattern {
            moves: vec![PatternMove {
                action: ActionKind::Attack,
                context,
            }],
            frequency: 2,
            effectiveness: 0.8,
        };
        let prerequisites = pattern.prerequisites();
        assert!(prerequisites.contains(&Prerequisite::ResourceAdvantage));
        assert!(prerequisites.contains(&Prerequisite::BoardControl));
        assert!(!prerequisites.contains(&Prerequisite::LateGame));
    }

    #[test]
    fn test_evolution_needs_usage() {
        let mut miner = StrategyMiner::new();
        miner.discover(&winning_loop(4), now());
        miner.evolve(&mut Pcg32::from_seed([3; 16]));
        assert!(miner.strategies().iter().all(|s| s.adaptations.is_empty()));
    }

    #[test]
    fn test_evolution_adapts_well_used_strategies() {
        let mut miner = StrategyMiner::new();
        let history = winning_loop(4);
        miner.discover(&history, now());
        for _ in 0..10 {
            miner.discover(&history, now());
        }
        let mut rng = Pcg32::from_seed([3; 16]);
        for _ in 0..50 {
            miner.evolve(&mut rng);
        }
        let strategy = &miner.strategies()[0];
        assert!(
            !strategy.adaptations.is_empty(),
            "no adaptation survived 50 evolution rounds"
        );
        for adaptation in &strategy.adaptations {
            assert!(adaptation.effectiveness > ADAPTATION_THRESHOLD);
        }
    }
}
