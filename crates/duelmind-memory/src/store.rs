use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, TimeDelta, Utc};

use duelmind_core::{ActionKind, GameContext};
use duelmind_stats::blend::ewma;

use crate::{
    query::{
        Insight, MemoryQuery, RecallResult, Recommendation, RecommendationKind, Warning,
    },
    record::MemoryRecord,
};

/// Short-term tier capacity; overflow triggers consolidation.
pub const SHORT_TERM_CAP: usize = 20;
/// Episodic tier capacity; overflow drops the oldest entry.
pub const EPISODIC_CAP: usize = 100;

/// Recall count above which a short-term entry consolidates regardless
/// of importance.
const ACCESS_CONSOLIDATION_THRESHOLD: u32 = 5;
/// Board-control tolerance for context matching during recall.
const CONTEXT_TOLERANCE: f32 = 0.2;
/// Pairwise similarity above which two matches group into one insight.
const GROUPING_THRESHOLD: f32 = 0.7;

/// Semantic concept names the store tracks.
pub const CONCEPT_AGGRESSION: &str = "aggression_effectiveness";
pub const CONCEPT_RESOURCES: &str = "resource_efficiency";
pub const CONCEPT_TIMING: &str = "timing_importance";

#[derive(Debug, Clone)]
struct TimedMemory {
    record: MemoryRecord,
    importance: f32,
    stored_at: DateTime<Utc>,
    access_count: u32,
}

/// A long-term entry: one canonical situation plus how often it has
/// recurred.
#[derive(Debug, Clone)]
pub struct ConsolidatedMemory {
    pub record: MemoryRecord,
    pub importance: f32,
    pub stored_at: DateTime<Utc>,
    pub reinforcement: u32,
    pub last_access: DateTime<Utc>,
}

/// General knowledge about one game concept, blended incrementally.
#[derive(Debug, Clone, Copy)]
pub struct Concept {
    pub strength: f32,
    pub confidence: f32,
    pub last_update: DateTime<Utc>,
}

/// Knowledge about how well one action family works, blended
/// incrementally.
#[derive(Debug, Clone, Copy)]
pub struct Skill {
    pub success_rate: f32,
    pub usage_count: u32,
    pub last_used: DateTime<Utc>,
}

/// Per-tier sizes for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    pub short_term: usize,
    pub long_term: usize,
    pub episodic: usize,
    pub semantic: usize,
    pub procedural: usize,
}

/// The five memory tiers of one engine instance.
///
/// See the crate docs for tier semantics. All mutation goes through
/// `&mut self`, so a multi-threaded host needs a single writer by
/// construction.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    short_term: Vec<TimedMemory>,
    long_term: HashMap<String, ConsolidatedMemory>,
    episodic: VecDeque<TimedMemory>,
    semantic: HashMap<&'static str, Concept>,
    procedural: HashMap<ActionKind, Skill>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one moment in every applicable tier.
    ///
    /// Short-term overflow triggers [`consolidate`](Self::consolidate);
    /// episodic overflow drops the oldest entry; semantic and procedural
    /// knowledge is blended 90/10 toward the new sample.
    pub fn store(&mut self, record: MemoryRecord, now: DateTime<Utc>) {
        let importance = record.importance();
        self.short_term.push(TimedMemory {
            record,
            importance,
            stored_at: now,
            access_count: 0,
        });
        if self.short_term.len() > SHORT_TERM_CAP {
            self.consolidate(now);
        }

        self.episodic.push_back(TimedMemory {
            record,
            importance,
            stored_at: now,
            access_count: 0,
        });
        if self.episodic.len() > EPISODIC_CAP {
            self.episodic.pop_front();
        }

        self.update_semantic(&record, now);
        self.update_procedural(&record, now);
    }

    /// Migrates qualifying short-term entries to long-term storage.
    ///
    /// An entry qualifies with importance > 0.7 or with an access count
    /// above the consolidation threshold. Qualifying entries merge into
    /// long-term under their canonical signature, incrementing
    /// reinforcement when the signature already exists. If nothing
    /// qualifies while the tier is over capacity, the least important
    /// entries are dropped instead.
    pub fn consolidate(&mut self, now: DateTime<Utc>) {
        let (promote, keep): (Vec<_>, Vec<_>) =
            self.short_term.drain(..).partition(|memory| {
                memory.importance > 0.7
                    || memory.access_count > ACCESS_CONSOLIDATION_THRESHOLD
            });

        for memory in promote {
            self.long_term
                .entry(memory.record.signature())
                .and_modify(|existing| {
                    existing.reinforcement += 1;
                    existing.last_access = now;
                })
                .or_insert(ConsolidatedMemory {
                    record: memory.record,
                    importance: memory.importance,
                    stored_at: memory.stored_at,
                    reinforcement: 1,
                    last_access: now,
                });
        }

        self.short_term = keep;
        while self.short_term.len() > SHORT_TERM_CAP {
            let least = self
                .short_term
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| a.importance.total_cmp(&b.importance))
                .map(|(i, _)| i)
                .expect("tier is non-empty while over capacity");
            self.short_term.remove(least);
        }
    }

    /// Searches every tier and synthesizes the matches.
    ///
    /// Matched short-term entries have their access count bumped, which
    /// feeds the consolidation criterion.
    pub fn recall(&mut self, query: &MemoryQuery, now: DateTime<Utc>) -> RecallResult {
        let mut matches = Vec::new();

        for memory in &mut self.short_term {
            if matches_query(&memory.record, memory.importance, memory.stored_at, query, now) {
                memory.access_count += 1;
                matches.push(Match {
                    relevance: relevance(memory.importance, memory.stored_at, 0, query, &memory.record.context, now),
                    outcome: Some(memory.record.outcome),
                    context: Some(memory.record.context),
                    action: Some(memory.record.action),
                    stored_at: memory.stored_at,
                });
            }
        }

        for memory in self.long_term.values() {
            if matches_query(&memory.record, memory.importance, memory.stored_at, query, now) {
                matches.push(Match {
                    relevance: relevance(
                        memory.importance,
                        memory.stored_at,
                        memory.reinforcement,
                        query,
                        &memory.record.context,
                        now,
                    ),
                    outcome: Some(memory.record.outcome),
                    context: Some(memory.record.context),
                    action: Some(memory.record.action),
                    stored_at: memory.stored_at,
                });
            }
        }

        for memory in &self.episodic {
            if matches_query(&memory.record, memory.importance, memory.stored_at, query, now) {
                matches.push(Match {
                    relevance: relevance(memory.importance, memory.stored_at, 0, query, &memory.record.context, now),
                    outcome: Some(memory.record.outcome),
                    context: Some(memory.record.context),
                    action: Some(memory.record.action),
                    stored_at: memory.stored_at,
                });
            }
        }

        for name in &query.concepts {
            if let Some(concept) = self.semantic.get(name) {
                matches.push(Match {
                    relevance: concept.strength * concept.confidence,
                    outcome: None,
                    context: None,
                    action: None,
                    stored_at: concept.last_update,
                });
            }
        }

        if let Some(kind) = query.skill {
            if let Some(skill) = self.procedural.get(&kind) {
                #[expect(clippy::cast_precision_loss)]
                let usage_bonus = (skill.usage_count as f32 + 1.0).ln();
                matches.push(Match {
                    relevance: skill.success_rate * usage_bonus,
                    outcome: Some(skill.success_rate),
                    context: None,
                    action: Some(kind),
                    stored_at: skill.last_used,
                });
            }
        }

        synthesize(&matches, now)
    }

    /// Long-term entry for a canonical signature, if one exists.
    #[must_use]
    pub fn consolidated(&self, signature: &str) -> Option<&ConsolidatedMemory> {
        self.long_term.get(signature)
    }

    #[must_use]
    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            short_term: self.short_term.len(),
            long_term: self.long_term.len(),
            episodic: self.episodic.len(),
            semantic: self.semantic.len(),
            procedural: self.procedural.len(),
        }
    }

    fn update_semantic(&mut self, record: &MemoryRecord, now: DateTime<Utc>) {
        for (name, value) in extract_concepts(record) {
            self.semantic
                .entry(name)
                .and_modify(|concept| {
                    concept.strength = ewma(concept.strength, value, 0.1);
                    concept.confidence = (concept.confidence + 0.05).min(1.0);
                    concept.last_update = now;
                })
                .or_insert(Concept {
                    strength: value,
                    confidence: 0.5,
                    last_update: now,
                });
        }
    }

    fn update_procedural(&mut self, record: &MemoryRecord, now: DateTime<Utc>) {
        self.procedural
            .entry(record.action)
            .and_modify(|skill| {
                skill.success_rate = ewma(skill.success_rate, record.outcome, 0.1);
                skill.usage_count += 1;
                skill.last_used = now;
            })
            .or_insert(Skill {
                success_rate: record.outcome,
                usage_count: 1,
                last_used: now,
            });
    }
}

/// What game concepts a record teaches, if any.
fn extract_concepts(record: &MemoryRecord) -> Vec<(&'static str, f32)> {
    let mut concepts = Vec::new();
    match record.action {
        ActionKind::Attack | ActionKind::Sacrifice if record.outcome > 0.7 => {
            concepts.push((CONCEPT_AGGRESSION, record.outcome));
        }
        ActionKind::ResourceShift => {
            concepts.push((CONCEPT_RESOURCES, record.outcome));
        }
        ActionKind::Combo | ActionKind::ActivateAbility if record.outcome > 0.7 => {
            concepts.push((CONCEPT_TIMING, record.outcome));
        }
        _ => {}
    }
    concepts
}

fn matches_query(
    record: &MemoryRecord,
    importance: f32,
    stored_at: DateTime<Utc>,
    query: &MemoryQuery,
    now: DateTime<Utc>,
) -> bool {
    if let Some(kind) = query.kind {
        if record.kind != kind {
            return false;
        }
    }
    if let Some(context) = &query.context {
        if !record.context.matches(context, CONTEXT_TOLERANCE) {
            return false;
        }
    }
    if let Some(min_importance) = query.min_importance {
        if importance < min_importance {
            return false;
        }
    }
    if let Some(max_age) = query.max_age {
        if now - stored_at > max_age {
            return false;
        }
    }
    true
}

/// Unified relevance score: importance baseline, recency decay over
/// about a day, logarithmic reinforcement bonus (long-term only), and a
/// context-similarity bonus against the query context. Capped at 1.0.
fn relevance(
    importance: f32,
    stored_at: DateTime<Utc>,
    reinforcement: u32,
    query: &MemoryQuery,
    context: &GameContext,
    now: DateTime<Utc>,
) -> f32 {
    let mut relevance = importance;

    let age_seconds = (now - stored_at).num_seconds().max(0);
    #[expect(clippy::cast_precision_loss)]
    let recency = (-(age_seconds as f32) / 86_400.0).exp();
    relevance += recency * 0.2;

    if reinforcement > 0 {
        #[expect(clippy::cast_precision_loss)]
        let bonus = (reinforcement as f32 + 1.0).ln() * 0.1;
        relevance += bonus;
    }

    if let Some(query_context) = &query.context {
        relevance += context.similarity(query_context) * 0.3;
    }

    relevance.min(1.0)
}

#[derive(Debug, Clone, Copy)]
struct Match {
    relevance: f32,
    outcome: Option<f32>,
    context: Option<GameContext>,
    action: Option<ActionKind>,
    stored_at: DateTime<Utc>,
}

#[expect(clippy::cast_precision_loss)]
fn synthesize(matches: &[Match], now: DateTime<Utc>) -> RecallResult {
    if matches.is_empty() {
        return RecallResult::default();
    }

    let confidence =
        matches.iter().map(|m| m.relevance).sum::<f32>() / matches.len() as f32;

    let mut recommendations = Vec::new();
    let successes = matches
        .iter()
        .filter(|m| m.outcome.is_some_and(|outcome| outcome > 0.7))
        .count();
    if successes > 0 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::RepeatSuccess,
            confidence: 0.8,
            support: successes,
        });
    }
    let failures = matches
        .iter()
        .filter(|m| m.outcome.is_some_and(|outcome| outcome < 0.3))
        .count();
    if failures > 0 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::AvoidFailure,
            confidence: 0.7,
            support: failures,
        });
    }

    let insights = group_insights(matches);

    let mut warnings = Vec::new();
    let recent_failures = matches
        .iter()
        .filter(|m| {
            m.outcome.is_some_and(|outcome| outcome < 0.4)
                && now - m.stored_at < TimeDelta::minutes(10)
        })
        .count();
    if recent_failures > 2 {
        warnings.push(Warning::RepeatedFailure { recent_failures });
    }

    RecallResult {
        confidence,
        recommendations,
        insights,
        warnings,
    }
}

/// Groups matches by pairwise similarity; groups of three or more become
/// insights.
#[expect(clippy::cast_precision_loss)]
fn group_insights(matches: &[Match]) -> Vec<Insight> {
    let mut insights = Vec::new();
    let mut used = vec![false; matches.len()];

    for i in 0..matches.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let mut group = vec![matches[i]];
        for j in (i + 1)..matches.len() {
            if !used[j] && match_similarity(&matches[i], &matches[j]) > GROUPING_THRESHOLD {
                used[j] = true;
                group.push(matches[j]);
            }
        }
        if group.len() > 2 {
            let mean_outcome = group
                .iter()
                .map(|m| m.outcome.unwrap_or(0.5))
                .sum::<f32>()
                / group.len() as f32;
            insights.push(Insight {
                members: group.len(),
                mean_outcome,
                confidence: (group.len() as f32 / 5.0).min(1.0),
            });
        }
    }

    insights
}

/// Similarity of two matches: action equality, context similarity, and
/// outcome closeness, averaged over the factors both sides carry.
fn match_similarity(a: &Match, b: &Match) -> f32 {
    let mut similarity = 0.0;
    let mut factors = 0.0;

    if let (Some(action_a), Some(action_b)) = (a.action, b.action) {
        similarity += if action_a == action_b { 1.0 } else { 0.0 };
        factors += 1.0;
    }
    if let (Some(context_a), Some(context_b)) = (&a.context, &b.context) {
        similarity += context_a.similarity(context_b);
        factors += 1.0;
    }
    if let (Some(outcome_a), Some(outcome_b)) = (a.outcome, b.outcome) {
        similarity += (1.0 - (outcome_a - outcome_b).abs() * 2.0).max(0.0);
        factors += 1.0;
    }

    if factors > 0.0 { similarity / factors } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use duelmind_core::GameContext;

    use super::*;
    use crate::record::MemoryKind;

    fn record(outcome: f32) -> MemoryRecord {
        MemoryRecord {
            kind: MemoryKind::Decision,
            action: ActionKind::Attack,
            context: GameContext::default(),
            outcome,
            emotional_impact: 0.0,
            strategic_significance: 0.0,
            novelty: 0.0,
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_tier_caps_hold_under_load() {
        let mut store = MemoryStore::new();
        for i in 0..500 {
            let outcome = if i % 10 == 0 { 0.9 } else { 0.5 };
            store.store(record(outcome), now());
        }
        let stats = store.stats();
        assert!(stats.short_term <= SHORT_TERM_CAP, "short-term overflowed: {}", stats.short_term);
        assert!(stats.episodic <= EPISODIC_CAP, "episodic overflowed: {}", stats.episodic);
    }

    #[test]
    fn test_repeated_signature_consolidates_once() {
        let mut store = MemoryStore::new();
        let repeated = record(0.9);
        for _ in 0..6 {
            store.store(repeated, now());
        }
        store.consolidate(now());

        let entry = store.consolidated(&repeated.signature()).unwrap();
        assert!(entry.reinforcement >= 1);
        assert_eq!(store.stats().long_term, 1);
        assert_eq!(store.stats().short_term, 0);
    }

    #[test]
    fn test_low_importance_entries_survive_consolidation_in_short_term() {
        let mut store = MemoryStore::new();
        store.store(record(0.5), now());
        store.consolidate(now());
        assert_eq!(store.stats().short_term, 1);
        assert_eq!(store.stats().long_term, 0);
    }

    #[test]
    fn test_recall_recommends_repeating_success() {
        let mut store = MemoryStore::new();
        store.store(record(0.9), now());
        let result = store.recall(&MemoryQuery::default(), now());
        assert!(result.confidence > 0.0);
        assert!(result.recommendations.iter().any(|recommendation| {
            recommendation.kind == RecommendationKind::RepeatSuccess
        }));
    }

    #[test]
    fn test_recall_warns_about_recent_failures() {
        let mut store = MemoryStore::new();
        for _ in 0..3 {
            store.store(record(0.1), now());
        }
        let result = store.recall(&MemoryQuery::default(), now());
        assert!(matches!(
            result.warnings.first(),
            Some(Warning::RepeatedFailure { .. })
        ));
    }

    #[test]
    fn test_old_failures_do_not_warn() {
        let mut store = MemoryStore::new();
        for _ in 0..3 {
            store.store(record(0.1), now());
        }
        let later = now() + TimeDelta::minutes(30);
        let result = store.recall(&MemoryQuery::default(), later);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_recall_empty_store_is_silent() {
        let mut store = MemoryStore::new();
        let result = store.recall(&MemoryQuery::default(), now());
        assert_eq!(result, RecallResult::default());
    }

    #[test]
    fn test_min_importance_filters_matches() {
        let mut store = MemoryStore::new();
        store.store(record(0.5), now());
        let query = MemoryQuery {
            min_importance: Some(0.9),
            ..MemoryQuery::default()
        };
        // The only stored record has baseline importance 0.5, so only
        // the procedural/semantic tiers could match, and the query names
        // neither.
        let result = store.recall(&query, now());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_procedural_tier_tracks_usage() {
        let mut store = MemoryStore::new();
        for _ in 0..4 {
            store.store(record(0.6), now());
        }
        let query = MemoryQuery {
            skill: Some(ActionKind::Attack),
            min_importance: Some(2.0), // exclude the timed tiers
            ..MemoryQuery::default()
        };
        let result = store.recall(&query, now());
        assert!(result.confidence > 0.0);
    }

    #[test]
    fn test_semantic_concepts_blend() {
        let mut store = MemoryStore::new();
        store.store(record(0.9), now());
        store.store(record(0.8), now());
        let query = MemoryQuery {
            concepts: vec![CONCEPT_AGGRESSION],
            min_importance: Some(2.0),
            skill: None,
            ..MemoryQuery::default()
        };
        let result = store.recall(&query, now());
        assert!(result.confidence > 0.0);
        assert_eq!(store.stats().semantic, 1);
    }
}
