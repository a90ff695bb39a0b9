//! Outcome Resolution
//!
//! Turns an event, a die roll and a chosen response into applied effects.
//!
//! Effects are scaled by the difficulty's effect multiplier and truncated
//! toward zero. Events with a single effect map are then skewed by outcome;
//! events with outcome-specific maps use the matching map as-is.

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use life_events::{
    ContentRepository, EffectMap, Event, EventCategory, HistoryEntry, Stat, RELATIONSHIP_KEY,
};

use crate::config::{DifficultyProfile, EngineConfig, ResolutionConfig};
use crate::random::{chance, pick};
use crate::state::GameState;
use crate::systems::arc::{advance_arc, ArcProgress};
use crate::systems::template::{render, PartnerBinding};

const CASCADE_TITLE_PREFIX: &str = "[CASCADE] ";
const CASCADE_DESCRIPTION_PREFIX: &str = "Things go from bad to worse... ";

/// What happened when an event was resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub event_id: String,
    pub category: EventCategory,
    pub success: bool,
    pub roll: i32,
    pub adjusted_dc: i32,
    /// Response index actually used
    pub response: usize,
    /// Computed deltas for known keys, before clamping
    pub deltas: EffectMap,
    pub involved_partner: Option<String>,
}

/// An outcome plus any follow-up crisis it triggered.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub outcome: Outcome,
    pub arc_progress: Option<ArcProgress>,
    /// Rendered cascade event, to be resolved on its own
    pub cascade: Option<Event>,
}

fn truncate(value: f64) -> i32 {
    value.trunc() as i32
}

fn scale(value: i32, multiplier: f64) -> i32 {
    truncate(value as f64 * multiplier)
}

fn skew(value: i32, success: bool, tuning: &ResolutionConfig) -> i32 {
    if value == 0 {
        return 0;
    }
    let factor = match (success, value > 0) {
        (true, true) => tuning.success_positive_skew,
        (true, false) => tuning.success_negative_skew,
        (false, true) => tuning.failure_positive_skew,
        (false, false) => tuning.failure_negative_skew,
    };
    truncate(value as f64 * factor)
}

/// Effects an event would apply for the given outcome.
pub fn compute_effects(
    event: &Event,
    success: bool,
    profile: &DifficultyProfile,
    tuning: &ResolutionConfig,
) -> EffectMap {
    let multiplier = profile.effect_multiplier;

    if let Some(split) = event.split_effects(success) {
        return split
            .iter()
            .map(|(key, value)| (key.clone(), scale(*value, multiplier)))
            .collect();
    }

    if event.has_split_effects() {
        // Declared split maps but none for this outcome
        return event
            .effects
            .iter()
            .map(|(key, value)| (key.clone(), scale(*value, multiplier)))
            .collect();
    }

    event
        .effects
        .iter()
        .map(|(key, value)| {
            let scaled = scale(*value, multiplier);
            (key.clone(), skew(scaled, success, tuning))
        })
        .collect()
}

fn is_known_key(key: &str) -> bool {
    key == RELATIONSHIP_KEY || key.parse::<Stat>().is_ok()
}

/// Applies an event's outcome to the state without any cascade check.
///
/// Records history, advances the active arc for arc stages and updates the
/// exciting and intimate day markers.
pub fn apply_outcome(
    state: &mut GameState,
    content: &ContentRepository,
    config: &EngineConfig,
    event: &Event,
    roll: i32,
    response: usize,
) -> (Outcome, Option<ArcProgress>) {
    let profile = config.profile(state.difficulty);
    let response = if response < event.responses.len() { response } else { 0 };
    let adjusted_dc = event.roll_requirement + profile.dc_modifier;
    let success = roll >= adjusted_dc;

    let effects = compute_effects(event, success, profile, &config.resolution);
    let mut deltas = EffectMap::new();
    for (key, delta) in &effects {
        if !is_known_key(key) {
            tracing::debug!(event = %event.id, key = %key, "Ignoring unknown effect key");
            continue;
        }
        state.apply_effect(key, *delta, event.involved_partner.as_deref());
        deltas.insert(key.clone(), *delta);
    }

    state.history.push(HistoryEntry {
        day: state.day,
        event_id: event.id.clone(),
        title: event.title.clone(),
        category: event.category,
        roll,
        success,
        response,
        involved_partner: event.involved_partner.clone(),
    });

    let arc_progress = match (&event.arc, event.category) {
        (Some(stage_ref), EventCategory::StoryArc) => {
            Some(advance_arc(state, content, stage_ref, success))
        }
        _ => None,
    };

    if event.category.is_exciting() {
        state.last_exciting_day = state.day;
    }
    if event.category == EventCategory::IntimateEvents {
        state.last_intimate_day = state.day;
    }

    tracing::debug!(
        event = %event.id,
        roll,
        adjusted_dc,
        success,
        "Resolved event"
    );

    let outcome = Outcome {
        event_id: event.id.clone(),
        category: event.category,
        success,
        roll,
        adjusted_dc,
        response,
        deltas,
        involved_partner: event.involved_partner.clone(),
    };
    (outcome, arc_progress)
}

/// Resolves a primary event. A failure on a harsh difficulty may produce a
/// cascade event; cascades and partner actions never cascade.
pub fn resolve_event(
    state: &mut GameState,
    content: &ContentRepository,
    config: &EngineConfig,
    event: &Event,
    roll: i32,
    response: usize,
    rng: &mut SmallRng,
) -> Resolution {
    let (outcome, arc_progress) = apply_outcome(state, content, config, event, roll, response);

    let can_cascade = !matches!(
        event.category,
        EventCategory::CrisisCascade | EventCategory::PartnerAction
    );
    let cascade = if !outcome.success && can_cascade {
        maybe_cascade(state, content, config, rng)
    } else {
        None
    };

    Resolution {
        outcome,
        arc_progress,
        cascade,
    }
}

/// Rolls for a crisis cascade after a failure.
pub fn maybe_cascade(
    state: &GameState,
    content: &ContentRepository,
    config: &EngineConfig,
    rng: &mut SmallRng,
) -> Option<Event> {
    let crisis_weight = config.profile(state.difficulty).crisis_weight;
    if crisis_weight <= 1.0 {
        return None;
    }
    if !chance(rng, config.resolution.cascade_base_chance * (crisis_weight - 1.0)) {
        return None;
    }

    let sources: Vec<_> = EventCategory::CATEGORIZED
        .iter()
        .filter(|c| c.is_cascade_source())
        .flat_map(|c| content.events(*c))
        .collect();
    let record = *pick(rng, &sources)?;

    let mut event = Event::from_record(record, EventCategory::CrisisCascade);
    event.title = format!("{}{}", CASCADE_TITLE_PREFIX, event.title);
    event.description = format!("{}{}", CASCADE_DESCRIPTION_PREFIX, event.description);

    tracing::info!(event = %record.id, day = state.day, "Crisis cascade");
    Some(render(&event, state, &PartnerBinding::Auto, rng))
}
