//! Event Selection
//!
//! Picks the day's event. Matching contextual events get a direct shot first;
//! otherwise every categorized event goes into a weighted pool together with
//! the matching contextual events, and one is drawn.

use rand::rngs::SmallRng;

use life_events::{ContentRepository, Event, EventCategory, EventRecord, RELATIONSHIP_KEY};

use crate::config::{DifficultyProfile, EngineConfig};
use crate::random::{chance, pick, weighted_choice};
use crate::state::GameState;
use crate::systems::conditions::conditions_match;
use crate::systems::template::{render, PartnerBinding};

/// Stat key treated as a cost when judging whether a moment is net positive
const STRESS_KEY: &str = "stress";

/// A pool entry before rendering.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    record: &'a EventRecord,
    category: EventCategory,
}

/// Contextual events whose conditions hold today.
pub fn matching_contextual<'a>(
    state: &GameState,
    content: &'a ContentRepository,
    config: &EngineConfig,
) -> Vec<&'a EventRecord> {
    content
        .contextual
        .iter()
        .filter(|record| match &record.conditions {
            Some(conditions) => conditions_match(conditions, state, config.surprises.max_pending),
            None => true,
        })
        .collect()
}

/// Pool weight of a relationship event for `partner_count` partners.
pub fn relationship_weight(partner_count: usize, per_partner: f64) -> f64 {
    if partner_count > 1 {
        (1.0 + per_partner * (partner_count - 1) as f64).round_ties_even()
    } else {
        1.0
    }
}

/// Pool weight of a crisis event under a difficulty profile.
pub fn crisis_weight(copies: f64, profile: &DifficultyProfile) -> f64 {
    (copies * profile.crisis_weight).floor().max(1.0)
}

/// Whether an intimate record may be offered.
fn intimate_allowed(record: &EventRecord, state: &GameState, config: &EngineConfig) -> bool {
    if !state.include_intimate {
        return false;
    }
    let threshold = record
        .min_relationship
        .unwrap_or(config.selection.intimate_threshold);
    state.average_relationship() >= threshold
}

/// Weighted pool of every eligible event.
fn build_pool<'a>(
    state: &GameState,
    content: &'a ContentRepository,
    contextual: &[&'a EventRecord],
    config: &EngineConfig,
) -> Vec<(Candidate<'a>, f64)> {
    let profile = config.profile(state.difficulty);
    let mut pool = Vec::new();

    for category in EventCategory::CATEGORIZED {
        let category = *category;
        let weight = match category {
            EventCategory::RelationshipEvents => relationship_weight(
                state.partner_count(),
                config.selection.relationship_weight_per_partner,
            ),
            c if c.is_crisis() => crisis_weight(1.0, profile),
            _ => 1.0,
        };

        for record in content.events(category) {
            if category == EventCategory::IntimateEvents && !intimate_allowed(record, state, config) {
                continue;
            }
            pool.push((Candidate { record, category }, weight));
        }
    }

    for record in contextual {
        pool.push((
            Candidate {
                record: *record,
                category: EventCategory::Contextual,
            },
            1.0,
        ));
    }

    pool
}

/// Adds a small relationship bonus to net-positive shared moments and turns
/// them into group events.
pub fn augment_shared_moment(event: &mut Event, bonus: i32) {
    if !event.category.is_bonding() || event.effects.contains_key(RELATIONSHIP_KEY) {
        return;
    }
    let net: i32 = event
        .effects
        .iter()
        .map(|(key, value)| if key == STRESS_KEY { -value } else { *value })
        .sum();
    if net > 0 {
        event.effects.insert(RELATIONSHIP_KEY.to_string(), bonus);
        event.group_event = true;
    }
}

/// Draws today's event, or `None` when nothing is eligible.
pub fn select_event(
    state: &GameState,
    content: &ContentRepository,
    config: &EngineConfig,
    rng: &mut SmallRng,
) -> Option<Event> {
    let contextual = matching_contextual(state, content, config);

    if !contextual.is_empty() && chance(rng, config.selection.contextual_fast_path) {
        let record = pick(rng, &contextual)?;
        tracing::debug!(event = %record.id, "Contextual event fast path");
        let event = Event::from_record(record, EventCategory::Contextual);
        return Some(render(&event, state, &PartnerBinding::Auto, rng));
    }

    let pool = build_pool(state, content, &contextual, config);
    tracing::debug!(pool = pool.len(), contextual = contextual.len(), "Built event pool");

    let candidate = weighted_choice(rng, &pool)?;
    let mut event = Event::from_record(candidate.record, candidate.category);
    if candidate.category != EventCategory::Contextual {
        augment_shared_moment(&mut event, config.selection.bonding_relationship_bonus);
    }
    Some(render(&event, state, &PartnerBinding::Auto, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Partner;
    use life_events::fixtures;
    use life_events::DifficultyLevel;
    use rand::SeedableRng;

    fn state(relationships: &[i32]) -> GameState {
        let mut rng = SmallRng::seed_from_u64(12345);
        let mut state = GameState::empty("Jordan", DifficultyLevel::Balanced);
        for (i, value) in relationships.iter().enumerate() {
            let mut partner = Partner::generate(format!("P{}", i), None, &mut rng);
            partner.relationship = *value;
            state.partners.push(partner);
        }
        state
    }

    #[test]
    fn test_relationship_weight_rounds_half_to_even() {
        assert_eq!(relationship_weight(1, 0.5), 1.0);
        // 1.5 rounds to 2, 2.0 stays, 2.5 rounds to 2
        assert_eq!(relationship_weight(2, 0.5), 2.0);
        assert_eq!(relationship_weight(3, 0.5), 2.0);
        assert_eq!(relationship_weight(4, 0.5), 2.0);
        assert_eq!(relationship_weight(5, 0.5), 3.0);
    }

    #[test]
    fn test_crisis_weight_floor() {
        assert_eq!(crisis_weight(1.0, &DifficultyProfile::cozy()), 1.0);
        assert_eq!(crisis_weight(1.0, &DifficultyProfile::dramatic()), 1.0);
        assert_eq!(crisis_weight(1.0, &DifficultyProfile::chaotic()), 2.0);
    }

    #[test]
    fn test_augment_net_positive_bonding_event() {
        let record = EventRecord::new("gs", "Found money")
            .with_effect("happiness", 4)
            .with_effect("stress", -2);
        let mut event = Event::from_record(&record, EventCategory::GoodSurprises);
        augment_shared_moment(&mut event, 1);
        assert_eq!(event.effects[RELATIONSHIP_KEY], 1);
        assert!(event.group_event);
    }

    #[test]
    fn test_augment_skips_existing_relationship_and_other_categories() {
        let record = EventRecord::new("gs", "Tickets")
            .with_effect("happiness", 4)
            .with_effect("relationship", 2);
        let mut event = Event::from_record(&record, EventCategory::GoodSurprises);
        augment_shared_moment(&mut event, 1);
        assert_eq!(event.effects[RELATIONSHIP_KEY], 2);
        assert!(!event.group_event);

        let record = EventRecord::new("c", "Career").with_effect("happiness", 4);
        let mut event = Event::from_record(&record, EventCategory::CareerEvents);
        augment_shared_moment(&mut event, 1);
        assert!(!event.effects.contains_key(RELATIONSHIP_KEY));
    }

    #[test]
    fn test_augment_skips_net_negative() {
        let record = EventRecord::new("m", "Tough milestone")
            .with_effect("happiness", 2)
            .with_effect("stress", 5);
        let mut event = Event::from_record(&record, EventCategory::Milestones);
        augment_shared_moment(&mut event, 1);
        assert!(!event.effects.contains_key(RELATIONSHIP_KEY));
    }

    #[test]
    fn test_intimate_events_gated() {
        let content = fixtures::sample_content();
        let config = EngineConfig::default();
        let mut rng = SmallRng::seed_from_u64(12345);

        let mut low = state(&[55]);
        low.include_intimate = true;
        for _ in 0..500 {
            if let Some(event) = select_event(&low, &content, &config, &mut rng) {
                assert_ne!(event.category, EventCategory::IntimateEvents);
            }
        }

        let mut disabled = state(&[95]);
        disabled.include_intimate = false;
        for _ in 0..500 {
            if let Some(event) = select_event(&disabled, &content, &config, &mut rng) {
                assert_ne!(event.category, EventCategory::IntimateEvents);
            }
        }
    }

    #[test]
    fn test_intimate_events_offered_when_allowed() {
        let content = fixtures::sample_content();
        let config = EngineConfig::default();
        let mut rng = SmallRng::seed_from_u64(12345);

        let mut high = state(&[90]);
        high.include_intimate = true;
        let seen = (0..2000)
            .filter_map(|_| select_event(&high, &content, &config, &mut rng))
            .any(|e| e.category == EventCategory::IntimateEvents);
        assert!(seen);
    }

    #[test]
    fn test_empty_content_selects_nothing() {
        let mut rng = SmallRng::seed_from_u64(1);
        let content = ContentRepository::new();
        assert!(select_event(&state(&[50]), &content, &EngineConfig::default(), &mut rng).is_none());
    }

    #[test]
    fn test_contextual_events_are_personalized() {
        let mut content = ContentRepository::new();
        content.contextual = fixtures::sample_contextual_events();
        let config = EngineConfig::default();
        let mut rng = SmallRng::seed_from_u64(99);

        let mut s = state(&[50, 50]);
        s.weather = life_events::Weather::Rainy;
        for _ in 0..50 {
            let event = select_event(&s, &content, &config, &mut rng).unwrap();
            assert_eq!(event.category, EventCategory::Contextual);
            assert_eq!(event.id, "ctx_rainy_day_in");
            assert!(!event.description.contains("{partner}"));
        }
    }

    #[test]
    fn test_unmatched_contextual_never_drawn() {
        let mut content = ContentRepository::new();
        content.contextual = fixtures::sample_contextual_events();
        let mut rng = SmallRng::seed_from_u64(99);

        let mut s = state(&[50]);
        s.weather = life_events::Weather::Sunny;
        assert!(select_event(&s, &content, &EngineConfig::default(), &mut rng).is_none());
    }
}
