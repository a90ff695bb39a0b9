//! Special-Condition Events
//!
//! Rare built-in events that only become possible when the relationship
//! reaches an extreme or a milestone day arrives. They take priority over
//! the regular draw but only fire part of the time.

use rand::rngs::SmallRng;

use life_events::{EffectMap, Event, EventCategory, EventRecord};

use crate::config::{EngineConfig, SpecialConfig};
use crate::random::{chance, pick};
use crate::state::GameState;
use crate::systems::template::{render, PartnerBinding};

fn effects(entries: &[(&str, i32)]) -> EffectMap {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn deep_bond() -> EventRecord {
    EventRecord::new("special_deep_bond", "[RARE] Perfect Harmony")
        .with_description(
            "There's a moment when you realize just how far you've come together. \
             The connection between you and {partner} feels unshakeable, like you've \
             built something truly special.",
        )
        .with_roll_requirement(8)
        .with_responses([
            "Express how much they mean to you",
            "Plan something special to celebrate",
            "Simply be present in the moment",
        ])
        .with_effect("relationship", 5)
        .with_effect("happiness", 5)
        .with_effect("stress", -3)
}

fn breaking_point() -> EventRecord {
    EventRecord::new("special_crisis_point", "[RARE] Breaking Point")
        .with_description(
            "The distance between you and {partner} has grown into a chasm. \
             Something has to change, or this might be the end.",
        )
        .with_roll_requirement(16)
        .with_responses([
            "Have the conversation you've been avoiding",
            "Write them a letter from the heart",
            "Suggest a reset - start fresh",
        ])
        .with_effect("relationship", -3)
        .with_effect("stress", 5)
        .with_split_effects(
            effects(&[("relationship", 8), ("stress", -4), ("personal_growth", 3)]),
            effects(&[("relationship", -8), ("stress", 3)]),
        )
}

fn milestone_days(day: u32) -> EventRecord {
    EventRecord::new(format!("special_{}_days", day), format!("[MILESTONE] {} Days Together", day))
        .with_description(format!(
            "{} days. It feels like yesterday and forever ago all at once. \
             {{partner}} looks at you and smiles.",
            day
        ))
        .with_roll_requirement(6)
        .with_responses([
            "Reminisce about favorite memories".to_string(),
            format!("Look ahead to the next {} days", day),
            "Create a time capsule of this moment".to_string(),
        ])
        .with_effect("relationship", 4)
        .with_effect("happiness", 4)
}

fn polycule_harmony() -> EventRecord {
    EventRecord::new("special_polycule_harmony", "[RARE] Polycule Harmony")
        .with_description(
            "It's rare for everything to align perfectly, but today it does. \
             Everyone is happy, connected, and the household harmony is palpable.",
        )
        .with_roll_requirement(7)
        .with_responses([
            "Organize a special group activity",
            "Take a moment to appreciate everyone",
            "Capture this feeling somehow",
        ])
        .with_effect("relationship", 3)
        .with_effect("happiness", 4)
        .with_effect("household_harmony", 5)
        .with_effect("stress", -3)
        .group()
}

/// Special events whose conditions hold right now.
pub fn eligible_special_events(state: &GameState, tuning: &SpecialConfig) -> Vec<EventRecord> {
    let average = state.average_relationship();
    let mut eligible = Vec::new();

    if average >= tuning.deep_bond_threshold {
        eligible.push(deep_bond());
    }
    if average <= tuning.breaking_point_threshold {
        eligible.push(breaking_point());
    }
    if state.day == tuning.milestone_day {
        eligible.push(milestone_days(state.day));
    }
    if state.partner_count() > 2
        && state
            .partners
            .iter()
            .all(|p| p.relationship >= tuning.polycule_harmony_threshold)
    {
        eligible.push(polycule_harmony());
    }

    eligible
}

/// Rolls for a special event. Returns a rendered event when one fires.
pub fn check_special_event(state: &GameState, config: &EngineConfig, rng: &mut SmallRng) -> Option<Event> {
    let eligible = eligible_special_events(state, &config.special);
    if eligible.is_empty() || !chance(rng, config.special.trigger_chance) {
        return None;
    }
    let record = pick(rng, &eligible)?;
    tracing::info!(event = %record.id, day = state.day, "Special event");
    let event = Event::from_record(record, EventCategory::SpecialEvent);
    Some(render(&event, state, &PartnerBinding::Auto, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Partner;
    use life_events::DifficultyLevel;
    use rand::SeedableRng;

    fn state(relationships: &[i32]) -> GameState {
        let mut rng = SmallRng::seed_from_u64(12345);
        let mut state = GameState::empty("Jordan", DifficultyLevel::Balanced);
        for (i, r) in relationships.iter().enumerate() {
            let mut partner = Partner::generate(format!("P{}", i), None, &mut rng);
            partner.relationship = *r;
            state.partners.push(partner);
        }
        state
    }

    fn ids(events: &[EventRecord]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_eligibility() {
        let tuning = SpecialConfig::default();
        assert!(eligible_special_events(&state(&[50]), &tuning).is_empty());
        assert_eq!(ids(&eligible_special_events(&state(&[90]), &tuning)), vec!["special_deep_bond"]);
        assert_eq!(ids(&eligible_special_events(&state(&[20]), &tuning)), vec!["special_crisis_point"]);

        let mut s = state(&[50]);
        s.day = 100;
        assert_eq!(ids(&eligible_special_events(&s, &tuning)), vec!["special_100_days"]);
    }

    #[test]
    fn test_two_partners_never_get_polycule_harmony() {
        let tuning = SpecialConfig::default();
        let events = eligible_special_events(&state(&[80, 80]), &tuning);
        assert!(!ids(&events).contains(&"special_polycule_harmony"));

        let events = eligible_special_events(&state(&[80, 80, 76]), &tuning);
        assert!(ids(&events).contains(&"special_polycule_harmony"));
    }

    #[test]
    fn test_breaking_point_carries_split_maps() {
        let event = breaking_point();
        assert!(event.effects_success.is_some());
        assert!(event.effects_failure.is_some());
    }

    #[test]
    fn test_check_fires_only_when_eligible() {
        let mut config = EngineConfig::default();
        config.special.trigger_chance = 1.0;
        let mut rng = SmallRng::seed_from_u64(1);

        assert!(check_special_event(&state(&[50]), &config, &mut rng).is_none());

        let event = check_special_event(&state(&[80, 80, 80]), &config, &mut rng).unwrap();
        assert_eq!(event.category, EventCategory::SpecialEvent);
        assert!(event.group_event);
        assert!(event.involved_partner.is_none());
    }

    #[test]
    fn test_check_respects_trigger_chance() {
        let mut config = EngineConfig::default();
        config.special.trigger_chance = 0.0;
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..50 {
            assert!(check_special_event(&state(&[95]), &config, &mut rng).is_none());
        }
    }
}
