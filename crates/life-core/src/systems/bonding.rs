//! Bonding Moments
//!
//! Small rewards after good moments with a partner: an inside joke to look
//! back on, or a piece of their backstory shared for the first time.

use rand::rngs::SmallRng;

use life_events::{ActionType, BackstorySlot, Event, EventCategory, InsideJoke, MemoryKind};

use crate::config::EngineConfig;
use crate::random::{chance, pick};
use crate::state::GameState;
use crate::systems::resolution::Outcome;

/// What bonding hooks produced for one outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bonding {
    pub inside_joke: Option<String>,
    pub revealed: Option<(String, BackstorySlot)>,
}

/// Maybe records an inside joke about `event` with `partner`.
pub fn maybe_inside_joke(
    state: &mut GameState,
    config: &EngineConfig,
    event: &Event,
    partner: &str,
    rng: &mut SmallRng,
) -> Option<String> {
    if !chance(rng, config.resolution.inside_joke_chance) {
        return None;
    }
    if state.inside_jokes.len() >= config.resolution.inside_joke_cap {
        return None;
    }

    let templates = [
        format!("that time with the {}", event.title.to_lowercase()),
        format!("the {} incident", event.category.as_str().replace('_', " ")),
        format!("day {}'s adventure", state.day),
    ];
    let joke = pick(rng, &templates)?.clone();
    state.inside_jokes.push(InsideJoke {
        joke: joke.clone(),
        day_created: state.day,
        partner: partner.to_string(),
    });
    tracing::debug!(partner = %partner, joke = %joke, "Inside joke");
    Some(joke)
}

/// Maybe reveals one unrevealed backstory slot for `partner`.
pub fn maybe_reveal_backstory(
    state: &mut GameState,
    config: &EngineConfig,
    partner: &str,
    rng: &mut SmallRng,
) -> Option<BackstorySlot> {
    if !chance(rng, config.resolution.backstory_reveal_chance) {
        return None;
    }
    let target = state.partner_mut(partner)?;
    let unrevealed = target.unrevealed_backstory();
    let slot = *pick(rng, &unrevealed)?;

    target.reveal(slot);
    target.adjust_relationship(config.resolution.backstory_reveal_bonus);
    state.add_memory(
        MemoryKind::Backstory,
        format!("{} shared about their {}", partner, slot),
        Some(vec![partner.to_string()]),
    );
    tracing::info!(partner = %partner, slot = %slot, "Backstory revealed");
    Some(slot)
}

fn opens_up(event: &Event, action_type: Option<ActionType>) -> bool {
    match event.category {
        EventCategory::RelationshipEvents | EventCategory::Contextual => true,
        EventCategory::PartnerAction => action_type == Some(ActionType::Vulnerable),
        _ => false,
    }
}

/// Runs the bonding hooks after a successful outcome with an involved partner.
pub fn after_outcome(
    state: &mut GameState,
    config: &EngineConfig,
    event: &Event,
    outcome: &Outcome,
    action_type: Option<ActionType>,
    rng: &mut SmallRng,
) -> Bonding {
    let mut bonding = Bonding::default();
    let Some(partner) = outcome.involved_partner.as_deref() else {
        return bonding;
    };
    if !outcome.success {
        return bonding;
    }

    bonding.inside_joke = maybe_inside_joke(state, config, event, partner, rng);
    if opens_up(event, action_type) {
        bonding.revealed =
            maybe_reveal_backstory(state, config, partner, rng).map(|slot| (partner.to_string(), slot));
    }
    bonding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Partner;
    use life_events::{DifficultyLevel, EffectMap, EventRecord};
    use rand::SeedableRng;

    fn state() -> GameState {
        let mut rng = SmallRng::seed_from_u64(12345);
        let mut state = GameState::empty("Jordan", DifficultyLevel::Balanced);
        state.partners.push(Partner::generate("Riley", None, &mut rng));
        state.partners.push(Partner::generate("Casey", None, &mut rng));
        state.day = 12;
        state
    }

    fn certain() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.resolution.inside_joke_chance = 1.0;
        config.resolution.backstory_reveal_chance = 1.0;
        config
    }

    fn event(category: EventCategory) -> Event {
        Event::from_record(&EventRecord::new("e", "Burnt Pancakes"), category)
    }

    fn outcome(success: bool, partner: Option<&str>) -> Outcome {
        Outcome {
            event_id: "e".to_string(),
            category: EventCategory::RelationshipEvents,
            success,
            roll: 15,
            adjusted_dc: 10,
            response: 0,
            deltas: EffectMap::new(),
            involved_partner: partner.map(str::to_string),
        }
    }

    #[test]
    fn test_inside_joke_templates_and_cap() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = state();
        let config = certain();
        let joke = maybe_inside_joke(&mut s, &config, &event(EventCategory::GoodSurprises), "Riley", &mut rng)
            .unwrap();
        assert!(
            joke == "that time with the burnt pancakes"
                || joke == "the good surprises incident"
                || joke == "day 12's adventure"
        );
        assert_eq!(s.inside_jokes[0].partner, "Riley");

        for _ in 0..20 {
            maybe_inside_joke(&mut s, &config, &event(EventCategory::GoodSurprises), "Riley", &mut rng);
        }
        assert_eq!(s.inside_jokes.len(), 10);
    }

    #[test]
    fn test_backstory_reveals_each_slot_once() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = state();
        let config = certain();
        for _ in 0..4 {
            assert!(maybe_reveal_backstory(&mut s, &config, "Riley", &mut rng).is_some());
        }
        assert!(maybe_reveal_backstory(&mut s, &config, "Riley", &mut rng).is_none());
        assert!(!s.partners[0].has_unrevealed_backstory());
        assert_eq!(s.partners[0].relationship, 58);
        assert_eq!(s.memories.len(), 4);
        assert_eq!(s.memories[0].partners, vec!["Riley"]);
    }

    #[test]
    fn test_hooks_need_success_and_partner() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = state();
        let config = certain();
        let e = event(EventCategory::RelationshipEvents);

        assert_eq!(after_outcome(&mut s, &config, &e, &outcome(false, Some("Riley")), None, &mut rng), Bonding::default());
        assert_eq!(after_outcome(&mut s, &config, &e, &outcome(true, None), None, &mut rng), Bonding::default());

        let bonding = after_outcome(&mut s, &config, &e, &outcome(true, Some("Riley")), None, &mut rng);
        assert!(bonding.inside_joke.is_some());
        assert_eq!(bonding.revealed.as_ref().map(|(p, _)| p.as_str()), Some("Riley"));
    }

    #[test]
    fn test_only_vulnerable_actions_reveal() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = state();
        let config = certain();
        let e = event(EventCategory::PartnerAction);
        let done = outcome(true, Some("Casey"));

        let play = after_outcome(&mut s, &config, &e, &done, Some(ActionType::Play), &mut rng);
        assert!(play.revealed.is_none());
        let open = after_outcome(&mut s, &config, &e, &done, Some(ActionType::Vulnerable), &mut rng);
        assert!(open.revealed.is_some());
    }
}
