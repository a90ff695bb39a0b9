//! Contextual Conditions
//!
//! Evaluates the conjunctive predicate attached to a contextual event against
//! the current state. Every clause is optional; an absent clause passes.

use life_events::{EventConditions, Stat};

use crate::state::GameState;

/// True when every present clause holds.
pub fn conditions_match(conditions: &EventConditions, state: &GameState, max_pending_surprises: usize) -> bool {
    if let Some(weather) = &conditions.weather {
        if !weather.contains(&state.weather) {
            return false;
        }
    }

    if let Some(season) = conditions.season {
        if season != state.season {
            return false;
        }
    }

    if let Some(moods) = &conditions.partner_mood {
        if !state.partners.iter().any(|p| moods.contains(&p.mood)) {
            return false;
        }
    }

    if let Some(traits) = &conditions.partner_traits {
        let any_trait = state
            .partners
            .iter()
            .any(|p| p.traits.iter().any(|t| traits.contains(t)));
        if !any_trait {
            return false;
        }
    }

    if let Some(language) = conditions.partner_love_language {
        if !state.partners.iter().any(|p| p.love_language == language) {
            return false;
        }
    }

    for (stat, bounds) in &conditions.player_stat {
        if !bounds.contains(state.stats.get(*stat) as f64) {
            return false;
        }
    }

    if let Some(bounds) = &conditions.relationship {
        if !bounds.contains(state.average_relationship()) {
            return false;
        }
    }

    if let Some(bounds) = &conditions.energy {
        if !bounds.contains(state.energy as f64) {
            return false;
        }
    }

    if conditions.has_inside_jokes && state.inside_jokes.is_empty() {
        return false;
    }

    if conditions.has_active_goal && !state.has_active_goal() {
        return false;
    }

    if conditions.has_metamours && state.metamours.is_empty() {
        return false;
    }

    // Skipped when there are no edges to test
    if let Some(bounds) = &conditions.metamour_relationship {
        if !state.metamours.is_empty()
            && !state
                .metamours
                .edges()
                .iter()
                .any(|e| bounds.touches(e.relationship as f64))
        {
            return false;
        }
    }

    if conditions.has_support_network && state.support_network.is_empty() {
        return false;
    }

    if conditions.backstory_unrevealed && !state.has_unrevealed_backstory() {
        return false;
    }

    if let Some(days) = &conditions.days_together {
        if !days.contains(state.day) {
            return false;
        }
    }

    if let Some(bounds) = &conditions.personal_growth {
        if !bounds.contains(state.stats.get(Stat::PersonalGrowth) as f64) {
            return false;
        }
    }

    if conditions.conflict_active && !state.is_conflict_active() {
        return false;
    }

    if conditions.can_surprise && state.pending_surprises.len() >= max_pending_surprises {
        return false;
    }

    true
}
