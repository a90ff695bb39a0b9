//! Daily Dynamics
//!
//! The small per-day forces: energy, weather and seasons, random stat swings,
//! relationship drift, household harmony, partner moods, trait effects and
//! metamour drift.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use life_events::{Mood, PartnerTrait, Season, Stat, Weather, DAYS_PER_SEASON};

use crate::config::{DifficultyProfile, EngineConfig};
use crate::random::{chance, range_inclusive, weighted_choice};
use crate::state::{GameState, MAX_ENERGY};

/// Energy penalty above moderate stress
const STRESSED_ENERGY_PENALTY: i32 = 10;
/// Energy penalty above high stress
const EXHAUSTED_ENERGY_PENALTY: i32 = 20;
const WEATHER_ENERGY_SHIFT: i32 = 5;

/// Chance that a struggling or thriving relationship gets nudged
const DRIFT_NUDGE_CHANCE: f64 = 0.3;

/// Draws a weather value using the season's weights.
pub fn random_weather(season: Season, rng: &mut SmallRng) -> Weather {
    let weights: Vec<(Weather, f64)> = season
        .weather_weights()
        .iter()
        .map(|(weather, weight)| (*weather, *weight as f64))
        .collect();
    weighted_choice(rng, &weights).copied().unwrap_or_default()
}

/// Resets daily energy from stress and the weather carried over from
/// yesterday.
pub fn reset_energy(state: &mut GameState, config: &EngineConfig) {
    let stress = state.stats.get(Stat::Stress);
    let mut energy = MAX_ENERGY;
    if stress > 70 {
        energy -= EXHAUSTED_ENERGY_PENALTY;
    } else if stress > 50 {
        energy -= STRESSED_ENERGY_PENALTY;
    }

    let bonus = state.weather.mood_bonus();
    if bonus > 0 {
        energy += WEATHER_ENERGY_SHIFT;
    } else if bonus < 0 {
        energy -= WEATHER_ENERGY_SHIFT;
    }

    state.energy = energy.clamp(config.daily.energy_floor, MAX_ENERGY);
}

/// Maybe changes the weather. Returns the new weather when it was redrawn.
pub fn update_weather(state: &mut GameState, config: &EngineConfig, rng: &mut SmallRng) -> Option<Weather> {
    if !chance(rng, config.daily.weather_change_chance) {
        return None;
    }
    state.weather = random_weather(state.season, rng);
    tracing::debug!(weather = %state.weather.as_str(), "Weather changed");
    Some(state.weather)
}

/// Advances the season every thirtieth day.
pub fn advance_season(state: &mut GameState) -> Option<Season> {
    if state.day == 0 || state.day % DAYS_PER_SEASON != 0 {
        return None;
    }
    state.season = state.season.next();
    tracing::info!(season = %state.season.as_str(), day = state.day, "Season changed");
    Some(state.season)
}

pub fn apply_weather_mood(state: &mut GameState) {
    let bonus = state.weather.mood_bonus();
    if bonus != 0 {
        state.stats.add(Stat::Happiness, bonus);
    }
}

/// Random "life happens" swing on one stat.
pub fn stat_swing(
    state: &mut GameState,
    profile: &DifficultyProfile,
    config: &EngineConfig,
    rng: &mut SmallRng,
) -> Option<(Stat, i32)> {
    let volatility = profile.stat_volatility;
    let swing_chance = config.daily.swing_base_chance
        + (volatility - 2) as f64 * config.daily.swing_chance_per_volatility;
    if !chance(rng, swing_chance) {
        return None;
    }
    let stat = *Stat::ALL.choose(rng)?;
    let change = range_inclusive(rng, -volatility, volatility);
    state.stats.add(stat, change);
    Some((stat, change))
}

/// Daily relationship drift for every partner, then household harmony.
pub fn relationship_drift(state: &mut GameState, profile: &DifficultyProfile, rng: &mut SmallRng) {
    if state.partners.is_empty() {
        return;
    }

    let range = profile.drift_range;
    let harmony = state.stats.get(Stat::HouseholdHarmony);
    let harmony_pull = ((harmony - 50) as f64 / 100.0 * range as f64).round_ties_even() as i32;

    for partner in &mut state.partners {
        let current = partner.relationship;
        let mut drift = range_inclusive(rng, -range, range) + harmony_pull;

        if current < 40 && chance(rng, DRIFT_NUDGE_CHANCE) {
            drift += profile.recovery_bonus;
        }
        if current > 80 && chance(rng, DRIFT_NUDGE_CHANCE) {
            drift -= 1;
        }

        partner.adjust_relationship(drift);
        tracing::debug!(partner = %partner.name, drift, "Relationship drift");
    }

    if state.partners.len() > 1 {
        let average = state.average_relationship();
        let change = ((average - 50.0) / 25.0 * (range as f64 / 2.0)).round_ties_even() as i32;
        state.stats.set(Stat::HouseholdHarmony, harmony + change);
    }
}

/// Mood a partner tends toward given their relationship.
pub fn banded_mood(relationship: i32) -> Mood {
    match relationship {
        r if r >= 75 => Mood::Happy,
        r if r >= 50 => Mood::Content,
        r if r >= 30 => Mood::Stressed,
        _ => Mood::Sad,
    }
}

/// Recomputes every partner's mood.
pub fn update_moods(state: &mut GameState, config: &EngineConfig, rng: &mut SmallRng) {
    let stress = state.stats.get(Stat::Stress);

    for partner in &mut state.partners {
        let mut mood = banded_mood(partner.relationship);

        if partner.has_trait(PartnerTrait::Anxious) && stress > 50 && mood == Mood::Content {
            mood = Mood::Stressed;
        }

        if chance(rng, config.daily.mood_shift_chance) {
            let weights: Vec<(Mood, f64)> = Mood::ALL
                .iter()
                .map(|m| (*m, if *m == mood { config.daily.mood_base_weight } else { 1.0 }))
                .collect();
            if let Some(shifted) = weighted_choice(rng, &weights) {
                mood = *shifted;
            }
        }

        partner.mood = mood;
    }
}

/// Adventurous partners get bored without excitement; affectionate partners
/// miss intimacy when it is enabled.
pub fn apply_trait_effects(state: &mut GameState, config: &EngineConfig) {
    let since_exciting = state.day.saturating_sub(state.last_exciting_day);
    let since_intimate = state.day.saturating_sub(state.last_intimate_day);
    let include_intimate = state.include_intimate;

    for partner in &mut state.partners {
        if partner.has_trait(PartnerTrait::Adventurous)
            && since_exciting > config.daily.adventurous_patience_days
        {
            partner.adjust_relationship(-1);
        }
        if partner.has_trait(PartnerTrait::Affectionate)
            && include_intimate
            && since_intimate > config.daily.affectionate_patience_days
        {
            partner.adjust_relationship(-1);
        }
    }
}

/// Drifts every metamour edge and unlocks friendship achievements.
pub fn metamour_drift(state: &mut GameState, rng: &mut SmallRng) {
    if state.partners.len() <= 1 {
        return;
    }

    let harmony = state.stats.get(Stat::HouseholdHarmony);
    let mut close_pairs = Vec::new();

    for edge in state.metamours.edges_mut() {
        let mut drift = range_inclusive(rng, -1, 1);
        if harmony > 60 {
            drift += 1;
        } else if harmony < 40 {
            drift -= 1;
        }
        edge.relationship = life_events::clamp_stat(edge.relationship + drift);
        if edge.relationship >= 80 {
            close_pairs.push((edge.a.clone(), edge.b.clone()));
        }
    }

    for (a, b) in close_pairs {
        state.unlock(
            &format!("Metamour Goals ({} & {})", a, b),
            &format!("{} and {} are great friends!", a, b),
        );
    }
}
