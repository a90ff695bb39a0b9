//! Partner Surprises
//!
//! Partners with a good relationship occasionally plan a surprise that is
//! revealed a few days later, then wait out a cooldown.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use life_events::{MemoryKind, Stat, SurpriseInstance, SurpriseKind};

use crate::config::EngineConfig;
use crate::random::{chance, range_inclusive};
use crate::state::GameState;

/// Reveals every surprise that is due. Returns the revealed surprises.
pub fn reveal_due(state: &mut GameState, config: &EngineConfig) -> Vec<SurpriseInstance> {
    let day = state.day;
    let (due, pending): (Vec<_>, Vec<_>) = state
        .pending_surprises
        .drain(..)
        .partition(|s| s.day_reveal <= day);
    state.pending_surprises = pending;

    for surprise in &due {
        if let Some(partner) = state.partner_mut(&surprise.partner) {
            partner.adjust_relationship(config.surprises.relationship_bonus);
        }
        state.stats.add(Stat::Happiness, config.surprises.happiness_bonus);
        state.add_memory(
            MemoryKind::Surprise,
            format!("{}'s surprise: {}", surprise.partner, surprise.kind),
            Some(vec![surprise.partner.clone()]),
        );
        tracing::info!(partner = %surprise.partner, kind = %surprise.kind, "Surprise revealed");
    }
    due
}

/// Lets partners off cooldown plan new surprises. Returns the new plans.
pub fn plan_surprises(state: &mut GameState, config: &EngineConfig, rng: &mut SmallRng) -> Vec<SurpriseInstance> {
    let tuning = &config.surprises;
    let day = state.day;
    let mut planned = Vec::new();

    for partner in &mut state.partners {
        if partner.surprise_cooldown > 0 {
            partner.surprise_cooldown -= 1;
            continue;
        }
        if partner.relationship < tuning.min_relationship || !chance(rng, tuning.plan_chance) {
            continue;
        }

        let kind = SurpriseKind::ALL
            .choose(rng)
            .copied()
            .unwrap_or(SurpriseKind::Gift);
        let lead = range_inclusive(rng, tuning.min_reveal_days as i32, tuning.max_reveal_days as i32);
        // Reveal is always strictly after the planning day
        let lead = lead.max(1) as u32;

        planned.push(SurpriseInstance {
            partner: partner.name.clone(),
            kind,
            day_planned: day,
            day_reveal: day + lead,
        });
        partner.surprise_cooldown = tuning.cooldown_days;
        tracing::debug!(partner = %partner.name, kind = %kind, "Surprise planned");
    }

    state.pending_surprises.extend(planned.iter().cloned());
    planned
}
