//! Quality Time
//!
//! The player spends time with some of their partners, optionally doing a
//! specific activity. Smaller groups get a larger bonus; partners left out
//! may feel neglected.

use rand::rngs::SmallRng;
use std::collections::BTreeMap;

use life_events::{Activity, PartnerTrait, Stat};

use crate::random::chance;
use crate::state::GameState;

const FAVORITE_BONUS: i32 = 2;
const EXTROVERT_GROUP_BONUS: i32 = 2;
const INTROVERT_GROUP_PENALTY: i32 = -1;
const INTROVERT_SOLO_BONUS: i32 = 2;

/// What a quality time session changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualityTimeReport {
    /// Relationship change per selected partner
    pub bonuses: BTreeMap<String, i32>,
    /// Selected partners whose favorite activity was chosen
    pub favorites: Vec<String>,
    pub personal_growth: i32,
    /// Relationship penalty per neglected partner
    pub neglected: BTreeMap<String, i32>,
}

fn base_bonus(selected: usize, total: usize) -> i32 {
    match selected {
        1 => 3,
        2 => 2,
        n if n <= total / 2 => 1,
        _ => 0,
    }
}

/// Spends quality time with `selected` partners. Unknown names are ignored.
pub fn quality_time(
    state: &mut GameState,
    selected: &[String],
    activity: Option<Activity>,
    rng: &mut SmallRng,
) -> QualityTimeReport {
    let mut chosen: Vec<String> = Vec::new();
    for name in selected {
        if state.partner(name).is_some() && !chosen.contains(name) {
            chosen.push(name.clone());
        }
    }

    let mut report = QualityTimeReport::default();
    let total = state.partner_count();
    let group = chosen.len() > 1;
    let base = base_bonus(chosen.len(), total);

    for name in &chosen {
        let Some(partner) = state.partner_mut(name) else {
            continue;
        };
        let mut bonus = base;
        if group {
            if partner.has_trait(PartnerTrait::Extrovert) {
                bonus += EXTROVERT_GROUP_BONUS;
            }
            if partner.has_trait(PartnerTrait::Introvert) {
                bonus += INTROVERT_GROUP_PENALTY;
            }
        } else if partner.has_trait(PartnerTrait::Introvert) {
            bonus += INTROVERT_SOLO_BONUS;
        }

        if activity == Some(partner.favorite_activity) {
            bonus += FAVORITE_BONUS;
            report.favorites.push(name.clone());
        }
        bonus += partner.mood.event_bonus();
        partner.adjust_relationship(bonus);
        report.bonuses.insert(name.clone(), bonus);

        if activity == Some(Activity::DeepTalk) {
            state.stats.add(Stat::PersonalGrowth, 1);
            report.personal_growth += 1;
        }
    }

    for partner in state.partners.iter_mut().filter(|p| !chosen.contains(&p.name)) {
        let extrovert = partner.has_trait(PartnerTrait::Extrovert);
        let neglect_chance = if partner.has_trait(PartnerTrait::Independent) {
            0.1
        } else if extrovert {
            0.5
        } else {
            0.3
        };
        if chance(rng, neglect_chance) {
            let penalty = if extrovert { -2 } else { -1 };
            partner.adjust_relationship(penalty);
            report.neglected.insert(partner.name.clone(), penalty);
        }
    }

    tracing::debug!(
        partners = chosen.len(),
        neglected = report.neglected.len(),
        "Quality time"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Partner;
    use life_events::{DifficultyLevel, Mood};
    use rand::SeedableRng;

    fn state(traits: &[&[PartnerTrait]]) -> GameState {
        let mut rng = SmallRng::seed_from_u64(12345);
        let mut state = GameState::empty("Jordan", DifficultyLevel::Balanced);
        for (i, t) in traits.iter().enumerate() {
            let mut partner = Partner::generate(format!("P{}", i), Some(*t), &mut rng);
            partner.mood = Mood::Content;
            partner.favorite_activity = Activity::Gaming;
            state.partners.push(partner);
        }
        state
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_base_bonus_by_group_size() {
        assert_eq!(base_bonus(1, 4), 3);
        assert_eq!(base_bonus(2, 4), 2);
        assert_eq!(base_bonus(3, 6), 1);
        assert_eq!(base_bonus(3, 4), 0);
    }

    #[test]
    fn test_solo_introvert_with_favorite() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = state(&[&[PartnerTrait::Introvert]]);
        let report = quality_time(&mut s, &names(&["P0"]), Some(Activity::Gaming), &mut rng);
        assert_eq!(report.bonuses["P0"], 3 + 2 + 2);
        assert_eq!(report.favorites, vec!["P0"]);
        assert_eq!(s.partners[0].relationship, 57);
        assert!(report.neglected.is_empty());
    }

    #[test]
    fn test_group_traits() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = state(&[&[PartnerTrait::Extrovert], &[PartnerTrait::Introvert]]);
        let report = quality_time(&mut s, &names(&["P0", "P1"]), None, &mut rng);
        assert_eq!(report.bonuses["P0"], 4);
        assert_eq!(report.bonuses["P1"], 1);
    }

    #[test]
    fn test_deep_talk_grows_per_partner() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = state(&[&[PartnerTrait::Loyal], &[PartnerTrait::Funny]]);
        let report = quality_time(&mut s, &names(&["P0", "P1"]), Some(Activity::DeepTalk), &mut rng);
        assert_eq!(report.personal_growth, 2);
        assert_eq!(s.stats.get(Stat::PersonalGrowth), 2);
    }

    #[test]
    fn test_neglect_penalties() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut total = 0;
        for _ in 0..200 {
            let mut s = state(&[&[PartnerTrait::Loyal], &[PartnerTrait::Extrovert]]);
            let report = quality_time(&mut s, &names(&["P0"]), None, &mut rng);
            if let Some(penalty) = report.neglected.get("P1") {
                assert_eq!(*penalty, -2);
                assert_eq!(s.partners[1].relationship, 48);
                total += 1;
            }
        }
        assert!(total > 50 && total < 150);
    }

    #[test]
    fn test_unknown_and_duplicate_names_ignored() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = state(&[&[PartnerTrait::Loyal]]);
        let report = quality_time(&mut s, &names(&["P0", "P0", "Ghost"]), None, &mut rng);
        assert_eq!(report.bonuses.len(), 1);
        assert_eq!(report.bonuses["P0"], 3);
    }
}
