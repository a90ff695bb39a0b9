//! Milestones
//!
//! Achievement checks, anniversary memories and passive personal growth.
//! Achievements unlock at most once; re-checking is always safe.

use rand::rngs::SmallRng;

use life_events::{DifficultyLevel, MemoryKind, Stat, STAT_MAX};

use crate::random::chance;
use crate::state::GameState;

const DAY_MILESTONES: &[(u32, &str, &str)] = &[
    (7, "First Week", "Survived your first week together!"),
    (30, "One Month", "A whole month of life together!"),
    (100, "Century", "100 days of shared life!"),
    (365, "First Anniversary", "One year together!"),
];

const GROWTH_MILESTONES: &[(i32, &str, &str)] = &[
    (25, "Self-Aware", "Reached 25 personal growth"),
    (50, "Growing Strong", "Reached 50 personal growth"),
    (75, "Wise Soul", "Reached 75 personal growth"),
];

const BOND_THRESHOLD: i32 = 90;
const ROCK_BOTTOM: i32 = 10;
const POLYCULE_GOALS_THRESHOLD: i32 = 70;

/// Unlocks every day, relationship and difficulty achievement currently earned.
pub fn check_achievements(state: &mut GameState) {
    let day = state.day;
    for (threshold, id, description) in DAY_MILESTONES {
        if day >= *threshold {
            state.unlock(id, description);
        }
    }

    let relationships: Vec<(String, i32)> = state
        .partners
        .iter()
        .map(|p| (p.name.clone(), p.relationship))
        .collect();
    for (name, relationship) in &relationships {
        if *relationship >= BOND_THRESHOLD {
            state.unlock(
                &format!("Unbreakable Bond ({})", name),
                &format!("Reached 90+ relationship with {}", name),
            );
        }
        if *relationship <= ROCK_BOTTOM {
            state.unlock(
                &format!("Rocky Road ({})", name),
                &format!("Relationship with {} hit rock bottom", name),
            );
        }
    }

    if relationships.len() > 1
        && relationships
            .iter()
            .all(|(_, r)| *r >= POLYCULE_GOALS_THRESHOLD)
    {
        state.unlock("Polycule Goals", "All partners at 70+ simultaneously!");
    }

    match state.difficulty {
        DifficultyLevel::Chaotic if day >= 50 => {
            state.unlock("Chaos Survivor", "50 days on Chaotic difficulty!");
        }
        DifficultyLevel::Cozy if day >= 100 => {
            state.unlock("Cozy Life", "100 peaceful days on Cozy mode");
        }
        _ => {}
    }
}

fn plural(count: u32, unit: &str) -> String {
    if count > 1 {
        format!("{} {}s together!", count, unit)
    } else {
        format!("{} {} together!", count, unit)
    }
}

/// Records weekly (first month only), monthly and yearly anniversary memories.
/// Returns the descriptions recorded today.
pub fn record_anniversaries(state: &mut GameState) -> Vec<String> {
    let day = state.day;
    if day == 0 {
        return Vec::new();
    }

    let mut recorded = Vec::new();
    if day <= 30 && day % 7 == 0 {
        recorded.push((MemoryKind::Weekly, plural(day / 7, "week")));
    }
    if day % 30 == 0 {
        recorded.push((MemoryKind::Monthly, plural(day / 30, "month")));
    }
    if day % 365 == 0 {
        recorded.push((MemoryKind::Yearly, plural(day / 365, "year")));
    }

    recorded
        .into_iter()
        .map(|(kind, description)| {
            tracing::info!(day, kind = %kind, "Anniversary");
            state.add_memory(kind, description.clone(), None);
            description
        })
        .collect()
}

/// Passive personal growth from living life. Returns the points gained.
pub fn apply_personal_growth(state: &mut GameState, rng: &mut SmallRng) -> i32 {
    let before = state.stats.get(Stat::PersonalGrowth);
    let mut growth = 0;

    if chance(rng, 0.10) {
        growth += 1;
    }

    let setbacks = state
        .recent_history(7)
        .iter()
        .filter(|entry| !entry.success)
        .count();
    if setbacks >= 2 && chance(rng, 0.3) {
        growth += 1;
    }

    if state.average_relationship() >= 70.0 && chance(rng, 0.15) {
        growth += 1;
    }

    if state.stats.get(Stat::Stress) > 60 && chance(rng, 0.2) {
        growth += 1;
    }

    if growth == 0 {
        return 0;
    }

    state
        .stats
        .set(Stat::PersonalGrowth, (before + growth).min(STAT_MAX));
    let after = state.stats.get(Stat::PersonalGrowth);
    for (threshold, id, description) in GROWTH_MILESTONES {
        if before < *threshold && after >= *threshold {
            state.unlock(id, description);
        }
    }
    after - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Partner;
    use life_events::{EventCategory, HistoryEntry};
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

    #[test]
    fn test_day_milestones_unlock_once() {
        let mut s = state(&[50]);
        s.day = 30;
        check_achievements(&mut s);
        assert!(s.achievements.is_unlocked("First Week"));
        assert!(s.achievements.is_unlocked("One Month"));
        assert!(!s.achievements.is_unlocked("Century"));
        assert_eq!(s.achievements.get("First Week").unwrap().day, 30);

        s.day = 31;
        check_achievements(&mut s);
        assert_eq!(s.achievements.get("First Week").unwrap().day, 30);
    }

    #[test]
    fn test_partner_achievements() {
        let mut s = state(&[95, 5]);
        check_achievements(&mut s);
        assert!(s.achievements.is_unlocked("Unbreakable Bond (P0)"));
        assert!(s.achievements.is_unlocked("Rocky Road (P1)"));
        assert!(!s.achievements.is_unlocked("Polycule Goals"));
    }

    #[test]
    fn test_polycule_goals_needs_more_than_one_partner() {
        let mut solo = state(&[80]);
        check_achievements(&mut solo);
        assert!(!solo.achievements.is_unlocked("Polycule Goals"));

        let mut pair = state(&[70, 75]);
        check_achievements(&mut pair);
        assert!(pair.achievements.is_unlocked("Polycule Goals"));
    }

    #[test]
    fn test_difficulty_achievements() {
        let mut s = state(&[50]);
        s.difficulty = DifficultyLevel::Chaotic;
        s.day = 49;
        check_achievements(&mut s);
        assert!(!s.achievements.is_unlocked("Chaos Survivor"));
        s.day = 50;
        check_achievements(&mut s);
        assert!(s.achievements.is_unlocked("Chaos Survivor"));
        assert!(!s.achievements.is_unlocked("Cozy Life"));
    }

    #[test]
    fn test_anniversaries() {
        let mut s = state(&[50]);
        s.day = 7;
        assert_eq!(record_anniversaries(&mut s), vec!["1 week together!"]);
        s.day = 14;
        assert_eq!(record_anniversaries(&mut s), vec!["2 weeks together!"]);
        s.day = 30;
        assert_eq!(record_anniversaries(&mut s), vec!["1 month together!"]);
        s.day = 35;
        assert!(record_anniversaries(&mut s).is_empty());
        s.day = 60;
        assert_eq!(record_anniversaries(&mut s), vec!["2 months together!"]);
        assert_eq!(s.memories.last().unwrap().kind, MemoryKind::Monthly);
    }

    #[test]
    fn test_growth_is_capped_and_milestones_cross() {
        let mut s = state(&[90, 90]);
        s.stats.personal_growth = 24;
        s.stats.stress = 80;
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..500 {
            apply_personal_growth(&mut s, &mut rng);
        }
        assert_eq!(s.stats.get(Stat::PersonalGrowth), 100);
        assert!(s.achievements.is_unlocked("Self-Aware"));
        assert!(s.achievements.is_unlocked("Growing Strong"));
        assert!(s.achievements.is_unlocked("Wise Soul"));
    }

    #[test]
    fn test_growth_never_negative() {
        let mut s = state(&[50]);
        s.history.push(HistoryEntry {
            day: 1,
            event_id: "x".to_string(),
            title: "X".to_string(),
            category: EventCategory::Complications,
            roll: 2,
            success: false,
            response: 0,
            involved_partner: None,
        });
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..50 {
            assert!(apply_personal_growth(&mut s, &mut rng) >= 0);
        }
    }
}
