//! Daily Tick
//!
//! Advances the world by one day. The order of steps is fixed and matters:
//! every random draw happens in the same sequence for the same state, which
//! keeps seeded runs reproducible.

use rand::rngs::SmallRng;
use serde::Serialize;
use std::collections::BTreeSet;

use life_events::{ContentRepository, Season, Stat, SurpriseInstance, Weather};

use crate::config::EngineConfig;
use crate::random::{chance, pick};
use crate::state::GameState;
use crate::systems::{achievements, arc, dynamics, goals, surprises};

/// Summary of one day's tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayReport {
    pub day: u32,
    pub energy: i32,
    /// Set when the weather was redrawn today
    pub weather: Option<Weather>,
    /// Set when a new season began today
    pub season: Option<Season>,
    pub stat_swing: Option<(Stat, i32)>,
    pub anniversaries: Vec<String>,
    pub arc_started: Option<String>,
    pub personal_growth: i32,
    pub surprises_revealed: Vec<SurpriseInstance>,
    pub surprises_planned: Vec<SurpriseInstance>,
    pub goals_completed: Vec<String>,
    pub achievements: Vec<String>,
    pub daily_moment: Option<String>,
}

fn unlocked_ids(state: &GameState) -> BTreeSet<String> {
    state
        .achievements
        .iter()
        .filter(|(_, a)| a.unlocked)
        .map(|(id, _)| id.clone())
        .collect()
}

/// Maybe produces a flavor line about one partner.
pub fn daily_moment(
    state: &GameState,
    content: &ContentRepository,
    config: &EngineConfig,
    rng: &mut SmallRng,
) -> Option<String> {
    if state.partners.is_empty() || !chance(rng, config.daily.daily_moment_chance) {
        return None;
    }
    let moment = pick(rng, &content.daily_moments)?;
    let partner = pick(rng, &state.partners)?;
    Some(moment.replace("{partner}", &partner.name))
}

/// Runs one day.
pub fn run_tick(
    state: &mut GameState,
    content: &ContentRepository,
    config: &EngineConfig,
    rng: &mut SmallRng,
) -> DayReport {
    let before = unlocked_ids(state);
    let profile = config.profile(state.difficulty);

    state.day += 1;
    let mut report = DayReport {
        day: state.day,
        ..DayReport::default()
    };

    dynamics::reset_energy(state, config);
    report.energy = state.energy;
    report.weather = dynamics::update_weather(state, config, rng);
    report.season = dynamics::advance_season(state);
    dynamics::apply_weather_mood(state);
    report.stat_swing = dynamics::stat_swing(state, profile, config, rng);
    dynamics::relationship_drift(state, profile, rng);
    dynamics::update_moods(state, config, rng);
    dynamics::apply_trait_effects(state, config);

    achievements::check_achievements(state);
    report.anniversaries = achievements::record_anniversaries(state);
    report.arc_started = arc::try_start_arc(state, content, config, rng);
    report.personal_growth = achievements::apply_personal_growth(state, rng);

    report.surprises_revealed = surprises::reveal_due(state, config);
    report.surprises_planned = surprises::plan_surprises(state, config, rng);

    dynamics::metamour_drift(state, rng);
    report.goals_completed = goals::progress_goals(state, config);
    report.daily_moment = daily_moment(state, content, config, rng);

    report.achievements = unlocked_ids(state).difference(&before).cloned().collect();

    tracing::debug!(
        day = state.day,
        energy = state.energy,
        weather = %state.weather.as_str(),
        "Day advanced"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Partner;
    use crate::config::DifficultyProfile;
    use life_events::{fixtures, DifficultyLevel};
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

    fn still_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        *config.difficulty.profile_mut(DifficultyLevel::Balanced) = DifficultyProfile {
            stat_volatility: 0,
            drift_range: 0,
            ..DifficultyProfile::balanced()
        };
        config
    }

    #[test]
    fn test_tick_advances_day_and_resets_energy() {
        let mut rng = SmallRng::seed_from_u64(1);
        let content = fixtures::sample_content();
        let config = still_config();
        let mut s = state(&[50]);
        s.energy = 10;

        let report = run_tick(&mut s, &content, &config, &mut rng);
        assert_eq!(report.day, 1);
        assert_eq!(s.day, 1);
        // Low stress; sunny weather cannot push past the ceiling
        assert_eq!(report.energy, 100);
    }

    #[test]
    fn test_first_week_reported_once() {
        let mut rng = SmallRng::seed_from_u64(1);
        let content = ContentRepository::new();
        let config = still_config();
        let mut s = state(&[50]);

        let mut seen = 0;
        for _ in 0..10 {
            let report = run_tick(&mut s, &content, &config, &mut rng);
            if report.achievements.iter().any(|a| a == "First Week") {
                assert_eq!(report.day, 7);
                assert_eq!(report.anniversaries, vec!["1 week together!"]);
                seen += 1;
            }
        }
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_season_changes_on_day_thirty() {
        let mut rng = SmallRng::seed_from_u64(1);
        let content = ContentRepository::new();
        let config = still_config();
        let mut s = state(&[50]);
        let start = s.season;
        for _ in 0..29 {
            assert!(run_tick(&mut s, &content, &config, &mut rng).season.is_none());
        }
        let report = run_tick(&mut s, &content, &config, &mut rng);
        assert_eq!(report.season, Some(start.next()));
    }

    #[test]
    fn test_daily_moment_needs_partners() {
        let mut rng = SmallRng::seed_from_u64(1);
        let content = fixtures::sample_content();
        let mut config = EngineConfig::default();
        config.daily.daily_moment_chance = 1.0;

        assert!(daily_moment(&state(&[]), &content, &config, &mut rng).is_none());
        let moment = daily_moment(&state(&[50]), &content, &config, &mut rng).unwrap();
        assert!(moment.contains("P0"));
        assert!(!moment.contains("{partner}"));
    }

    #[test]
    fn test_values_stay_in_bounds_over_long_runs() {
        let mut rng = SmallRng::seed_from_u64(99);
        let content = fixtures::sample_content();
        let config = EngineConfig::default();
        let mut s = state(&[95, 5, 50]);
        s.difficulty = DifficultyLevel::Chaotic;
        s.metamours = crate::components::MetamourGraph::generate(&s.partner_names(), &mut rng);

        for _ in 0..365 {
            run_tick(&mut s, &content, &config, &mut rng);
            for stat in Stat::ALL {
                assert!((0..=100).contains(&s.stats.get(*stat)));
            }
            for p in &s.partners {
                assert!((0..=100).contains(&p.relationship));
            }
            for e in s.metamours.edges() {
                assert!((0..=100).contains(&e.relationship));
            }
            assert!((50..=100).contains(&s.energy));
        }
        assert_eq!(s.day, 365);
    }
}
