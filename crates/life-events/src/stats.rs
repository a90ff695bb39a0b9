//! Player Stats
//!
//! The player's eight life stats, each held in `[STAT_MIN, STAT_MAX]`.

use serde::{Deserialize, Serialize};

use crate::vocab::tag_enum;

pub const STAT_MIN: i32 = 0;
pub const STAT_MAX: i32 = 100;

/// Clamps a stat or relationship value to its bounds.
pub fn clamp_stat(value: i32) -> i32 {
    value.clamp(STAT_MIN, STAT_MAX)
}

/// Named player stat. Also used as an effect-map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Happiness,
    Health,
    Stress,
    FinancialStability,
    Confidence,
    PersonalGrowth,
    SocialConnection,
    HouseholdHarmony,
}

tag_enum!(Stat, "stat", {
    Happiness => "happiness",
    Health => "health",
    Stress => "stress",
    FinancialStability => "financial_stability",
    Confidence => "confidence",
    PersonalGrowth => "personal_growth",
    SocialConnection => "social_connection",
    HouseholdHarmony => "household_harmony",
});

/// Player life stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub happiness: i32,
    pub health: i32,
    pub stress: i32,
    pub financial_stability: i32,
    pub confidence: i32,
    pub personal_growth: i32,
    pub social_connection: i32,
    /// Only meaningful with more than one partner
    pub household_harmony: i32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            happiness: 50,
            health: 50,
            stress: 30,
            financial_stability: 50,
            confidence: 50,
            personal_growth: 0,
            social_connection: 50,
            household_harmony: 50,
        }
    }
}

impl PlayerStats {
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Happiness => self.happiness,
            Stat::Health => self.health,
            Stat::Stress => self.stress,
            Stat::FinancialStability => self.financial_stability,
            Stat::Confidence => self.confidence,
            Stat::PersonalGrowth => self.personal_growth,
            Stat::SocialConnection => self.social_connection,
            Stat::HouseholdHarmony => self.household_harmony,
        }
    }

    fn slot(&mut self, stat: Stat) -> &mut i32 {
        match stat {
            Stat::Happiness => &mut self.happiness,
            Stat::Health => &mut self.health,
            Stat::Stress => &mut self.stress,
            Stat::FinancialStability => &mut self.financial_stability,
            Stat::Confidence => &mut self.confidence,
            Stat::PersonalGrowth => &mut self.personal_growth,
            Stat::SocialConnection => &mut self.social_connection,
            Stat::HouseholdHarmony => &mut self.household_harmony,
        }
    }

    /// Sets a stat, clamped to bounds.
    pub fn set(&mut self, stat: Stat, value: i32) {
        *self.slot(stat) = clamp_stat(value);
    }

    /// Adds a signed delta and clamps. Returns the new value.
    pub fn add(&mut self, stat: Stat, delta: i32) -> i32 {
        let slot = self.slot(stat);
        *slot = clamp_stat(slot.saturating_add(delta));
        *slot
    }

    /// Clamps every stat back into bounds.
    pub fn clamp_all(&mut self) {
        for stat in Stat::ALL {
            let value = self.get(*stat);
            self.set(*stat, value);
        }
    }

    /// Stats shown to the player. Household harmony is hidden unless there
    /// is more than one partner.
    pub fn visible(&self, partner_count: usize) -> Vec<(Stat, i32)> {
        Stat::ALL
            .iter()
            .filter(|s| partner_count > 1 || **s != Stat::HouseholdHarmony)
            .map(|s| (*s, self.get(*s)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_defaults() {
        let stats = PlayerStats::default();
        assert_eq!(stats.stress, 30);
        assert_eq!(stats.personal_growth, 0);
        assert_eq!(stats.get(Stat::HouseholdHarmony), 50);
    }

    #[test]
    fn test_add_clamps_both_ends() {
        let mut stats = PlayerStats::default();
        assert_eq!(stats.add(Stat::Happiness, 500), 100);
        assert_eq!(stats.add(Stat::Health, -500), 0);
        assert_eq!(stats.add(Stat::Stress, i32::MIN), 0);
    }

    #[test]
    fn test_visible_hides_harmony_for_single_partner() {
        let stats = PlayerStats::default();
        let solo = stats.visible(1);
        assert_eq!(solo.len(), 7);
        assert!(solo.iter().all(|(s, _)| *s != Stat::HouseholdHarmony));
        assert_eq!(stats.visible(3).len(), 8);
    }

    #[test]
    fn test_partial_stats_backfill_defaults() {
        let stats: PlayerStats = serde_json::from_str(r#"{"happiness": 80}"#).unwrap();
        assert_eq!(stats.happiness, 80);
        assert_eq!(stats.stress, 30);
    }

    #[test]
    fn test_stat_keys_parse() {
        assert_eq!("financial_stability".parse::<Stat>().unwrap(), Stat::FinancialStability);
        assert!("relationship".parse::<Stat>().is_err());
    }
}
