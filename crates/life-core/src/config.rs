//! Tuning configuration for the engine.
//!
//! Every probability, threshold and difficulty preset can be overridden from
//! a TOML file. Missing sections and fields fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;

use life_events::{DifficultyLevel, EffectMap};

pub use crate::error::ConfigError;

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Difficulty presets
    pub difficulty: DifficultyTable,
    /// Event selection settings
    pub selection: SelectionConfig,
    /// Outcome resolution settings
    pub resolution: ResolutionConfig,
    /// Story arc activation settings
    pub arcs: ArcConfig,
    /// Daily tick settings
    pub daily: DailyConfig,
    /// Surprise planning settings
    pub surprises: SurpriseConfig,
    /// Special-condition event settings
    pub special: SpecialConfig,
    /// Shared goal definitions
    pub goals: Vec<GoalDefinition>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            difficulty: DifficultyTable::default(),
            selection: SelectionConfig::default(),
            resolution: ResolutionConfig::default(),
            arcs: ArcConfig::default(),
            daily: DailyConfig::default(),
            surprises: SurpriseConfig::default(),
            special: SpecialConfig::default(),
            goals: default_goals(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Modifiers for the given difficulty level.
    pub fn profile(&self, level: DifficultyLevel) -> &DifficultyProfile {
        self.difficulty.profile(level)
    }

    pub fn goal(&self, id: &str) -> Option<&GoalDefinition> {
        self.goals.iter().find(|g| g.id == id)
    }
}

/// Numeric modifiers applied by a difficulty level.
///
/// Profiles are all-or-nothing in TOML: a profile table must list every field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Magnitude of the daily random stat swing
    pub stat_volatility: i32,
    /// Scale applied to every event effect
    pub effect_multiplier: f64,
    /// Magnitude of daily relationship drift
    pub drift_range: i32,
    /// Added to every difficulty check
    pub dc_modifier: i32,
    /// Weight of crisis categories, arc triggers and cascades
    pub crisis_weight: f64,
    /// Help given to struggling relationships
    pub recovery_bonus: i32,
}

impl DifficultyProfile {
    pub fn cozy() -> Self {
        Self {
            stat_volatility: 1,
            effect_multiplier: 0.7,
            drift_range: 1,
            dc_modifier: -2,
            crisis_weight: 0.5,
            recovery_bonus: 2,
        }
    }

    pub fn balanced() -> Self {
        Self {
            stat_volatility: 2,
            effect_multiplier: 1.0,
            drift_range: 2,
            dc_modifier: 0,
            crisis_weight: 1.0,
            recovery_bonus: 1,
        }
    }

    pub fn dramatic() -> Self {
        Self {
            stat_volatility: 4,
            effect_multiplier: 1.5,
            drift_range: 3,
            dc_modifier: 2,
            crisis_weight: 1.5,
            recovery_bonus: 0,
        }
    }

    pub fn chaotic() -> Self {
        Self {
            stat_volatility: 6,
            effect_multiplier: 2.0,
            drift_range: 5,
            dc_modifier: 4,
            crisis_weight: 2.0,
            recovery_bonus: -1,
        }
    }
}

/// One profile per difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTable {
    pub cozy: DifficultyProfile,
    pub balanced: DifficultyProfile,
    pub dramatic: DifficultyProfile,
    pub chaotic: DifficultyProfile,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            cozy: DifficultyProfile::cozy(),
            balanced: DifficultyProfile::balanced(),
            dramatic: DifficultyProfile::dramatic(),
            chaotic: DifficultyProfile::chaotic(),
        }
    }
}

impl DifficultyTable {
    pub fn profile(&self, level: DifficultyLevel) -> &DifficultyProfile {
        match level {
            DifficultyLevel::Cozy => &self.cozy,
            DifficultyLevel::Balanced => &self.balanced,
            DifficultyLevel::Dramatic => &self.dramatic,
            DifficultyLevel::Chaotic => &self.chaotic,
        }
    }

    pub fn profile_mut(&mut self, level: DifficultyLevel) -> &mut DifficultyProfile {
        match level {
            DifficultyLevel::Cozy => &mut self.cozy,
            DifficultyLevel::Balanced => &mut self.balanced,
            DifficultyLevel::Dramatic => &mut self.dramatic,
            DifficultyLevel::Chaotic => &mut self.chaotic,
        }
    }
}

/// Event selection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Chance to return a matching contextual event directly
    pub contextual_fast_path: f64,
    /// Extra relationship-event weight per partner beyond the first
    pub relationship_weight_per_partner: f64,
    /// Average relationship required for intimate events without their own gate
    pub intimate_threshold: f64,
    /// Relationship bonus added to net-positive shared moments
    pub bonding_relationship_bonus: i32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            contextual_fast_path: 0.4,
            relationship_weight_per_partner: 0.5,
            intimate_threshold: 60.0,
            bonding_relationship_bonus: 1,
        }
    }
}

/// Outcome resolution configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Scale of positive effects on success
    pub success_positive_skew: f64,
    /// Scale of negative effects on success
    pub success_negative_skew: f64,
    /// Scale of positive effects on failure
    pub failure_positive_skew: f64,
    /// Scale of negative effects on failure
    pub failure_negative_skew: f64,
    /// Cascade chance per point of crisis weight above 1
    pub cascade_base_chance: f64,
    pub inside_joke_chance: f64,
    pub inside_joke_cap: usize,
    pub backstory_reveal_chance: f64,
    pub backstory_reveal_bonus: i32,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            success_positive_skew: 1.2,
            success_negative_skew: 0.8,
            failure_positive_skew: 0.7,
            failure_negative_skew: 1.3,
            cascade_base_chance: 0.15,
            inside_joke_chance: 0.1,
            inside_joke_cap: 10,
            backstory_reveal_chance: 0.15,
            backstory_reveal_bonus: 2,
        }
    }
}

/// Story arc configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcConfig {
    /// Earliest day an arc may start
    pub min_day: u32,
    /// Daily start chance, scaled by crisis weight
    pub base_trigger_chance: f64,
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self {
            min_day: 10,
            base_trigger_chance: 0.05,
        }
    }
}

/// Daily tick configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyConfig {
    pub weather_change_chance: f64,
    /// Swing chance at volatility 2
    pub swing_base_chance: f64,
    /// Swing chance added per volatility point above 2
    pub swing_chance_per_volatility: f64,
    pub mood_shift_chance: f64,
    /// Weight of the banded mood when resampling
    pub mood_base_weight: f64,
    pub goal_progress_per_day: u32,
    pub daily_moment_chance: f64,
    /// Per-partner chance of a partner action in the turn driver
    pub partner_action_chance: f64,
    pub energy_floor: i32,
    /// Days without excitement before adventurous partners cool off
    pub adventurous_patience_days: u32,
    /// Days without intimacy before affectionate partners cool off
    pub affectionate_patience_days: u32,
}

impl Default for DailyConfig {
    fn default() -> Self {
        Self {
            weather_change_chance: 0.3,
            swing_base_chance: 0.3,
            swing_chance_per_volatility: 0.1,
            mood_shift_chance: 0.2,
            mood_base_weight: 3.0,
            goal_progress_per_day: 1,
            daily_moment_chance: 0.3,
            partner_action_chance: 0.7,
            energy_floor: 50,
            adventurous_patience_days: 5,
            affectionate_patience_days: 7,
        }
    }
}

/// Surprise configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurpriseConfig {
    /// Relationship needed before a partner plans surprises
    pub min_relationship: i32,
    pub plan_chance: f64,
    pub min_reveal_days: u32,
    pub max_reveal_days: u32,
    pub cooldown_days: u32,
    pub relationship_bonus: i32,
    pub happiness_bonus: i32,
    /// Pending surprises at or above this count block `can_surprise`
    pub max_pending: usize,
}

impl Default for SurpriseConfig {
    fn default() -> Self {
        Self {
            min_relationship: 60,
            plan_chance: 0.05,
            min_reveal_days: 2,
            max_reveal_days: 5,
            cooldown_days: 14,
            relationship_bonus: 3,
            happiness_bonus: 3,
            max_pending: 2,
        }
    }
}

/// Special-condition event configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialConfig {
    pub trigger_chance: f64,
    pub deep_bond_threshold: f64,
    pub breaking_point_threshold: f64,
    pub polycule_harmony_threshold: i32,
    pub milestone_day: u32,
}

impl Default for SpecialConfig {
    fn default() -> Self {
        Self {
            trigger_chance: 0.15,
            deep_bond_threshold: 85.0,
            breaking_point_threshold: 25.0,
            polycule_harmony_threshold: 75,
            milestone_day: 100,
        }
    }
}

/// A long-term goal the player can work toward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalDefinition {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub target: u32,
    /// Applied once on completion; `relationship` goes to every partner
    #[serde(default)]
    pub rewards: EffectMap,
}

impl GoalDefinition {
    fn new(id: &str, label: &str, description: &str, target: u32, rewards: &[(&str, i32)]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            target,
            rewards: rewards.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }
}

/// The built-in shared goals.
pub fn default_goals() -> Vec<GoalDefinition> {
    vec![
        GoalDefinition::new(
            "travel",
            "Dream Trip Together",
            "Save up and plan an amazing trip together",
            100,
            &[("relationship", 10), ("happiness", 10)],
        ),
        GoalDefinition::new(
            "home",
            "Our Own Place",
            "Work toward getting your own space together",
            200,
            &[("relationship", 15), ("financial_stability", -20), ("happiness", 15)],
        ),
        GoalDefinition::new(
            "pet",
            "Adopt a Pet",
            "Prepare to welcome a furry family member",
            50,
            &[("relationship", 5), ("happiness", 8)],
        ),
        GoalDefinition::new(
            "creative_project",
            "Creative Project Together",
            "Make something meaningful together",
            75,
            &[("relationship", 8), ("personal_growth", 5)],
        ),
        GoalDefinition::new(
            "fitness",
            "Get Fit Together",
            "Commit to a health journey as a team",
            60,
            &[("health", 10), ("relationship", 5)],
        ),
    ]
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Life simulation engine configuration

[difficulty.cozy]
stat_volatility = 1
effect_multiplier = 0.7
drift_range = 1
dc_modifier = -2
crisis_weight = 0.5
recovery_bonus = 2

[difficulty.balanced]
stat_volatility = 2
effect_multiplier = 1.0
drift_range = 2
dc_modifier = 0
crisis_weight = 1.0
recovery_bonus = 1

[difficulty.dramatic]
stat_volatility = 4
effect_multiplier = 1.5
drift_range = 3
dc_modifier = 2
crisis_weight = 1.5
recovery_bonus = 0

[difficulty.chaotic]
stat_volatility = 6
effect_multiplier = 2.0
drift_range = 5
dc_modifier = 4
crisis_weight = 2.0
recovery_bonus = -1

[selection]
contextual_fast_path = 0.4
relationship_weight_per_partner = 0.5
intimate_threshold = 60.0
bonding_relationship_bonus = 1

[resolution]
success_positive_skew = 1.2
success_negative_skew = 0.8
failure_positive_skew = 0.7
failure_negative_skew = 1.3
cascade_base_chance = 0.15
inside_joke_chance = 0.1
inside_joke_cap = 10
backstory_reveal_chance = 0.15
backstory_reveal_bonus = 2

[arcs]
min_day = 10
base_trigger_chance = 0.05

[daily]
weather_change_chance = 0.3
swing_base_chance = 0.3
swing_chance_per_volatility = 0.1
mood_shift_chance = 0.2
mood_base_weight = 3.0
goal_progress_per_day = 1
daily_moment_chance = 0.3
partner_action_chance = 0.7
energy_floor = 50
adventurous_patience_days = 5
affectionate_patience_days = 7

[surprises]
min_relationship = 60
plan_chance = 0.05
min_reveal_days = 2
max_reveal_days = 5
cooldown_days = 14
relationship_bonus = 3
happiness_bonus = 3
max_pending = 2

[special]
trigger_chance = 0.15
deep_bond_threshold = 85.0
breaking_point_threshold = 25.0
polycule_harmony_threshold = 75
milestone_day = 100

[[goals]]
id = "travel"
label = "Dream Trip Together"
description = "Save up and plan an amazing trip together"
target = 100
rewards = { relationship = 10, happiness = 10 }

[[goals]]
id = "home"
label = "Our Own Place"
description = "Work toward getting your own space together"
target = 200
rewards = { relationship = 15, financial_stability = -20, happiness = 15 }

[[goals]]
id = "pet"
label = "Adopt a Pet"
description = "Prepare to welcome a furry family member"
target = 50
rewards = { relationship = 5, happiness = 8 }

[[goals]]
id = "creative_project"
label = "Creative Project Together"
description = "Make something meaningful together"
target = 75
rewards = { relationship = 8, personal_growth = 5 }

[[goals]]
id = "fitness"
label = "Get Fit Together"
description = "Commit to a health journey as a team"
target = 60
rewards = { health = 10, relationship = 5 }
"#
    .to_string()
}
