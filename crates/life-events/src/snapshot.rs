//! Snapshot Types
//!
//! The persisted form of a session. Every field is optional on the way in so
//! that older or hand-edited saves still load; the engine backfills whatever
//! is missing.
//!
//! Metamour edges are stored as `"a|b"` keys with `a < b`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::calendar::{Season, Weather};
use crate::progress::{
    AchievementBook, ArcInstance, GoalInstance, HistoryEntry, InsideJoke, Memory,
    PartnerActionEntry, SupportPerson, SurpriseInstance,
};
use crate::stats::PlayerStats;
use crate::vocab::{
    Activity, BackstorySlot, ConflictStyle, DifficultyLevel, LoveLanguage, Mood, PartnerConfig,
    PartnerTrait,
};

/// Current snapshot layout version.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Joins the two names of a persisted metamour key
pub const METAMOUR_SEPARATOR: char = '|';

/// Builds the canonical metamour key for an unordered pair.
pub fn metamour_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}{METAMOUR_SEPARATOR}{b}")
    } else {
        format!("{b}{METAMOUR_SEPARATOR}{a}")
    }
}

/// Keys a pair may be stored under: canonical first, then the reversed order.
pub fn metamour_key_forms(a: &str, b: &str) -> [String; 2] {
    let canonical = metamour_key(a, b);
    let reversed = if a <= b {
        format!("{b}{METAMOUR_SEPARATOR}{a}")
    } else {
        format!("{a}{METAMOUR_SEPARATOR}{b}")
    };
    [canonical, reversed]
}

fn default_relationship() -> i32 {
    50
}

/// Persisted partner. Optional fields are regenerated on load when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerSnapshot {
    pub name: String,
    #[serde(default = "default_relationship")]
    pub relationship: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<PartnerTrait>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_activity: Option<Activity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub love_language: Option<LoveLanguage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_style: Option<ConflictStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backstory: Option<BTreeMap<BackstorySlot, String>>,
    #[serde(default)]
    pub backstory_revealed: Vec<BackstorySlot>,
    #[serde(default)]
    pub surprise_cooldown: u32,
}

impl PartnerSnapshot {
    /// A bare partner entry, as found in the oldest saves.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relationship: default_relationship(),
            traits: None,
            mood: None,
            favorite_activity: None,
            love_language: None,
            conflict_style: None,
            backstory: None,
            backstory_revealed: Vec::new(),
            surprise_cooldown: 0,
        }
    }
}

/// Complete persisted session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSnapshot {
    pub schema_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    pub player_name: String,
    pub partner_config: PartnerConfig,
    pub difficulty: DifficultyLevel,
    pub include_intimate: bool,
    pub day: u32,
    pub stats: PlayerStats,
    pub partners: Vec<PartnerSnapshot>,
    pub metamours: BTreeMap<String, i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_arc: Option<ArcInstance>,
    pub completed_arcs: Vec<String>,
    pub goals: BTreeMap<String, GoalInstance>,
    pub pending_surprises: Vec<SurpriseInstance>,
    pub memories: Vec<Memory>,
    pub achievements: AchievementBook,
    pub history: Vec<HistoryEntry>,
    pub partner_actions: Vec<PartnerActionEntry>,
    pub inside_jokes: Vec<InsideJoke>,
    /// `None` means the save predates support networks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_network: Option<Vec<SupportPerson>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<Weather>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<i32>,
    pub last_exciting_day: u32,
    pub last_intimate_day: u32,
}

impl SessionSnapshot {
    pub fn find_partner(&self, name: &str) -> Option<&PartnerSnapshot> {
        self.partners.iter().find(|p| p.name == name)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
