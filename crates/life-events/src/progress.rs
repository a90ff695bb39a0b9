//! Progress Records
//!
//! Long-lived records that accumulate over a session: story arcs, shared
//! goals, pending surprises, memories, achievements and the event history.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::content::EventCategory;
use crate::vocab::{MemoryKind, SupportKind, SurpriseKind};

/// The currently running story arc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcInstance {
    pub arc_id: String,
    /// 1-indexed, never decreases
    pub stage: u32,
    pub started_day: u32,
    pub next_stage_day: u32,
}

/// Progress on one shared goal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalInstance {
    pub progress: u32,
    pub active: bool,
    /// Terminal; a completed goal never becomes active again
    pub completed: bool,
    pub started_day: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_day: Option<u32>,
}

impl GoalInstance {
    pub fn started(day: u32) -> Self {
        Self {
            progress: 0,
            active: true,
            completed: false,
            started_day: day,
            completed_day: None,
        }
    }
}

/// A surprise a partner is planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurpriseInstance {
    pub partner: String,
    pub kind: SurpriseKind,
    pub day_planned: u32,
    pub day_reveal: u32,
}

/// Append-only memory log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    pub day: u32,
    pub kind: MemoryKind,
    pub description: String,
    #[serde(default)]
    pub partners: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub unlocked: bool,
    pub day: u32,
    #[serde(default)]
    pub description: String,
}

/// Achievements keyed by id. Unlocking is idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementBook(BTreeMap<String, Achievement>);

impl AchievementBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.0.get(id).is_some_and(|a| a.unlocked)
    }

    /// Unlocks `id` on `day`. Returns false if it was already unlocked.
    pub fn unlock(&mut self, id: impl Into<String>, day: u32, description: impl Into<String>) -> bool {
        let id = id.into();
        if self.is_unlocked(&id) {
            return false;
        }
        self.0.insert(
            id,
            Achievement {
                unlocked: true,
                day,
                description: description.into(),
            },
        );
        true
    }

    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.0.get(id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.0.values().filter(|a| a.unlocked).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Achievement)> {
        self.0.iter()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// One resolved event in the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub day: u32,
    pub event_id: String,
    pub title: String,
    pub category: EventCategory,
    pub roll: i32,
    pub success: bool,
    pub response: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub involved_partner: Option<String>,
}

/// One resolved partner action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerActionEntry {
    pub day: u32,
    pub partner: String,
    pub action_id: String,
    pub title: String,
    pub roll: i32,
    pub success: bool,
    pub choice: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsideJoke {
    pub joke: String,
    pub day_created: u32,
    pub partner: String,
}

/// Someone in the player's support network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportPerson {
    pub name: String,
    pub kind: SupportKind,
    pub relationship: i32,
}
