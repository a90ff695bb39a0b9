//! Game State
//!
//! Everything a session mutates: stats, partners, metamours, arcs, goals,
//! surprises and the append-only logs.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use uuid::Uuid;

use life_events::{
    AchievementBook, ArcInstance, DifficultyLevel, GoalInstance, HistoryEntry, InsideJoke, Memory,
    MemoryKind, PartnerActionEntry, PartnerConfig, PlayerStats, Season, Stat, SupportKind,
    SupportPerson, SurpriseInstance, Weather, RELATIONSHIP_KEY,
};

use crate::components::{MetamourGraph, Partner};

/// Daily energy ceiling
pub const MAX_ENERGY: i32 = 100;

const BEST_FRIEND_NAMES: &[&str] = &["Alex", "Jordan", "Sam", "Riley", "Casey", "Morgan"];
const FAMILY_NAMES: &[&str] = &["Mom", "Dad", "Sibling", "Cousin"];
const THERAPIST_SURNAMES: &[&str] = &["Chen", "Williams", "Garcia", "Smith"];

/// Average relationship when there is nobody to average
const NO_PARTNER_AVERAGE: f64 = 50.0;

/// Stress above which a conflict counts as active
const CONFLICT_STRESS: i32 = 65;
/// Average relationship below which a conflict counts as active
const CONFLICT_RELATIONSHIP: f64 = 40.0;

/// Mutable state of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub session_id: Uuid,
    pub player_name: String,
    pub partner_config: PartnerConfig,
    pub difficulty: DifficultyLevel,
    pub include_intimate: bool,
    /// Days together; 0 before the first tick
    pub day: u32,
    pub stats: PlayerStats,
    /// In creation order, names unique
    pub partners: Vec<Partner>,
    pub metamours: MetamourGraph,
    pub active_arc: Option<ArcInstance>,
    pub completed_arcs: Vec<String>,
    pub goals: BTreeMap<String, GoalInstance>,
    pub pending_surprises: Vec<SurpriseInstance>,
    pub memories: Vec<Memory>,
    pub achievements: AchievementBook,
    pub history: Vec<HistoryEntry>,
    pub partner_actions: Vec<PartnerActionEntry>,
    pub inside_jokes: Vec<InsideJoke>,
    pub support_network: Vec<SupportPerson>,
    pub weather: Weather,
    pub season: Season,
    pub energy: i32,
    pub last_exciting_day: u32,
    pub last_intimate_day: u32,
}

impl GameState {
    /// Empty state for the given player; partners and the rest are filled in
    /// by the session.
    pub fn empty(player_name: impl Into<String>, difficulty: DifficultyLevel) -> Self {
        Self {
            session_id: Uuid::nil(),
            player_name: player_name.into(),
            partner_config: PartnerConfig::default(),
            difficulty,
            include_intimate: false,
            day: 0,
            stats: PlayerStats::default(),
            partners: Vec::new(),
            metamours: MetamourGraph::new(),
            active_arc: None,
            completed_arcs: Vec::new(),
            goals: BTreeMap::new(),
            pending_surprises: Vec::new(),
            memories: Vec::new(),
            achievements: AchievementBook::new(),
            history: Vec::new(),
            partner_actions: Vec::new(),
            inside_jokes: Vec::new(),
            support_network: Vec::new(),
            weather: Weather::default(),
            season: Season::default(),
            energy: MAX_ENERGY,
            last_exciting_day: 0,
            last_intimate_day: 0,
        }
    }

    pub fn partner_count(&self) -> usize {
        self.partners.len()
    }

    pub fn partner_names(&self) -> Vec<String> {
        self.partners.iter().map(|p| p.name.clone()).collect()
    }

    pub fn partner(&self, name: &str) -> Option<&Partner> {
        self.partners.iter().find(|p| p.name == name)
    }

    pub fn partner_mut(&mut self, name: &str) -> Option<&mut Partner> {
        self.partners.iter_mut().find(|p| p.name == name)
    }

    /// Mean partner relationship.
    pub fn average_relationship(&self) -> f64 {
        if self.partners.is_empty() {
            return NO_PARTNER_AVERAGE;
        }
        let total: i32 = self.partners.iter().map(|p| p.relationship).sum();
        total as f64 / self.partners.len() as f64
    }

    /// Average relationship below 40 or stress above 65.
    pub fn is_conflict_active(&self) -> bool {
        self.average_relationship() < CONFLICT_RELATIONSHIP
            || self.stats.get(Stat::Stress) > CONFLICT_STRESS
    }

    pub fn has_active_goal(&self) -> bool {
        self.goals.values().any(|g| g.active)
    }

    pub fn has_unrevealed_backstory(&self) -> bool {
        self.partners.iter().any(Partner::has_unrevealed_backstory)
    }

    pub fn is_arc_completed(&self, arc_id: &str) -> bool {
        self.completed_arcs.iter().any(|id| id == arc_id)
    }

    /// Adds `delta` to every partner's relationship.
    pub fn adjust_all_relationships(&mut self, delta: i32) {
        for partner in &mut self.partners {
            partner.adjust_relationship(delta);
        }
    }

    /// Applies one effect entry. `relationship` goes to `target` when given,
    /// otherwise to every partner. Returns false for unknown keys.
    pub fn apply_effect(&mut self, key: &str, delta: i32, target: Option<&str>) -> bool {
        if key == RELATIONSHIP_KEY {
            match target.and_then(|name| self.partner_mut(name)) {
                Some(partner) => partner.adjust_relationship(delta),
                None => self.adjust_all_relationships(delta),
            }
            return true;
        }
        match key.parse::<Stat>() {
            Ok(stat) => {
                self.stats.add(stat, delta);
                true
            }
            Err(_) => false,
        }
    }

    /// Appends a memory. `None` credits every partner.
    pub fn add_memory(&mut self, kind: MemoryKind, description: impl Into<String>, partners: Option<Vec<String>>) {
        let partners = partners.unwrap_or_else(|| self.partner_names());
        self.memories.push(Memory {
            day: self.day,
            kind,
            description: description.into(),
            partners,
        });
    }

    /// Unlocks an achievement today. Returns false if already unlocked.
    pub fn unlock(&mut self, id: &str, description: &str) -> bool {
        let unlocked = self.achievements.unlock(id, self.day, description);
        if unlocked {
            tracing::info!(achievement = %id, day = self.day, "Achievement unlocked");
        }
        unlocked
    }

    /// Spends energy if enough is left.
    pub fn spend_energy(&mut self, amount: i32) -> bool {
        if amount < 0 || self.energy < amount {
            return false;
        }
        self.energy -= amount;
        true
    }

    /// Recent history entries, newest last.
    pub fn recent_history(&self, count: usize) -> &[HistoryEntry] {
        let start = self.history.len().saturating_sub(count);
        &self.history[start..]
    }
}

/// A best friend always; family and a therapist sometimes.
pub fn generate_support_network(rng: &mut SmallRng) -> Vec<SupportPerson> {
    let mut network = Vec::new();

    let friend = BEST_FRIEND_NAMES.choose(rng).copied().unwrap_or("Alex");
    network.push(SupportPerson {
        name: friend.to_string(),
        kind: SupportKind::BestFriend,
        relationship: rng.gen_range(60..=80),
    });

    if rng.gen::<f64>() < 0.7 {
        let name = FAMILY_NAMES.choose(rng).copied().unwrap_or("Mom");
        network.push(SupportPerson {
            name: name.to_string(),
            kind: SupportKind::Family,
            relationship: rng.gen_range(40..=70),
        });
    }

    if rng.gen::<f64>() < 0.3 {
        let surname = THERAPIST_SURNAMES.choose(rng).copied().unwrap_or("Chen");
        network.push(SupportPerson {
            name: format!("Dr. {}", surname),
            kind: SupportKind::Therapist,
            relationship: 50,
        });
    }

    network
}
