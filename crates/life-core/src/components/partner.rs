//! Partner Components
//!
//! A partner's relationship value, personality and backstory, plus the
//! random generation used at new game and when backfilling old saves.

use rand::seq::SliceRandom;
use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use life_events::{
    clamp_stat, Activity, BackstorySlot, ConflictStyle, LoveLanguage, Mood, PartnerSnapshot,
    PartnerTrait,
};

/// Most traits a partner can carry
pub const MAX_TRAITS: usize = 3;

/// Starting relationship value
pub const STARTING_RELATIONSHIP: i32 = 50;

const DREAMS: &[&str] = &[
    "always wanted to travel to Japan",
    "secretly wants to write a novel",
    "dreams of opening a small business",
    "wants to learn to play an instrument",
    "hopes to live by the ocean someday",
];

const FEARS: &[&str] = &[
    "afraid of being abandoned",
    "worries about not being good enough",
    "fears losing the people they love",
    "anxious about the future",
    "scared of being truly vulnerable",
];

const CHILDHOODS: &[&str] = &[
    "grew up in a small town",
    "was the youngest sibling",
    "spent summers at grandparents' house",
    "had an imaginary friend",
    "was always the quiet kid in class",
];

const PASTS: &[&str] = &[
    "was hurt before and took time to heal",
    "learned what they don't want from past experiences",
    "grew a lot from previous relationships",
    "took years to be ready for love again",
];

fn backstory_pool(slot: BackstorySlot) -> &'static [&'static str] {
    match slot {
        BackstorySlot::Dream => DREAMS,
        BackstorySlot::Fear => FEARS,
        BackstorySlot::Childhood => CHILDHOODS,
        BackstorySlot::Past => PASTS,
    }
}

/// A single partner in the relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub name: String,
    /// 0-100
    pub relationship: i32,
    /// 1-3 distinct traits, in the order they were assigned
    pub traits: Vec<PartnerTrait>,
    pub mood: Mood,
    pub favorite_activity: Activity,
    pub love_language: LoveLanguage,
    pub conflict_style: ConflictStyle,
    pub backstory: BTreeMap<BackstorySlot, String>,
    pub backstory_revealed: Vec<BackstorySlot>,
    /// Days until this partner may plan another surprise
    pub surprise_cooldown: u32,
}

impl Partner {
    /// Generate a fresh partner. Explicit traits are deduplicated and capped;
    /// otherwise one or two random traits are drawn.
    pub fn generate(name: impl Into<String>, traits: Option<&[PartnerTrait]>, rng: &mut SmallRng) -> Self {
        let traits = match traits {
            Some(given) if !given.is_empty() => normalize_traits(given),
            _ => random_traits(rng),
        };
        let favorite_activity = random_activity(rng);
        let love_language = random_love_language(rng);
        let conflict_style = random_conflict_style(rng);
        let backstory = random_backstory(rng);

        Self {
            name: name.into(),
            relationship: STARTING_RELATIONSHIP,
            traits,
            mood: Mood::default(),
            favorite_activity,
            love_language,
            conflict_style,
            backstory,
            backstory_revealed: Vec::new(),
            surprise_cooldown: 0,
        }
    }

    /// Rebuild a partner from a snapshot, generating whatever is missing.
    ///
    /// Returns the partner and the names of the fields that were backfilled.
    pub fn from_snapshot(snapshot: &PartnerSnapshot, rng: &mut SmallRng) -> (Self, Vec<&'static str>) {
        let mut backfilled = Vec::new();

        let traits = match snapshot.traits.as_deref() {
            Some(given) if !given.is_empty() => normalize_traits(given),
            _ => {
                backfilled.push("traits");
                random_traits(rng)
            }
        };
        let favorite_activity = snapshot.favorite_activity.unwrap_or_else(|| {
            backfilled.push("favorite_activity");
            random_activity(rng)
        });
        let love_language = snapshot.love_language.unwrap_or_else(|| {
            backfilled.push("love_language");
            random_love_language(rng)
        });
        let conflict_style = snapshot.conflict_style.unwrap_or_else(|| {
            backfilled.push("conflict_style");
            random_conflict_style(rng)
        });

        let mut backstory = snapshot.backstory.clone().unwrap_or_default();
        if backstory.len() < BackstorySlot::ALL.len() {
            backfilled.push("backstory");
            for slot in BackstorySlot::ALL {
                if !backstory.contains_key(slot) {
                    backstory.insert(*slot, random_backstory_entry(*slot, rng));
                }
            }
        }

        let mut backstory_revealed = Vec::new();
        for slot in &snapshot.backstory_revealed {
            if !backstory_revealed.contains(slot) {
                backstory_revealed.push(*slot);
            }
        }

        let partner = Self {
            name: snapshot.name.clone(),
            relationship: clamp_stat(snapshot.relationship),
            traits,
            mood: snapshot.mood.unwrap_or_default(),
            favorite_activity,
            love_language,
            conflict_style,
            backstory,
            backstory_revealed,
            surprise_cooldown: snapshot.surprise_cooldown,
        };
        (partner, backfilled)
    }

    pub fn to_snapshot(&self) -> PartnerSnapshot {
        PartnerSnapshot {
            name: self.name.clone(),
            relationship: self.relationship,
            traits: Some(self.traits.clone()),
            mood: Some(self.mood),
            favorite_activity: Some(self.favorite_activity),
            love_language: Some(self.love_language),
            conflict_style: Some(self.conflict_style),
            backstory: Some(self.backstory.clone()),
            backstory_revealed: self.backstory_revealed.clone(),
            surprise_cooldown: self.surprise_cooldown,
        }
    }

    pub fn has_trait(&self, t: PartnerTrait) -> bool {
        self.traits.contains(&t)
    }

    /// Adjust the relationship value, clamped to 0-100.
    pub fn adjust_relationship(&mut self, delta: i32) {
        self.relationship = clamp_stat(self.relationship.saturating_add(delta));
    }

    pub fn tier(&self) -> RelationshipTier {
        RelationshipTier::for_value(self.relationship)
    }

    /// Backstory slots not yet shared with the player.
    pub fn unrevealed_backstory(&self) -> Vec<BackstorySlot> {
        self.backstory
            .keys()
            .filter(|slot| !self.backstory_revealed.contains(slot))
            .copied()
            .collect()
    }

    pub fn has_unrevealed_backstory(&self) -> bool {
        self.backstory
            .keys()
            .any(|slot| !self.backstory_revealed.contains(slot))
    }

    /// Marks a slot revealed. Returns false if it already was.
    pub fn reveal(&mut self, slot: BackstorySlot) -> bool {
        if self.backstory_revealed.contains(&slot) {
            return false;
        }
        self.backstory_revealed.push(slot);
        true
    }
}

fn normalize_traits(given: &[PartnerTrait]) -> Vec<PartnerTrait> {
    let mut traits: Vec<PartnerTrait> = Vec::with_capacity(MAX_TRAITS);
    for t in given {
        if !traits.contains(t) {
            traits.push(*t);
        }
        if traits.len() == MAX_TRAITS {
            break;
        }
    }
    traits
}

fn random_traits(rng: &mut SmallRng) -> Vec<PartnerTrait> {
    let count = rng.gen_range(1..=2);
    PartnerTrait::ALL
        .choose_multiple(rng, count)
        .copied()
        .collect()
}

fn random_activity(rng: &mut SmallRng) -> Activity {
    Activity::ALL.choose(rng).copied().unwrap_or(Activity::CozyNight)
}

fn random_love_language(rng: &mut SmallRng) -> LoveLanguage {
    LoveLanguage::ALL.choose(rng).copied().unwrap_or(LoveLanguage::Time)
}

fn random_conflict_style(rng: &mut SmallRng) -> ConflictStyle {
    ConflictStyle::ALL
        .choose(rng)
        .copied()
        .unwrap_or(ConflictStyle::Collaborative)
}

fn random_backstory_entry(slot: BackstorySlot, rng: &mut SmallRng) -> String {
    backstory_pool(slot)
        .choose(rng)
        .map(|s| s.to_string())
        .unwrap_or_default()
}

fn random_backstory(rng: &mut SmallRng) -> BTreeMap<BackstorySlot, String> {
    BackstorySlot::ALL
        .iter()
        .map(|slot| (*slot, random_backstory_entry(*slot, rng)))
        .collect()
}

/// Named relationship bands for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RelationshipTier {
    Critical,
    Struggling,
    Building,
    Solid,
    Strong,
    Deep,
    Unbreakable,
}

impl RelationshipTier {
    pub fn for_value(value: i32) -> Self {
        match value {
            v if v >= 90 => RelationshipTier::Unbreakable,
            v if v >= 80 => RelationshipTier::Deep,
            v if v >= 65 => RelationshipTier::Strong,
            v if v >= 50 => RelationshipTier::Solid,
            v if v >= 35 => RelationshipTier::Building,
            v if v >= 20 => RelationshipTier::Struggling,
            _ => RelationshipTier::Critical,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RelationshipTier::Critical => "Critical",
            RelationshipTier::Struggling => "Struggling",
            RelationshipTier::Building => "Building",
            RelationshipTier::Solid => "Solid",
            RelationshipTier::Strong => "Strong",
            RelationshipTier::Deep => "Deep",
            RelationshipTier::Unbreakable => "Unbreakable",
        }
    }
}

impl fmt::Display for RelationshipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
