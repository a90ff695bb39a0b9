//! Closed Vocabularies
//!
//! Tag enums shared by partner records, content conditions, and snapshots.
//! Every tag serializes to the same snake_case string returned by `as_str`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error returned when a string does not name a known tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownTag {}

/// Generates `ALL`, `as_str`, `Display` and `FromStr` for a closed tag enum.
macro_rules! tag_enum {
    ($name:ident, $label:expr, { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $str,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::vocab::UnknownTag;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($str => Ok($name::$variant),)+
                    other => Err($crate::vocab::UnknownTag {
                        kind: $label,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

pub(crate) use tag_enum;

/// Personality trait carried by a partner (1-3 per partner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerTrait {
    Introvert,
    Extrovert,
    Adventurous,
    Anxious,
    Affectionate,
    Independent,
    Romantic,
    Playful,
    Creative,
    Stubborn,
    Spontaneous,
    Homebody,
    Sensitive,
    Nurturing,
    Loyal,
    Funny,
    Organized,
    Protective,
}

tag_enum!(PartnerTrait, "trait", {
    Introvert => "introvert",
    Extrovert => "extrovert",
    Adventurous => "adventurous",
    Anxious => "anxious",
    Affectionate => "affectionate",
    Independent => "independent",
    Romantic => "romantic",
    Playful => "playful",
    Creative => "creative",
    Stubborn => "stubborn",
    Spontaneous => "spontaneous",
    Homebody => "homebody",
    Sensitive => "sensitive",
    Nurturing => "nurturing",
    Loyal => "loyal",
    Funny => "funny",
    Organized => "organized",
    Protective => "protective",
});

/// Current emotional state of a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    #[default]
    Content,
    Peaceful,
    Stressed,
    Overwhelmed,
    Sad,
    Melancholy,
    Excited,
    Playful,
    Mischievous,
    Angry,
    Frustrated,
    Tired,
    Exhausted,
    Nervous,
    Anxious,
    Vulnerable,
    Open,
}

tag_enum!(Mood, "mood", {
    Happy => "happy",
    Content => "content",
    Peaceful => "peaceful",
    Stressed => "stressed",
    Overwhelmed => "overwhelmed",
    Sad => "sad",
    Melancholy => "melancholy",
    Excited => "excited",
    Playful => "playful",
    Mischievous => "mischievous",
    Angry => "angry",
    Frustrated => "frustrated",
    Tired => "tired",
    Exhausted => "exhausted",
    Nervous => "nervous",
    Anxious => "anxious",
    Vulnerable => "vulnerable",
    Open => "open",
});

impl Mood {
    /// Bonus applied to quality time with a partner in this mood.
    pub fn event_bonus(self) -> i32 {
        match self {
            Mood::Excited => 2,
            Mood::Happy | Mood::Peaceful | Mood::Playful | Mood::Mischievous | Mood::Open => 1,
            Mood::Content | Mood::Vulnerable => 0,
            Mood::Stressed
            | Mood::Sad
            | Mood::Melancholy
            | Mood::Frustrated
            | Mood::Tired
            | Mood::Nervous
            | Mood::Anxious => -1,
            Mood::Overwhelmed | Mood::Angry | Mood::Exhausted => -2,
        }
    }
}

/// How a partner prefers to receive affection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoveLanguage {
    Words,
    Acts,
    Gifts,
    Time,
    Touch,
}

tag_enum!(LoveLanguage, "love language", {
    Words => "words",
    Acts => "acts",
    Gifts => "gifts",
    Time => "time",
    Touch => "touch",
});

/// How a partner handles disagreements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStyle {
    Avoidant,
    Direct,
    Collaborative,
    Emotional,
}

tag_enum!(ConflictStyle, "conflict style", {
    Avoidant => "avoidant",
    Direct => "direct",
    Collaborative => "collaborative",
    Emotional => "emotional",
});

/// Quality time activity; each partner has one favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    DeepTalk,
    Adventure,
    CozyNight,
    Physical,
    Creative,
    Gaming,
    Nature,
    Food,
}

tag_enum!(Activity, "activity", {
    DeepTalk => "deep_talk",
    Adventure => "adventure",
    CozyNight => "cozy_night",
    Physical => "physical",
    Creative => "creative",
    Gaming => "gaming",
    Nature => "nature",
    Food => "food",
});

/// The four fixed backstory slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackstorySlot {
    Dream,
    Fear,
    Childhood,
    Past,
}

tag_enum!(BackstorySlot, "backstory slot", {
    Dream => "dream",
    Fear => "fear",
    Childhood => "childhood",
    Past => "past",
});

/// What a partner is secretly planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurpriseKind {
    Gift,
    Date,
    Gesture,
    Memory,
}

tag_enum!(SurpriseKind, "surprise kind", {
    Gift => "gift",
    Date => "date",
    Gesture => "gesture",
    Memory => "memory",
});

/// Kind of person in the player's support network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportKind {
    BestFriend,
    Family,
    Therapist,
    Coworker,
    OnlineFriend,
}

tag_enum!(SupportKind, "support kind", {
    BestFriend => "best_friend",
    Family => "family",
    Therapist => "therapist",
    Coworker => "coworker",
    OnlineFriend => "online_friend",
});

/// Named partner configuration chosen at new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerConfig {
    #[default]
    Solo,
    Couple,
    Triad,
    Polycule,
}

tag_enum!(PartnerConfig, "partner config", {
    Solo => "solo",
    Couple => "couple",
    Triad => "triad",
    Polycule => "polycule",
});

impl PartnerConfig {
    /// Derives the configuration label from a partner count.
    pub fn for_count(count: usize) -> Self {
        match count {
            0 | 1 => PartnerConfig::Solo,
            2 => PartnerConfig::Couple,
            3 => PartnerConfig::Triad,
            _ => PartnerConfig::Polycule,
        }
    }
}

/// Difficulty preset selected for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Cozy,
    #[default]
    Balanced,
    Dramatic,
    Chaotic,
}

tag_enum!(DifficultyLevel, "difficulty", {
    Cozy => "cozy",
    Balanced => "balanced",
    Dramatic => "dramatic",
    Chaotic => "chaotic",
});

/// Kind of partner-initiated action.
///
/// Unrecognized action types in content files deserialize as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Play,
    Initiative,
    Affirmation,
    Support,
    Communicate,
    Vulnerable,
    Affection,
    Care,
    Protect,
    #[serde(other)]
    Other,
}

tag_enum!(ActionType, "action type", {
    Play => "play",
    Initiative => "initiative",
    Affirmation => "affirmation",
    Support => "support",
    Communicate => "communicate",
    Vulnerable => "vulnerable",
    Affection => "affection",
    Care => "care",
    Protect => "protect",
    Other => "other",
});

/// Category of a memory log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    Beginning,
    Weekly,
    Monthly,
    Yearly,
    Surprise,
    Backstory,
    Goal,
    StoryArc,
}

tag_enum!(MemoryKind, "memory kind", {
    Beginning => "beginning",
    Weekly => "weekly",
    Monthly => "monthly",
    Yearly => "yearly",
    Surprise => "surprise",
    Backstory => "backstory",
    Goal => "goal",
    StoryArc => "story_arc",
});
