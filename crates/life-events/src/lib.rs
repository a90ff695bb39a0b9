//! Shared data types for the life simulation.
//!
//! This crate contains pure data structures with no simulation logic:
//! closed vocabularies, player stats, content schemas, progress records and
//! the persisted snapshot layout. The engine lives in `life-core`.

pub mod calendar;
pub mod content;
pub mod progress;
pub mod snapshot;
pub mod stats;
pub mod vocab;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export calendar types
pub use calendar::{Season, Weather, DAYS_PER_SEASON};

// Re-export vocabulary types
pub use vocab::{
    ActionType, Activity, BackstorySlot, ConflictStyle, DifficultyLevel, LoveLanguage,
    MemoryKind, Mood, PartnerConfig, PartnerTrait, SupportKind, SurpriseKind, UnknownTag,
};

// Re-export stat types
pub use stats::{clamp_stat, PlayerStats, Stat, STAT_MAX, STAT_MIN};

// Re-export content types
pub use content::{
    ArcDefinition, ArcStage, ArcStageRef, Bounds, ContentRepository, DaysTogether, EffectMap,
    Event, EventCategory, EventConditions, EventRecord, PartnerActionRecord,
    DEFAULT_ROLL_REQUIREMENT, DEFAULT_STAGE_DELAY, RELATIONSHIP_KEY,
};

// Re-export progress types
pub use progress::{
    Achievement, AchievementBook, ArcInstance, GoalInstance, HistoryEntry, InsideJoke, Memory,
    PartnerActionEntry, SupportPerson, SurpriseInstance,
};

// Re-export snapshot types
pub use snapshot::{
    metamour_key, metamour_key_forms, PartnerSnapshot, SessionSnapshot, METAMOUR_SEPARATOR,
    SNAPSHOT_SCHEMA_VERSION,
};
