//! Content Types
//!
//! Schemas for the read-only narrative content (event records, contextual
//! conditions, story arcs and partner actions) and the rendered [`Event`]
//! value handed to presentation code.
//!
//! Content records are templates. They may contain `{partner}` style tokens
//! which are only filled in when an [`Event`] is rendered.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar::{Season, Weather};
use crate::stats::Stat;
use crate::vocab::{tag_enum, ActionType, LoveLanguage, Mood, PartnerTrait};

/// Effect key that targets partner relationship values instead of a stat.
pub const RELATIONSHIP_KEY: &str = "relationship";

/// Default difficulty check when a record omits `roll_requirement`.
pub const DEFAULT_ROLL_REQUIREMENT: i32 = 10;

/// Default delay in days before the next arc stage.
pub const DEFAULT_STAGE_DELAY: u32 = 3;

/// Signed effect deltas keyed by stat name or `"relationship"`.
pub type EffectMap = BTreeMap<String, i32>;

fn default_roll_requirement() -> i32 {
    DEFAULT_ROLL_REQUIREMENT
}

fn default_stage_delay() -> u32 {
    DEFAULT_STAGE_DELAY
}

/// Event category. The first nine map one-to-one onto content files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    GoodSurprises,
    RelationshipEvents,
    HealthEvents,
    NaturalDisasters,
    Milestones,
    Complications,
    CareerEvents,
    PersonalGrowth,
    IntimateEvents,
    Contextual,
    StoryArc,
    SpecialEvent,
    CrisisCascade,
    PartnerAction,
}

tag_enum!(EventCategory, "event category", {
    GoodSurprises => "good_surprises",
    RelationshipEvents => "relationship_events",
    HealthEvents => "health_events",
    NaturalDisasters => "natural_disasters",
    Milestones => "milestones",
    Complications => "complications",
    CareerEvents => "career_events",
    PersonalGrowth => "personal_growth",
    IntimateEvents => "intimate_events",
    Contextual => "contextual",
    StoryArc => "story_arc",
    SpecialEvent => "special_event",
    CrisisCascade => "crisis_cascade",
    PartnerAction => "partner_action",
});

impl EventCategory {
    /// Categories loaded from `<category>.json` files.
    pub const CATEGORIZED: &'static [EventCategory] = &[
        EventCategory::GoodSurprises,
        EventCategory::RelationshipEvents,
        EventCategory::HealthEvents,
        EventCategory::NaturalDisasters,
        EventCategory::Milestones,
        EventCategory::Complications,
        EventCategory::CareerEvents,
        EventCategory::PersonalGrowth,
        EventCategory::IntimateEvents,
    ];

    /// Content file name for categorized events.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }

    /// Negative-event categories scaled by crisis weight.
    pub fn is_crisis(&self) -> bool {
        matches!(
            self,
            EventCategory::Complications
                | EventCategory::NaturalDisasters
                | EventCategory::HealthEvents
        )
    }

    /// Categories that can be drawn as a crisis cascade.
    pub fn is_cascade_source(&self) -> bool {
        matches!(self, EventCategory::Complications | EventCategory::HealthEvents)
    }

    /// Categories that count as "something exciting happened".
    pub fn is_exciting(&self) -> bool {
        matches!(
            self,
            EventCategory::GoodSurprises
                | EventCategory::Milestones
                | EventCategory::StoryArc
                | EventCategory::SpecialEvent
        )
    }

    /// Categories eligible for the shared-moment relationship bonus.
    pub fn is_bonding(&self) -> bool {
        matches!(
            self,
            EventCategory::GoodSurprises | EventCategory::Milestones | EventCategory::PersonalGrowth
        )
    }
}

/// Optional numeric bounds. Absent bounds always pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Bounds {
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// True when the value satisfies every present bound.
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    /// True when the value satisfies at least one present bound.
    pub fn touches(&self, value: f64) -> bool {
        self.min.is_some_and(|min| value >= min) || self.max.is_some_and(|max| value <= max)
    }
}

/// `days_together` accepts either bounds or a bare minimum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DaysTogether {
    AtLeast(u32),
    Within(Bounds),
}

impl DaysTogether {
    pub fn contains(&self, days: u32) -> bool {
        match self {
            DaysTogether::AtLeast(min) => days >= *min,
            DaysTogether::Within(bounds) => bounds.contains(days as f64),
        }
    }
}

/// Conjunctive predicate gating a contextual event. Every clause is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConditions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<Vec<Weather>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_mood: Option<Vec<Mood>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_traits: Option<Vec<PartnerTrait>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_love_language: Option<LoveLanguage>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub player_stat: BTreeMap<Stat, Bounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<Bounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<Bounds>,
    pub has_inside_jokes: bool,
    pub has_active_goal: bool,
    pub has_metamours: bool,
    /// Matches when any single edge satisfies either bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metamour_relationship: Option<Bounds>,
    pub has_support_network: bool,
    pub backstory_unrevealed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_together: Option<DaysTogether>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_growth: Option<Bounds>,
    pub conflict_active: bool,
    pub can_surprise: bool,
}

impl EventConditions {
    pub fn is_empty(&self) -> bool {
        *self == EventConditions::default()
    }
}

/// A categorized or contextual event template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_roll_requirement")]
    pub roll_requirement: i32,
    #[serde(default)]
    pub responses: Vec<String>,
    #[serde(default)]
    pub effects: EffectMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects_success: Option<EffectMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects_failure: Option<EffectMap>,
    /// Gate for intimate events (average relationship)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_relationship: Option<f64>,
    #[serde(default)]
    pub group_event: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<EventConditions>,
}

impl EventRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            roll_requirement: DEFAULT_ROLL_REQUIREMENT,
            responses: Vec::new(),
            effects: EffectMap::new(),
            effects_success: None,
            effects_failure: None,
            min_relationship: None,
            group_event: false,
            conditions: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_roll_requirement(mut self, dc: i32) -> Self {
        self.roll_requirement = dc;
        self
    }

    pub fn with_responses<I, S>(mut self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responses = responses.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_effect(mut self, key: impl Into<String>, delta: i32) -> Self {
        self.effects.insert(key.into(), delta);
        self
    }

    pub fn with_split_effects(mut self, success: EffectMap, failure: EffectMap) -> Self {
        self.effects_success = Some(success);
        self.effects_failure = Some(failure);
        self
    }

    pub fn with_conditions(mut self, conditions: EventConditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn group(mut self) -> Self {
        self.group_event = true;
        self
    }
}

/// One step of a story arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcStage {
    pub stage: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_roll_requirement")]
    pub roll_requirement: i32,
    #[serde(default)]
    pub responses: Vec<String>,
    #[serde(default)]
    pub effects: EffectMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects_success: Option<EffectMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects_failure: Option<EffectMap>,
    #[serde(default = "default_stage_delay")]
    pub next_stage_delay: u32,
}

/// A multi-stage narrative arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcDefinition {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stages: Vec<ArcStage>,
}

impl ArcDefinition {
    /// Looks up a stage by its declared 1-indexed number.
    pub fn stage(&self, number: u32) -> Option<&ArcStage> {
        self.stages.iter().find(|s| s.stage == number)
    }

    /// Declared delay of the stage at `number`, falling back to the default.
    pub fn delay_after(&self, number: u32) -> u32 {
        self.stage(number)
            .map(|s| s.next_stage_delay)
            .unwrap_or(DEFAULT_STAGE_DELAY)
    }

    pub fn final_stage(&self) -> u32 {
        self.stages.len() as u32
    }
}

/// A partner-initiated micro-event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerActionRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub action_type: ActionType,
    #[serde(default = "default_roll_requirement")]
    pub roll_requirement: i32,
    #[serde(default)]
    pub partner_choices: Vec<String>,
    #[serde(default)]
    pub effects: EffectMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects_success: Option<EffectMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects_failure: Option<EffectMap>,
}

/// Identifies the arc stage a rendered event came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcStageRef {
    pub arc_id: String,
    pub stage: u32,
    pub is_final_stage: bool,
}

/// A rendered, ready-to-resolve event.
///
/// Produced fresh for every draw; content templates are never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub roll_requirement: i32,
    pub responses: Vec<String>,
    pub effects: EffectMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects_success: Option<EffectMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects_failure: Option<EffectMap>,
    #[serde(default)]
    pub group_event: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub involved_partner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc: Option<ArcStageRef>,
}

fn non_empty(map: &Option<EffectMap>) -> Option<&EffectMap> {
    map.as_ref().filter(|m| !m.is_empty())
}

impl Event {
    /// Unrendered event built from a categorized or contextual record.
    pub fn from_record(record: &EventRecord, category: EventCategory) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            category,
            roll_requirement: record.roll_requirement,
            responses: record.responses.clone(),
            effects: record.effects.clone(),
            effects_success: record.effects_success.clone(),
            effects_failure: record.effects_failure.clone(),
            group_event: record.group_event,
            involved_partner: None,
            arc: None,
        }
    }

    /// Unrendered event for one stage of an arc.
    pub fn from_arc_stage(arc: &ArcDefinition, stage: &ArcStage) -> Self {
        Self {
            id: format!("{}_stage_{}", arc.id, stage.stage),
            title: format!("[{}] {}", arc.title, stage.title),
            description: stage.description.clone(),
            category: EventCategory::StoryArc,
            roll_requirement: stage.roll_requirement,
            responses: stage.responses.clone(),
            effects: stage.effects.clone(),
            effects_success: stage.effects_success.clone(),
            effects_failure: stage.effects_failure.clone(),
            group_event: false,
            involved_partner: None,
            arc: Some(ArcStageRef {
                arc_id: arc.id.clone(),
                stage: stage.stage,
                is_final_stage: stage.stage == arc.final_stage(),
            }),
        }
    }

    /// Unrendered event for a partner action; choices become responses.
    pub fn from_partner_action(action: &PartnerActionRecord) -> Self {
        Self {
            id: action.id.clone(),
            title: action.title.clone(),
            description: action.description.clone(),
            category: EventCategory::PartnerAction,
            roll_requirement: action.roll_requirement,
            responses: action.partner_choices.clone(),
            effects: action.effects.clone(),
            effects_success: action.effects_success.clone(),
            effects_failure: action.effects_failure.clone(),
            group_event: false,
            involved_partner: None,
            arc: None,
        }
    }

    /// True when the event declares a non-empty success or failure map.
    pub fn has_split_effects(&self) -> bool {
        non_empty(&self.effects_success).is_some() || non_empty(&self.effects_failure).is_some()
    }

    /// The non-empty outcome-specific map matching `success`, if declared.
    pub fn split_effects(&self, success: bool) -> Option<&EffectMap> {
        if success {
            non_empty(&self.effects_success)
        } else {
            non_empty(&self.effects_failure)
        }
    }
}

/// All narrative content available to a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentRepository {
    pub categories: BTreeMap<EventCategory, Vec<EventRecord>>,
    pub contextual: Vec<EventRecord>,
    pub story_arcs: Vec<ArcDefinition>,
    pub partner_actions: Vec<PartnerActionRecord>,
    pub daily_moments: Vec<String>,
}

impl ContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events in a category; empty when the category was never loaded.
    pub fn events(&self, category: EventCategory) -> &[EventRecord] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn set_category(&mut self, category: EventCategory, events: Vec<EventRecord>) {
        self.categories.insert(category, events);
    }

    pub fn arc(&self, arc_id: &str) -> Option<&ArcDefinition> {
        self.story_arcs.iter().find(|a| a.id == arc_id)
    }

    /// Total number of categorized events.
    pub fn categorized_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categorized_count() == 0
            && self.contextual.is_empty()
            && self.story_arcs.is_empty()
            && self.partner_actions.is_empty()
    }
}
