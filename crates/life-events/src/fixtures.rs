//! Sample data fixtures for testing.
//!
//! Ready-made content and saves for other crates' tests.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // life-events = { path = "../life-events", features = ["test-fixtures"] }
//!
//! use life_events::fixtures;
//!
//! let content = fixtures::sample_content();
//! let arc = fixtures::moving_in_arc();
//! ```

use crate::{
    ArcDefinition, ContentRepository, EffectMap, EventCategory, EventRecord,
    PartnerActionRecord,
};

/// Path of the sample content directory, for loader tests.
pub const SAMPLE_CONTENT_DIR: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/content");

fn parse<T: serde::de::DeserializeOwned>(name: &str, json: &str) -> T {
    serde_json::from_str(json).unwrap_or_else(|e| panic!("Failed to parse {}: {}", name, e))
}

fn category_json(category: EventCategory) -> &'static str {
    match category {
        EventCategory::GoodSurprises => include_str!("../tests/fixtures/content/good_surprises.json"),
        EventCategory::RelationshipEvents => {
            include_str!("../tests/fixtures/content/relationship_events.json")
        }
        EventCategory::HealthEvents => include_str!("../tests/fixtures/content/health_events.json"),
        EventCategory::NaturalDisasters => {
            include_str!("../tests/fixtures/content/natural_disasters.json")
        }
        EventCategory::Milestones => include_str!("../tests/fixtures/content/milestones.json"),
        EventCategory::Complications => include_str!("../tests/fixtures/content/complications.json"),
        EventCategory::CareerEvents => include_str!("../tests/fixtures/content/career_events.json"),
        EventCategory::PersonalGrowth => {
            include_str!("../tests/fixtures/content/personal_growth.json")
        }
        EventCategory::IntimateEvents => {
            include_str!("../tests/fixtures/content/intimate_events.json")
        }
        _ => "[]",
    }
}

/// Sample events for one content category.
pub fn sample_events(category: EventCategory) -> Vec<EventRecord> {
    parse(category.as_str(), category_json(category))
}

/// Contextual events: a rainy-day event, a support-network call and a
/// metamour tension event.
pub fn sample_contextual_events() -> Vec<EventRecord> {
    parse(
        "contextual_events",
        include_str!("../tests/fixtures/content/contextual_events.json"),
    )
}

/// One three-stage arc, `moving_in`.
pub fn sample_story_arcs() -> Vec<ArcDefinition> {
    parse(
        "story_arcs",
        include_str!("../tests/fixtures/content/story_arcs.json"),
    )
}

/// Three partner actions: play, support and vulnerable.
pub fn sample_partner_actions() -> Vec<PartnerActionRecord> {
    parse(
        "partner_actions",
        include_str!("../tests/fixtures/content/partner_actions.json"),
    )
}

pub fn sample_daily_moments() -> Vec<String> {
    parse(
        "daily_moments",
        include_str!("../tests/fixtures/content/daily_moments.json"),
    )
}

/// Complete sample repository with every category populated.
pub fn sample_content() -> ContentRepository {
    let mut content = ContentRepository::new();
    for category in EventCategory::CATEGORIZED {
        content.set_category(*category, sample_events(*category));
    }
    content.contextual = sample_contextual_events();
    content.story_arcs = sample_story_arcs();
    content.partner_actions = sample_partner_actions();
    content.daily_moments = sample_daily_moments();
    content
}

/// The `moving_in` arc from the samples.
pub fn moving_in_arc() -> ArcDefinition {
    sample_story_arcs()
        .into_iter()
        .find(|a| a.id == "moving_in")
        .expect("moving_in arc should exist in fixtures")
}

/// Single-map event: happiness +10, stress -4, DC 12.
pub fn scenario_event() -> EventRecord {
    EventRecord::new("scenario_good_day", "A Good Day")
        .with_description("Everything goes right for you and {partner}.")
        .with_roll_requirement(12)
        .with_responses(["Savor it", "Share it", "Plan another"])
        .with_effect("happiness", 10)
        .with_effect("stress", -4)
}

/// Split-map event modeled on a relationship crisis.
pub fn split_event() -> EventRecord {
    let success: EffectMap = [("relationship".to_string(), 8), ("stress".to_string(), -4)]
        .into_iter()
        .collect();
    let failure: EffectMap = [("relationship".to_string(), -8), ("stress".to_string(), 3)]
        .into_iter()
        .collect();
    EventRecord::new("scenario_crossroads", "Crossroads")
        .with_description("{partner} needs to talk.")
        .with_roll_requirement(16)
        .with_responses(["Talk it out", "Write a letter", "Suggest a reset"])
        .with_effect("relationship", -3)
        .with_effect("stress", 5)
        .with_split_effects(success, failure)
}

/// An older partial save: missing partner fields, an unknown arc, a
/// non-canonical metamour key and an out-of-range stat.
pub fn legacy_save_json() -> &'static str {
    include_str!("../tests/fixtures/legacy_save.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_content_loads() {
        let content = sample_content();
        assert_eq!(content.events(EventCategory::GoodSurprises).len(), 2);
        assert_eq!(content.contextual.len(), 3);
        assert_eq!(content.story_arcs.len(), 1);
        assert_eq!(content.partner_actions.len(), 3);
        assert!(!content.daily_moments.is_empty());
    }

    #[test]
    fn test_every_category_has_samples() {
        for category in EventCategory::CATEGORIZED {
            assert!(
                !sample_events(*category).is_empty(),
                "{} should have sample events",
                category
            );
        }
    }

    #[test]
    fn test_moving_in_arc_stages() {
        let arc = moving_in_arc();
        assert_eq!(arc.stages.len(), 3);
        assert_eq!(arc.delay_after(1), 2);
        assert_eq!(arc.delay_after(2), 4);
    }

    #[test]
    fn test_contextual_events_have_conditions() {
        assert!(sample_contextual_events()
            .iter()
            .all(|e| e.conditions.is_some()));
    }

    #[test]
    fn test_legacy_save_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(legacy_save_json()).unwrap();
        assert_eq!(value["day"], 42);
    }
}
