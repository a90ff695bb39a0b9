//! Story Arcs
//!
//! At most one arc runs at a time. An arc starts at stage 1, exposes each
//! stage as an event once its day arrives, and advances one stage per
//! resolution until the final stage completes it.

use rand::rngs::SmallRng;

use life_events::{ArcInstance, ArcStageRef, ContentRepository, Event, MemoryKind};

use crate::config::EngineConfig;
use crate::random::{chance, pick};
use crate::state::GameState;
use crate::systems::template::{render, PartnerBinding};

/// Result of resolving an arc stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArcProgress {
    /// Moved on to `stage`, due on `next_stage_day`
    Advanced { stage: u32, next_stage_day: u32 },
    Completed { arc_id: String },
    /// The event did not belong to the active arc
    Ignored,
}

/// Maybe starts a new arc. Returns its id when one starts.
pub fn try_start_arc(
    state: &mut GameState,
    content: &ContentRepository,
    config: &EngineConfig,
    rng: &mut SmallRng,
) -> Option<String> {
    if state.active_arc.is_some() || state.day < config.arcs.min_day {
        return None;
    }

    let crisis_weight = config.profile(state.difficulty).crisis_weight;
    if !chance(rng, config.arcs.base_trigger_chance * crisis_weight) {
        return None;
    }

    let available: Vec<_> = content
        .story_arcs
        .iter()
        .filter(|arc| !arc.stages.is_empty() && !state.is_arc_completed(&arc.id))
        .collect();
    let arc = *pick(rng, &available)?;

    state.active_arc = Some(ArcInstance {
        arc_id: arc.id.clone(),
        stage: 1,
        started_day: state.day,
        next_stage_day: state.day + arc.delay_after(1),
    });
    tracing::info!(arc = %arc.id, day = state.day, "Story arc started");
    Some(arc.id.clone())
}

/// The active arc's current stage, once it is due.
pub fn current_arc_event(
    state: &GameState,
    content: &ContentRepository,
    rng: &mut SmallRng,
) -> Option<Event> {
    let instance = state.active_arc.as_ref()?;
    if state.day < instance.next_stage_day {
        return None;
    }
    let Some(arc) = content.arc(&instance.arc_id) else {
        tracing::warn!(arc = %instance.arc_id, "Active arc has no definition");
        return None;
    };
    let stage = arc.stage(instance.stage)?;
    let event = Event::from_arc_stage(arc, stage);
    Some(render(&event, state, &PartnerBinding::Auto, rng))
}

/// Advances the active arc after one of its stages resolved.
pub fn advance_arc(
    state: &mut GameState,
    content: &ContentRepository,
    stage_ref: &ArcStageRef,
    success: bool,
) -> ArcProgress {
    let Some(instance) = state.active_arc.as_ref() else {
        return ArcProgress::Ignored;
    };
    if instance.arc_id != stage_ref.arc_id {
        tracing::debug!(event_arc = %stage_ref.arc_id, active = %instance.arc_id, "Stage from inactive arc");
        return ArcProgress::Ignored;
    }

    let Some(arc) = content.arc(&instance.arc_id) else {
        tracing::warn!(arc = %instance.arc_id, "Dropping arc with no definition");
        state.active_arc = None;
        return ArcProgress::Ignored;
    };

    let current = instance.stage;
    if current >= arc.final_stage() {
        let arc_id = arc.id.clone();
        state.active_arc = None;
        state.completed_arcs.push(arc_id.clone());

        let outcome = if success { "Success" } else { "Struggled through" };
        state.add_memory(
            MemoryKind::StoryArc,
            format!("Story arc '{}' - {}", arc.title, outcome),
            None,
        );

        let completed = state.completed_arcs.len();
        if completed == 1 {
            state.unlock("First Arc Complete", "Survived your first major story arc!");
        }
        if completed >= 3 {
            state.unlock("Story Veteran", "Completed 3 story arcs!");
        }
        tracing::info!(arc = %arc_id, success, "Story arc complete");
        return ArcProgress::Completed { arc_id };
    }

    let delay = arc.delay_after(current);
    let next_stage_day = state.day + delay;
    if let Some(instance) = state.active_arc.as_mut() {
        instance.stage = current + 1;
        instance.next_stage_day = next_stage_day;
    }
    ArcProgress::Advanced {
        stage: current + 1,
        next_stage_day,
    }
}

/// Drops an active arc that cannot progress: its definition is missing or
/// it sits on a stage the definition lacks. Returns true when dropped.
pub fn drop_stuck_arc(state: &mut GameState, content: &ContentRepository) -> bool {
    let Some(instance) = state.active_arc.as_ref() else {
        return false;
    };
    let stuck = match content.arc(&instance.arc_id) {
        None => true,
        Some(arc) => arc.stage(instance.stage).is_none(),
    };
    if stuck {
        tracing::warn!(
            arc = %instance.arc_id,
            stage = instance.stage,
            "Dropping active arc that cannot progress"
        );
        state.active_arc = None;
    }
    stuck
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Partner;
    use life_events::{fixtures, DifficultyLevel};
    use rand::SeedableRng;

    fn state() -> GameState {
        let mut rng = SmallRng::seed_from_u64(12345);
        let mut state = GameState::empty("Jordan", DifficultyLevel::Balanced);
        state.partners.push(Partner::generate("Riley", None, &mut rng));
        state
    }

    fn content() -> ContentRepository {
        let mut content = ContentRepository::new();
        content.story_arcs = fixtures::sample_story_arcs();
        content
    }

    fn always_trigger() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.arcs.base_trigger_chance = 1.0;
        config
    }

    #[test]
    fn test_arc_never_starts_before_min_day() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = state();
        s.day = 9;
        assert!(try_start_arc(&mut s, &content(), &always_trigger(), &mut rng).is_none());
        s.day = 10;
        assert_eq!(
            try_start_arc(&mut s, &content(), &always_trigger(), &mut rng).as_deref(),
            Some("moving_in")
        );
        let arc = s.active_arc.as_ref().unwrap();
        assert_eq!(arc.stage, 1);
        assert_eq!(arc.next_stage_day, 12);
    }

    #[test]
    fn test_only_one_active_arc() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = state();
        s.day = 15;
        assert!(try_start_arc(&mut s, &content(), &always_trigger(), &mut rng).is_some());
        assert!(try_start_arc(&mut s, &content(), &always_trigger(), &mut rng).is_none());
    }

    #[test]
    fn test_stage_exposed_only_when_due() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = state();
        s.day = 10;
        try_start_arc(&mut s, &content(), &always_trigger(), &mut rng);

        s.day = 11;
        assert!(current_arc_event(&s, &content(), &mut rng).is_none());
        s.day = 12;
        let event = current_arc_event(&s, &content(), &mut rng).unwrap();
        assert_eq!(event.id, "moving_in_stage_1");
        assert!(event.title.starts_with("[Moving In] "));
    }

    #[test]
    fn test_full_progression_and_completion() {
        let mut rng = SmallRng::seed_from_u64(1);
        let content = content();
        let mut s = state();
        s.day = 10;
        try_start_arc(&mut s, &content, &always_trigger(), &mut rng);

        s.day = 12;
        let stage1 = current_arc_event(&s, &content, &mut rng).unwrap();
        let progress = advance_arc(&mut s, &content, stage1.arc.as_ref().unwrap(), true);
        // Stage 1 declares a 2 day delay
        assert_eq!(
            progress,
            ArcProgress::Advanced {
                stage: 2,
                next_stage_day: 14
            }
        );

        s.day = 14;
        let stage2 = current_arc_event(&s, &content, &mut rng).unwrap();
        let progress = advance_arc(&mut s, &content, stage2.arc.as_ref().unwrap(), false);
        assert_eq!(
            progress,
            ArcProgress::Advanced {
                stage: 3,
                next_stage_day: 18
            }
        );

        s.day = 18;
        let stage3 = current_arc_event(&s, &content, &mut rng).unwrap();
        assert!(stage3.arc.as_ref().unwrap().is_final_stage);
        let progress = advance_arc(&mut s, &content, stage3.arc.as_ref().unwrap(), true);
        assert_eq!(
            progress,
            ArcProgress::Completed {
                arc_id: "moving_in".to_string()
            }
        );

        assert!(s.active_arc.is_none());
        assert_eq!(s.completed_arcs, vec!["moving_in"]);
        assert!(s.achievements.is_unlocked("First Arc Complete"));
        assert_eq!(
            s.memories.last().unwrap().description,
            "Story arc 'Moving In' - Success"
        );
    }

    #[test]
    fn test_completed_arcs_never_reoffered() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = state();
        s.day = 50;
        s.completed_arcs.push("moving_in".to_string());
        for _ in 0..20 {
            assert!(try_start_arc(&mut s, &content(), &always_trigger(), &mut rng).is_none());
        }
    }

    #[test]
    fn test_missing_definition_yields_no_event() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = state();
        s.day = 20;
        s.active_arc = Some(ArcInstance {
            arc_id: "retired_arc".to_string(),
            stage: 1,
            started_day: 10,
            next_stage_day: 12,
        });
        assert!(current_arc_event(&s, &content(), &mut rng).is_none());

        let stage_ref = ArcStageRef {
            arc_id: "retired_arc".to_string(),
            stage: 1,
            is_final_stage: false,
        };
        assert_eq!(advance_arc(&mut s, &content(), &stage_ref, true), ArcProgress::Ignored);
        assert!(s.active_arc.is_none());
    }

    #[test]
    fn test_stuck_arcs_are_dropped() {
        let content = content();
        let final_stage = fixtures::moving_in_arc().final_stage();
        for stage in [0, final_stage + 1] {
            let mut s = state();
            s.active_arc = Some(ArcInstance {
                arc_id: "moving_in".to_string(),
                stage,
                started_day: 10,
                next_stage_day: 10,
            });
            assert!(drop_stuck_arc(&mut s, &content));
            assert!(s.active_arc.is_none());
        }

        let mut unknown = state();
        unknown.active_arc = Some(ArcInstance {
            arc_id: "retired_arc".to_string(),
            stage: 1,
            started_day: 10,
            next_stage_day: 10,
        });
        assert!(drop_stuck_arc(&mut unknown, &content));
    }

    #[test]
    fn test_valid_arc_is_kept_and_restarts_after_drop() {
        let mut rng = SmallRng::seed_from_u64(1);
        let content = content();
        let mut s = state();
        s.day = 20;
        s.active_arc = Some(ArcInstance {
            arc_id: "moving_in".to_string(),
            stage: 2,
            started_day: 10,
            next_stage_day: 20,
        });
        assert!(!drop_stuck_arc(&mut s, &content));
        assert!(current_arc_event(&s, &content, &mut rng).is_some());

        s.active_arc.as_mut().unwrap().stage = 0;
        drop_stuck_arc(&mut s, &content);
        assert!(try_start_arc(&mut s, &content, &always_trigger(), &mut rng).is_some());
    }
}
