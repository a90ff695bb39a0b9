//! Shared Goals
//!
//! Long-term goals gain progress every day while active. Completion pays out
//! the goal's rewards once; a completed goal can never be restarted.

use life_events::{GoalInstance, MemoryKind};

use crate::config::{EngineConfig, GoalDefinition};
use crate::state::GameState;

/// Why a goal could not be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalRejection {
    Unknown,
    AlreadyActive,
    AlreadyCompleted,
}

/// Starts a defined goal that is neither active nor completed.
pub fn start_goal(state: &mut GameState, config: &EngineConfig, goal_id: &str) -> Result<(), GoalRejection> {
    let definition = config.goal(goal_id).ok_or(GoalRejection::Unknown)?;
    if let Some(existing) = state.goals.get(goal_id) {
        if existing.completed {
            return Err(GoalRejection::AlreadyCompleted);
        }
        if existing.active {
            return Err(GoalRejection::AlreadyActive);
        }
    }
    state
        .goals
        .insert(goal_id.to_string(), GoalInstance::started(state.day));
    tracing::info!(goal = %definition.id, label = %definition.label, "Goal started");
    Ok(())
}

/// Adds the daily progress to every active goal. Returns the labels of
/// goals completed today.
pub fn progress_goals(state: &mut GameState, config: &EngineConfig) -> Vec<String> {
    let amount = config.daily.goal_progress_per_day;
    let mut finished = Vec::new();

    for (goal_id, goal) in state.goals.iter_mut() {
        if !goal.active {
            continue;
        }
        let Some(definition) = config.goal(goal_id) else {
            continue;
        };
        goal.progress = (goal.progress + amount).min(definition.target);
        if goal.progress >= definition.target {
            goal.active = false;
            goal.completed = true;
            goal.completed_day = Some(state.day);
            finished.push(definition);
        }
    }

    finished
        .into_iter()
        .map(|definition| {
            complete_goal(state, definition);
            definition.label.clone()
        })
        .collect()
}

/// Caps restored progress at each goal's target. Goals without a definition
/// are left alone; they never progress.
pub fn cap_to_targets(state: &mut GameState, config: &EngineConfig) {
    for (goal_id, goal) in state.goals.iter_mut() {
        let Some(definition) = config.goal(goal_id) else {
            continue;
        };
        if goal.progress > definition.target {
            tracing::warn!(goal = %goal_id, progress = goal.progress, "Capping goal progress at target");
            goal.progress = definition.target;
        }
    }
}

fn complete_goal(state: &mut GameState, definition: &GoalDefinition) {
    for (key, delta) in &definition.rewards {
        if !state.apply_effect(key, *delta, None) {
            tracing::warn!(goal = %definition.id, key = %key, "Ignoring unknown goal reward");
        }
    }
    state.add_memory(MemoryKind::Goal, format!("Achieved: {}", definition.label), None);
    state.unlock(&format!("Goal: {}", definition.label), &definition.description);
    tracing::info!(goal = %definition.id, day = state.day, "Goal completed");
}
