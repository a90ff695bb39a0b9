//! Save and Load
//!
//! Converts between the live [`GameState`] and the persisted
//! [`SessionSnapshot`]. Loading is forgiving: anything an older or
//! hand-edited save lacks is regenerated and logged.

use rand::rngs::SmallRng;
use rand::Rng;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use uuid::Uuid;

use life_events::{clamp_stat, PartnerConfig, SessionSnapshot, SNAPSHOT_SCHEMA_VERSION};

use crate::components::{MetamourGraph, Partner};
use crate::error::PersistenceError;
use crate::state::{generate_support_network, GameState, MAX_ENERGY};
use crate::systems::dynamics::random_weather;

/// Fresh random session id.
pub fn new_session_id(rng: &mut SmallRng) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen::<[u8; 16]>()).into_uuid()
}

/// Snapshot of the full state.
pub fn to_snapshot(state: &GameState) -> SessionSnapshot {
    SessionSnapshot {
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        session_id: Some(state.session_id),
        player_name: state.player_name.clone(),
        partner_config: state.partner_config,
        difficulty: state.difficulty,
        include_intimate: state.include_intimate,
        day: state.day,
        stats: state.stats.clone(),
        partners: state.partners.iter().map(Partner::to_snapshot).collect(),
        metamours: state.metamours.to_keyed(),
        active_arc: state.active_arc.clone(),
        completed_arcs: state.completed_arcs.clone(),
        goals: state.goals.clone(),
        pending_surprises: state.pending_surprises.clone(),
        memories: state.memories.clone(),
        achievements: state.achievements.clone(),
        history: state.history.clone(),
        partner_actions: state.partner_actions.clone(),
        inside_jokes: state.inside_jokes.clone(),
        support_network: Some(state.support_network.clone()),
        weather: Some(state.weather),
        season: Some(state.season),
        energy: Some(state.energy),
        last_exciting_day: state.last_exciting_day,
        last_intimate_day: state.last_intimate_day,
    }
}

/// Rebuilds state from a snapshot, backfilling whatever is missing.
pub fn from_snapshot(snapshot: SessionSnapshot, rng: &mut SmallRng) -> GameState {
    let mut state = GameState::empty(snapshot.player_name.clone(), snapshot.difficulty);

    state.session_id = match snapshot.session_id {
        Some(id) => id,
        None => {
            tracing::warn!("Save has no session id; generating one");
            new_session_id(rng)
        }
    };
    state.include_intimate = snapshot.include_intimate;
    state.day = snapshot.day;
    state.stats = snapshot.stats.clone();
    state.stats.clamp_all();

    for partner_snapshot in &snapshot.partners {
        if state.partner(&partner_snapshot.name).is_some() {
            tracing::warn!(partner = %partner_snapshot.name, "Dropping duplicate partner");
            continue;
        }
        let (partner, backfilled) = Partner::from_snapshot(partner_snapshot, rng);
        if !backfilled.is_empty() {
            tracing::warn!(
                partner = %partner.name,
                fields = ?backfilled,
                "Backfilled partner fields"
            );
        }
        state.partners.push(partner);
    }
    state.partner_config = if snapshot.partners.is_empty() {
        snapshot.partner_config
    } else {
        PartnerConfig::for_count(state.partner_count())
    };

    state.metamours = MetamourGraph::from_keyed(&snapshot.metamours, &state.partner_names(), rng);

    state.active_arc = snapshot.active_arc;
    state.completed_arcs = snapshot.completed_arcs;
    state.goals = snapshot.goals;
    for (goal_id, goal) in state.goals.iter_mut() {
        if goal.completed && goal.active {
            tracing::warn!(goal = %goal_id, "Deactivating completed goal");
            goal.active = false;
        }
    }
    state.pending_surprises = snapshot.pending_surprises;
    state.memories = snapshot.memories;
    state.achievements = snapshot.achievements;
    state.history = snapshot.history;
    state.partner_actions = snapshot.partner_actions;
    state.inside_jokes = snapshot.inside_jokes;

    state.support_network = match snapshot.support_network {
        Some(network) => network,
        None => {
            tracing::warn!("Save has no support network; generating one");
            generate_support_network(rng)
        }
    };
    for person in &mut state.support_network {
        person.relationship = clamp_stat(person.relationship);
    }

    state.season = snapshot.season.unwrap_or_default();
    state.weather = match snapshot.weather {
        Some(weather) => weather,
        None => random_weather(state.season, rng),
    };
    state.energy = snapshot.energy.unwrap_or(MAX_ENERGY).clamp(0, MAX_ENERGY);
    state.last_exciting_day = snapshot.last_exciting_day;
    state.last_intimate_day = snapshot.last_intimate_day;

    state
}

/// Writes the state as pretty JSON.
pub fn save_to_file(state: &GameState, path: &Path) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &to_snapshot(state))?;
    tracing::info!(path = %path.display(), day = state.day, "Saved session");
    Ok(())
}

/// Reads a saved session.
pub fn load_from_file(path: &Path, rng: &mut SmallRng) -> Result<GameState, PersistenceError> {
    let text = fs::read_to_string(path)?;
    let snapshot = SessionSnapshot::from_json(&text)?;
    let state = from_snapshot(snapshot, rng);
    tracing::info!(
        path = %path.display(),
        day = state.day,
        partners = state.partner_count(),
        "Loaded session"
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_events::{fixtures, DifficultyLevel, GoalInstance, Stat};
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn state() -> GameState {
        let mut rng = SmallRng::seed_from_u64(12345);
        let mut state = GameState::empty("Jordan", DifficultyLevel::Dramatic);
        state.session_id = new_session_id(&mut rng);
        state.partners.push(Partner::generate("Riley", None, &mut rng));
        state.partners.push(Partner::generate("Casey", None, &mut rng));
        state.metamours = MetamourGraph::generate(&state.partner_names(), &mut rng);
        state.support_network = generate_support_network(&mut rng);
        state.partner_config = PartnerConfig::Couple;
        state.day = 9;
        state
    }

    #[test]
    fn test_snapshot_round_trip_preserves_state() {
        let original = state();
        let mut rng = SmallRng::seed_from_u64(1);
        let restored = from_snapshot(to_snapshot(&original), &mut rng);
        assert_eq!(restored, original);
    }

    #[test]
    fn test_metamours_persist_with_canonical_keys() {
        let snapshot = to_snapshot(&state());
        assert_eq!(snapshot.metamours.len(), 1);
        assert!(snapshot.metamours.contains_key("Casey|Riley"));
    }

    #[test]
    fn test_legacy_save_is_backfilled() {
        let mut rng = SmallRng::seed_from_u64(1);
        let snapshot = SessionSnapshot::from_json(fixtures::legacy_save_json()).unwrap();
        let state = from_snapshot(snapshot, &mut rng);

        assert_eq!(state.day, 42);
        assert_eq!(state.difficulty, DifficultyLevel::Dramatic);
        assert_eq!(state.stats.get(Stat::Happiness), 100);
        assert_eq!(state.partner_count(), 2);
        assert_eq!(state.partner_config, PartnerConfig::Couple);
        assert!(!state.partners[0].traits.is_empty());
        assert_eq!(state.partners[0].backstory.len(), 4);
        assert_eq!(state.metamours.get("Casey", "Riley"), Some(61));
        assert!(!state.support_network.is_empty());
        assert_eq!(state.energy, MAX_ENERGY);
        assert!(!state.session_id.is_nil());
        assert_eq!(state.goals["pet"].progress, 20);
    }

    #[test]
    fn test_completed_goals_load_inactive() {
        let mut original = state();
        let mut goal = GoalInstance::started(3);
        goal.progress = 50;
        goal.completed = true;
        goal.completed_day = Some(53);
        original.goals.insert("pet".to_string(), goal);

        let mut rng = SmallRng::seed_from_u64(1);
        let restored = from_snapshot(to_snapshot(&original), &mut rng);
        let pet = &restored.goals["pet"];
        assert!(pet.completed);
        assert!(!pet.active);
        assert_eq!(pet.completed_day, Some(53));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saves").join("game.json");
        let original = state();
        save_to_file(&original, &path).unwrap();

        let mut rng = SmallRng::seed_from_u64(1);
        let loaded = load_from_file(&path, &mut rng).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let missing = load_from_file(&dir.path().join("none.json"), &mut rng);
        assert!(matches!(missing, Err(PersistenceError::Io(_))));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{").unwrap();
        assert!(matches!(load_from_file(&bad, &mut rng), Err(PersistenceError::Json(_))));
    }
}
