//! Session
//!
//! One running game: its state, the content it draws from, its tuning and
//! its RNG. Sessions are independent; nothing is shared between them.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use life_events::{
    Activity, ContentRepository, DifficultyLevel, Event, MemoryKind, PartnerConfig, PartnerTrait,
    Season, SessionSnapshot, METAMOUR_SEPARATOR,
};

use crate::components::{MetamourGraph, Partner};
use crate::config::EngineConfig;
use crate::error::PersistenceError;
use crate::persistence;
use crate::random::{chance, Die};
use crate::state::{generate_support_network, GameState};
use crate::systems::dynamics::random_weather;
use crate::systems::{
    self, after_outcome, Bonding, DayReport, GoalRejection, Outcome, PartnerAction,
    QualityTimeReport, Resolution,
};
use crate::SimRng;

/// Settings for a new game.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGameOptions {
    pub player_name: String,
    /// In order; blank and duplicate names are skipped
    pub partners: Vec<String>,
    /// Explicit traits per partner; others get random traits
    pub partner_traits: BTreeMap<String, Vec<PartnerTrait>>,
    pub difficulty: DifficultyLevel,
    pub include_intimate: bool,
    pub season: Season,
}

impl NewGameOptions {
    pub fn new<I, S>(player_name: impl Into<String>, partners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            player_name: player_name.into(),
            partners: partners.into_iter().map(Into::into).collect(),
            partner_traits: BTreeMap::new(),
            difficulty: DifficultyLevel::default(),
            include_intimate: false,
            season: Season::default(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: DifficultyLevel) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_intimate(mut self, include_intimate: bool) -> Self {
        self.include_intimate = include_intimate;
        self
    }

    pub fn with_traits(mut self, partner: impl Into<String>, traits: Vec<PartnerTrait>) -> Self {
        self.partner_traits.insert(partner.into(), traits);
        self
    }
}

/// Partner names may not contain the metamour key separator.
fn partner_name(requested: &str) -> String {
    if requested.contains(METAMOUR_SEPARATOR) {
        tracing::warn!(name = %requested, "Replacing '|' in partner name");
    }
    requested.replace(METAMOUR_SEPARATOR, "/")
}

/// A resolved event together with its follow-ups.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEvent {
    pub event: Event,
    pub outcome: Outcome,
    pub bonding: Bonding,
}

/// A resolved partner action.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAction {
    pub action: PartnerAction,
    pub outcome: Outcome,
    pub bonding: Bonding,
}

/// Everything that happened during one automated turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub day: DayReport,
    pub event: Option<ResolvedEvent>,
    pub cascade: Option<ResolvedEvent>,
    pub partner_actions: Vec<ResolvedAction>,
}

/// One running game.
#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    content: ContentRepository,
    config: EngineConfig,
    rng: SimRng,
}

impl Session {
    /// Starts a new game. All randomness flows from `seed`.
    pub fn new_game(options: NewGameOptions, content: ContentRepository, config: EngineConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut state = GameState::empty(options.player_name, options.difficulty);
        state.session_id = persistence::new_session_id(&mut rng);
        state.include_intimate = options.include_intimate;
        state.season = options.season;

        for requested in &options.partners {
            let requested = requested.trim();
            let name = partner_name(requested);
            if name.is_empty() || state.partner(&name).is_some() {
                continue;
            }
            let traits = options.partner_traits.get(requested).map(Vec::as_slice);
            state.partners.push(Partner::generate(name, traits, &mut rng));
        }
        state.partner_config = PartnerConfig::for_count(state.partner_count());

        state.support_network = generate_support_network(&mut rng);
        state.weather = random_weather(state.season, &mut rng);
        state.metamours = MetamourGraph::generate(&state.partner_names(), &mut rng);
        state.add_memory(MemoryKind::Beginning, "The start of our journey together", None);

        tracing::info!(
            player = %state.player_name,
            partners = state.partner_count(),
            difficulty = %state.difficulty,
            seed,
            "Started new game"
        );

        Self {
            state,
            content,
            config,
            rng: SimRng(rng),
        }
    }

    /// Resumes from a snapshot. Missing fields are backfilled from `seed`.
    pub fn from_snapshot(
        snapshot: SessionSnapshot,
        content: ContentRepository,
        config: EngineConfig,
        seed: u64,
    ) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let state = persistence::from_snapshot(snapshot, &mut rng);
        Self::resume(state, content, config, rng)
    }

    /// Loads a saved game from disk.
    pub fn load(path: &Path, content: ContentRepository, config: EngineConfig, seed: u64) -> Result<Self, PersistenceError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let state = persistence::load_from_file(path, &mut rng)?;
        Ok(Self::resume(state, content, config, rng))
    }

    /// Repairs restored state against this session's content and tuning.
    fn resume(mut state: GameState, content: ContentRepository, config: EngineConfig, rng: SmallRng) -> Self {
        systems::arc::drop_stuck_arc(&mut state, &content);
        systems::goals::cap_to_targets(&mut state, &config);
        Self {
            state,
            content,
            config,
            rng: SimRng(rng),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save_to_file(&self.state, path)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        persistence::to_snapshot(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn content(&self) -> &ContentRepository {
        &self.content
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rng_mut(&mut self) -> &mut SmallRng {
        &mut self.rng.0
    }

    pub fn roll(&mut self, die: Die) -> i32 {
        die.roll(&mut self.rng.0)
    }

    /// Advances one day.
    pub fn next_day(&mut self) -> DayReport {
        systems::run_tick(&mut self.state, &self.content, &self.config, &mut self.rng.0)
    }

    /// Today's event: a due arc stage, else a special event, else a regular draw.
    pub fn next_event(&mut self) -> Option<Event> {
        let rng = &mut self.rng.0;
        systems::current_arc_event(&self.state, &self.content, rng)
            .or_else(|| systems::check_special_event(&self.state, &self.config, rng))
            .or_else(|| systems::select_event(&self.state, &self.content, &self.config, rng))
    }

    /// Resolves an event with a roll and a response index.
    pub fn resolve(&mut self, event: &Event, roll: i32, response: usize) -> Resolution {
        systems::resolve_event(
            &mut self.state,
            &self.content,
            &self.config,
            event,
            roll,
            response,
            &mut self.rng.0,
        )
    }

    /// Runs the bonding hooks for a resolved event.
    pub fn bond(&mut self, event: &Event, outcome: &Outcome) -> Bonding {
        after_outcome(&mut self.state, &self.config, event, outcome, None, &mut self.rng.0)
    }

    /// Picks an action for one partner.
    pub fn partner_action(&mut self, partner: &str) -> Option<PartnerAction> {
        systems::pick_action(&self.state, &self.content, partner, &mut self.rng.0)
    }

    /// The choice the acting partner would make.
    pub fn advise_choice(&mut self, action: &PartnerAction) -> usize {
        match self.state.partner(&action.partner) {
            Some(partner) => systems::advise_choice(partner, &action.event.responses, &mut self.rng.0),
            None => 0,
        }
    }

    /// Resolves a partner action, optionally overriding the partner's choice.
    pub fn resolve_partner_action(&mut self, action: &PartnerAction, roll: i32, choice: Option<usize>) -> ResolvedAction {
        let (outcome, _) = systems::resolve_partner_action(
            &mut self.state,
            &self.content,
            &self.config,
            action,
            roll,
            choice,
            &mut self.rng.0,
        );
        let bonding = after_outcome(
            &mut self.state,
            &self.config,
            &action.event,
            &outcome,
            Some(action.action_type),
            &mut self.rng.0,
        );
        ResolvedAction {
            action: action.clone(),
            outcome,
            bonding,
        }
    }

    pub fn quality_time(&mut self, partners: &[String], activity: Option<Activity>) -> QualityTimeReport {
        systems::quality_time(&mut self.state, partners, activity, &mut self.rng.0)
    }

    pub fn start_goal(&mut self, goal_id: &str) -> Result<(), GoalRejection> {
        systems::start_goal(&mut self.state, &self.config, goal_id)
    }

    pub fn spend_energy(&mut self, amount: i32) -> bool {
        self.state.spend_energy(amount)
    }

    fn auto_response(&mut self, event: &Event) -> usize {
        if event.responses.is_empty() {
            0
        } else {
            self.rng.0.gen_range(0..event.responses.len())
        }
    }

    fn resolve_automatically(&mut self, event: Event) -> (ResolvedEvent, Option<Event>) {
        let roll = self.roll(Die::D20);
        let response = self.auto_response(&event);
        let resolution = self.resolve(&event, roll, response);
        let bonding = self.bond(&event, &resolution.outcome);
        let resolved = ResolvedEvent {
            event,
            outcome: resolution.outcome,
            bonding,
        };
        (resolved, resolution.cascade)
    }

    /// Plays one full day for a headless caller: tick, draw and resolve one
    /// event (plus any cascade), then let each partner maybe act.
    pub fn play_day(&mut self) -> TurnReport {
        let day = self.next_day();

        let mut event = None;
        let mut cascade = None;
        if let Some(drawn) = self.next_event() {
            let (resolved, follow_up) = self.resolve_automatically(drawn);
            event = Some(resolved);
            if let Some(follow_up) = follow_up {
                let (resolved, _) = self.resolve_automatically(follow_up);
                cascade = Some(resolved);
            }
        }

        let mut partner_actions = Vec::new();
        for name in self.state.partner_names() {
            if !chance(&mut self.rng.0, self.config.daily.partner_action_chance) {
                continue;
            }
            let Some(action) = self.partner_action(&name) else {
                continue;
            };
            let roll = self.roll(Die::D20);
            partner_actions.push(self.resolve_partner_action(&action, roll, None));
        }

        TurnReport {
            day,
            event,
            cascade,
            partner_actions,
        }
    }

    /// Short human-readable summary of the session.
    pub fn summary(&self) -> String {
        let state = &self.state;
        let partners = if state.partners.is_empty() {
            "None".to_string()
        } else {
            state.partner_names().join(", ")
        };
        let intimate = if state.include_intimate { "Yes" } else { "No" };

        let mut out = String::new();
        let rule = "=".repeat(60);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "  LIFE TOGETHER - GAME SUMMARY");
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "  Player: {}", state.player_name);
        let _ = writeln!(out, "  Partners: {}", partners);
        let _ = writeln!(out, "  Configuration: {}", state.partner_config);
        let _ = writeln!(out, "  Difficulty: {}", state.difficulty);
        let _ = writeln!(out, "  Days Together: {}", state.day);
        let _ = writeln!(out, "  Events Experienced: {}", state.history.len());
        let _ = writeln!(out, "  Intimate Events: {}", intimate);
        let _ = writeln!(out, "  Achievements: {}", state.achievements.unlocked_count());
        for partner in &state.partners {
            let _ = writeln!(
                out,
                "  {}: {} ({})",
                partner.name,
                partner.relationship,
                partner.tier()
            );
        }
        let _ = writeln!(out, "{}", rule);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_events::fixtures;

    fn session(partners: &[&str], seed: u64) -> Session {
        let options = NewGameOptions::new("Jordan", partners.iter().copied());
        Session::new_game(options, fixtures::sample_content(), EngineConfig::default(), seed)
    }

    #[test]
    fn test_new_game_defaults() {
        let s = session(&["Riley", "Casey", "Riley", " "], 42);
        let state = s.state();
        assert_eq!(state.day, 0);
        assert_eq!(state.partner_names(), vec!["Riley", "Casey"]);
        assert_eq!(state.partner_config, PartnerConfig::Couple);
        assert!(state.partners.iter().all(|p| p.relationship == 50));
        assert_eq!(state.metamours.edges().len(), 1);
        assert_eq!(state.memories.len(), 1);
        assert_eq!(state.memories[0].kind, MemoryKind::Beginning);
        assert!(!state.support_network.is_empty());
        assert!(!state.session_id.is_nil());
    }

    #[test]
    fn test_explicit_traits() {
        let options = NewGameOptions::new("Jordan", ["Riley"])
            .with_traits("Riley", vec![PartnerTrait::Homebody, PartnerTrait::Funny]);
        let s = Session::new_game(options, ContentRepository::new(), EngineConfig::default(), 1);
        assert_eq!(
            s.state().partners[0].traits,
            vec![PartnerTrait::Homebody, PartnerTrait::Funny]
        );
    }

    #[test]
    fn test_rolls_stay_on_the_die() {
        let mut s = session(&["Riley"], 3);
        for _ in 0..100 {
            assert!((1..=20).contains(&s.roll(Die::D20)));
            assert!((1..=4).contains(&s.roll(Die::D4)));
        }
    }

    #[test]
    fn test_play_day_resolves_one_event() {
        let mut s = session(&["Riley"], 7);
        let turn = s.play_day();
        assert_eq!(turn.day.day, 1);
        assert!(turn.event.is_some());
        let expected = 1 + turn.cascade.iter().count() + turn.partner_actions.len();
        assert_eq!(s.state().history.len(), expected);
        assert_eq!(s.state().partner_actions.len(), turn.partner_actions.len());
    }

    #[test]
    fn test_no_content_means_no_event() {
        let options = NewGameOptions::new("Jordan", ["Riley"]);
        let mut s = Session::new_game(options, ContentRepository::new(), EngineConfig::default(), 7);
        let turn = s.play_day();
        assert!(turn.event.is_none());
        assert!(turn.partner_actions.is_empty());
    }

    #[test]
    fn test_goal_lifecycle_through_session() {
        let mut s = session(&["Riley"], 11);
        assert_eq!(s.start_goal("pet"), Ok(()));
        assert_eq!(s.start_goal("pet"), Err(GoalRejection::AlreadyActive));
        assert_eq!(s.start_goal("castle"), Err(GoalRejection::Unknown));
    }

    #[test]
    fn test_summary_mentions_partners() {
        let s = session(&["Riley", "Casey"], 5);
        let summary = s.summary();
        assert!(summary.contains("Partners: Riley, Casey"));
        assert!(summary.contains("Difficulty: balanced"));
        assert!(summary.contains("Days Together: 0"));
    }

    #[test]
    fn test_separator_replaced_in_partner_names() {
        let s = session(&["A|B", "C"], 4);
        assert_eq!(s.state().partner_names(), vec!["A/B", "C"]);
        assert!(s.state().metamours.get("A/B", "C").is_some());
    }

    #[test]
    fn test_resume_repairs_goals_and_arcs() {
        let mut snapshot = session(&["Riley"], 6).snapshot();
        snapshot.day = 30;
        let mut done = life_events::GoalInstance::started(1);
        done.progress = 50;
        done.completed = true;
        snapshot.goals.insert("pet".to_string(), done);
        let mut overshot = life_events::GoalInstance::started(1);
        overshot.progress = 500;
        snapshot.goals.insert("travel".to_string(), overshot);
        snapshot.active_arc = Some(life_events::ArcInstance {
            arc_id: "moving_in".to_string(),
            stage: 0,
            started_day: 20,
            next_stage_day: 20,
        });

        let mut s = Session::from_snapshot(snapshot, fixtures::sample_content(), EngineConfig::default(), 2);
        assert!(s.state().active_arc.is_none());
        assert!(!s.state().goals["pet"].active);
        let travel_target = s.config().goal("travel").unwrap().target;
        assert_eq!(s.state().goals["travel"].progress, travel_target);

        let mut completed = Vec::new();
        for _ in 0..3 {
            completed.extend(s.next_day().goals_completed);
        }
        assert_eq!(completed, vec![s.config().goal("travel").unwrap().label.clone()]);
        assert_eq!(s.state().goals["pet"].completed_day, None);
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = session(&["Riley"], 1);
        let b = session(&["Riley"], 1);
        a.play_day();
        assert_eq!(b.state().day, 0);
        assert_eq!(a.state().day, 1);
    }
}
