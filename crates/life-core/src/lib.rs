//! Life Together Simulation Engine Library
//!
//! A turn-based relationship and life simulation. Each day the world ticks
//! forward, one event is drawn and resolved against a die roll, and partners
//! may act on their own.
//!
//! # Example
//!
//! ```ignore
//! use life_core::{content::load_content, EngineConfig, NewGameOptions, Session};
//!
//! let content = load_content(Path::new("content"));
//! let options = NewGameOptions::new("Jordan", ["Riley"]);
//! let mut session = Session::new_game(options, content, EngineConfig::default(), 42);
//! let turn = session.play_day();
//! ```

use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod content;
pub mod error;
pub mod persistence;
pub mod random;
pub mod session;
pub mod state;
pub mod systems;

pub use components::{MetamourEdge, MetamourGraph, Partner, RelationshipTier};
pub use config::{DifficultyProfile, EngineConfig};
pub use error::{ConfigError, ContentError, PersistenceError};
pub use random::Die;
pub use session::{NewGameOptions, ResolvedAction, ResolvedEvent, Session, TurnReport};
pub use state::GameState;
pub use systems::{DayReport, Outcome};

/// Seeded random number generator owned by a session
#[derive(Debug, Clone)]
pub struct SimRng(pub SmallRng);
