//! Simulation Systems
//!
//! Selection, resolution, story arcs, the daily tick and the smaller systems
//! it drives. Systems are free functions over [`GameState`](crate::state::GameState)
//! that take the session RNG explicitly.

pub mod achievements;
pub mod arc;
pub mod bonding;
pub mod conditions;
pub mod dynamics;
pub mod goals;
pub mod partner_action;
pub mod quality_time;
pub mod resolution;
pub mod selection;
pub mod special;
pub mod surprises;
pub mod template;
pub mod tick;

// Re-export commonly used systems
pub use arc::{advance_arc, current_arc_event, try_start_arc, ArcProgress};
pub use bonding::{after_outcome, Bonding};
pub use conditions::conditions_match;
pub use goals::{progress_goals, start_goal, GoalRejection};
pub use partner_action::{
    action_weight, advise_choice, pick_action, resolve_partner_action, score_choice, PartnerAction,
};
pub use quality_time::{quality_time, QualityTimeReport};
pub use resolution::{apply_outcome, compute_effects, maybe_cascade, resolve_event, Outcome, Resolution};
pub use selection::select_event;
pub use special::check_special_event;
pub use template::{render, PartnerBinding};
pub use tick::{run_tick, DayReport};
