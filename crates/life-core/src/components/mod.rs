//! State components owned by a session.

pub mod metamour;
pub mod partner;

pub use metamour::{MetamourEdge, MetamourGraph};
pub use partner::{Partner, RelationshipTier};
