//! Content Loading
//!
//! Reads the JSON content directory into a [`ContentRepository`]. A missing
//! or malformed file never fails the load: it is logged and treated as an
//! empty list.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use life_events::{ContentRepository, EventCategory};

use crate::error::ContentError;

pub const CONTEXTUAL_FILE: &str = "contextual_events.json";
pub const STORY_ARCS_FILE: &str = "story_arcs.json";
pub const PARTNER_ACTIONS_FILE: &str = "partner_actions.json";
pub const DAILY_MOMENTS_FILE: &str = "daily_moments.json";

/// Reads one JSON list. A missing file is an empty list.
pub fn read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ContentError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Content file not found");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(ContentError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&text).map_err(|source| ContentError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn load_list<T: DeserializeOwned>(path: PathBuf) -> Vec<T> {
    match read_list(&path) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping content file");
            Vec::new()
        }
    }
}

/// Loads every content file under `dir`. Intimate events are always loaded;
/// whether they may be drawn is decided per session.
pub fn load_content(dir: &Path) -> ContentRepository {
    let mut content = ContentRepository::new();

    for category in EventCategory::CATEGORIZED {
        let events = load_list(dir.join(category.file_name()));
        content.set_category(*category, events);
    }
    content.contextual = load_list(dir.join(CONTEXTUAL_FILE));
    content.story_arcs = load_list(dir.join(STORY_ARCS_FILE));
    content.partner_actions = load_list(dir.join(PARTNER_ACTIONS_FILE));
    content.daily_moments = load_list(dir.join(DAILY_MOMENTS_FILE));

    tracing::info!(
        dir = %dir.display(),
        events = content.categorized_count(),
        contextual = content.contextual.len(),
        arcs = content.story_arcs.len(),
        partner_actions = content.partner_actions.len(),
        "Loaded content"
    );
    content
}
