//! Template Rendering
//!
//! Fills `{partner}`, `{support_person}`, `{inside_joke}`, `{partner1}` and
//! `{partner2}` tokens in an event's title, description and responses.
//! Tokens whose backing collection is empty are left untouched.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use life_events::Event;

use crate::state::GameState;

const PARTNER: &str = "{partner}";
const SUPPORT_PERSON: &str = "{support_person}";
const INSIDE_JOKE: &str = "{inside_joke}";
const PARTNER1: &str = "{partner1}";
const PARTNER2: &str = "{partner2}";

/// How `{partner}` is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartnerBinding {
    /// All partners for group events or a single partner; otherwise one at random
    Auto,
    /// A specific partner, recorded as involved
    Fixed(String),
}

/// Produces a rendered copy of `event`.
pub fn render(event: &Event, state: &GameState, binding: &PartnerBinding, rng: &mut SmallRng) -> Event {
    let mut rendered = event.clone();
    let names = state.partner_names();

    let mut replacements: Vec<(&str, String)> = Vec::new();

    match binding {
        PartnerBinding::Fixed(name) => {
            rendered.involved_partner = Some(name.clone());
            replacements.push((PARTNER, name.clone()));
        }
        PartnerBinding::Auto if !names.is_empty() => {
            if event.group_event || names.len() == 1 {
                replacements.push((PARTNER, names.join(" and ")));
            } else if let Some(chosen) = names.choose(rng) {
                rendered.involved_partner = Some(chosen.clone());
                replacements.push((PARTNER, chosen.clone()));
            }
        }
        PartnerBinding::Auto => {}
    }

    if mentions(event, SUPPORT_PERSON) {
        if let Some(person) = state.support_network.choose(rng) {
            replacements.push((SUPPORT_PERSON, person.name.clone()));
        }
    }

    if mentions(event, INSIDE_JOKE) {
        if let Some(joke) = state.inside_jokes.choose(rng) {
            replacements.push((INSIDE_JOKE, joke.joke.clone()));
        }
    }

    if mentions(event, PARTNER1) || mentions(event, PARTNER2) {
        if let Some(edge) = state.metamours.edges().choose(rng) {
            replacements.push((PARTNER1, edge.a.clone()));
            replacements.push((PARTNER2, edge.b.clone()));
        }
    }

    let fill = |text: &str| -> String {
        replacements
            .iter()
            .fold(text.to_string(), |acc, (token, value)| acc.replace(*token, value))
    };

    rendered.title = fill(&event.title);
    rendered.description = fill(&event.description);
    rendered.responses = event.responses.iter().map(|r| fill(r)).collect();
    rendered
}

fn mentions(event: &Event, token: &str) -> bool {
    event.title.contains(token)
        || event.description.contains(token)
        || event.responses.iter().any(|r| r.contains(token))
}
