//! Partner Actions
//!
//! Partners take small actions of their own. An action is picked with weights
//! shaped by the partner's mood, traits and relationship; the partner's
//! response is advised by scoring each choice against their personality.

use rand::rngs::SmallRng;
use rand::Rng;

use life_events::{
    ActionType, ContentRepository, Event, LoveLanguage, Mood, PartnerActionEntry, PartnerTrait,
};

use crate::components::Partner;
use crate::config::EngineConfig;
use crate::random::weighted_choice;
use crate::state::GameState;
use crate::systems::resolution::{apply_outcome, Outcome};
use crate::systems::template::{render, PartnerBinding};

/// A rendered action for one partner.
#[derive(Debug, Clone, PartialEq)]
pub struct PartnerAction {
    pub partner: String,
    pub action_type: ActionType,
    /// Choices are carried as the event's responses
    pub event: Event,
}

/// Selection weight of an action type for a partner.
pub fn action_weight(action_type: ActionType, partner: &Partner) -> f64 {
    use ActionType::*;

    let mut weight = 1.0;

    let mood = partner.mood;
    if matches!(mood, Mood::Happy | Mood::Excited | Mood::Playful) {
        if matches!(action_type, Play | Initiative | Affirmation) {
            weight *= 2.0;
        }
    } else if matches!(mood, Mood::Sad | Mood::Stressed | Mood::Anxious) {
        if matches!(action_type, Support | Communicate) {
            weight *= 2.0;
        }
    } else if matches!(mood, Mood::Vulnerable | Mood::Open) {
        if action_type == Vulnerable {
            weight *= 3.0;
        }
    } else if matches!(mood, Mood::Content | Mood::Peaceful) && matches!(action_type, Affection | Care) {
        weight *= 1.5;
    }

    const TRAIT_WEIGHTS: &[(PartnerTrait, &[ActionType], f64)] = &[
        (PartnerTrait::Romantic, &[Affirmation, Initiative], 1.5),
        (PartnerTrait::Playful, &[Play], 2.0),
        (PartnerTrait::Anxious, &[Support], 1.5),
        (PartnerTrait::Affectionate, &[Affection], 2.0),
        (PartnerTrait::Nurturing, &[Care], 2.0),
        (PartnerTrait::Protective, &[Protect], 2.0),
    ];
    for (t, types, factor) in TRAIT_WEIGHTS {
        if partner.has_trait(*t) && types.contains(&action_type) {
            weight *= factor;
        }
    }

    if partner.relationship > 70 && action_type == Vulnerable {
        weight *= 1.5;
    }
    if partner.relationship < 40 && matches!(action_type, Communicate | Support) {
        weight *= 1.5;
    }

    weight
}

/// Picks and renders an action for `partner_name`. None without content or
/// an unknown partner.
pub fn pick_action(
    state: &GameState,
    content: &ContentRepository,
    partner_name: &str,
    rng: &mut SmallRng,
) -> Option<PartnerAction> {
    let partner = state.partner(partner_name)?;
    let weighted: Vec<_> = content
        .partner_actions
        .iter()
        .map(|action| (action, action_weight(action.action_type, partner)))
        .collect();
    let action = *weighted_choice(rng, &weighted)?;

    let event = Event::from_partner_action(action);
    let event = render(&event, state, &PartnerBinding::Fixed(partner.name.clone()), rng);
    Some(PartnerAction {
        partner: partner.name.clone(),
        action_type: action.action_type,
        event,
    })
}

type KeywordRule = (&'static [PartnerTrait], &'static [&'static str], f64);

const TRAIT_KEYWORDS: &[KeywordRule] = &[
    (&[PartnerTrait::Romantic], &["romantic", "elaborate", "special", "love", "heart"], 2.0),
    (&[PartnerTrait::Playful], &["playful", "fun", "laugh", "silly", "game", "competition"], 2.0),
    (&[PartnerTrait::Anxious], &["careful", "check", "reassur", "gentle", "slow"], 1.5),
    (&[PartnerTrait::Affectionate], &["hold", "touch", "close", "physical", "cuddle", "kiss"], 2.0),
    (&[PartnerTrait::Nurturing], &["care", "help", "support", "comfort", "take care"], 2.0),
    (&[PartnerTrait::Sensitive], &["emotional", "feel", "vulnerable", "gentle"], 1.5),
    (
        &[PartnerTrait::Spontaneous, PartnerTrait::Adventurous],
        &["spontaneous", "immediately", "dive", "jump", "now"],
        2.0,
    ),
    (&[PartnerTrait::Stubborn], &["commit", "full", "all in", "double down"], 1.5),
    (&[PartnerTrait::Funny], &["laugh", "joke", "funny", "silly", "bit"], 2.0),
    (
        &[PartnerTrait::Loyal, PartnerTrait::Protective],
        &["defend", "protect", "back", "promise", "always"],
        2.0,
    ),
    (&[PartnerTrait::Organized], &["plan", "prepare", "practical", "system"], 1.5),
    (&[PartnerTrait::Creative], &["creative", "make", "create", "art", "together"], 1.5),
    (&[PartnerTrait::Homebody], &["cozy", "home", "comfortable", "nest"], 1.5),
];

const BOLD_KEYWORDS: &[&str] = &["vulnerable", "deep", "honest", "bold", "all in"];

fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

fn mood_keywords(mood: Mood) -> Option<(&'static [&'static str], f64)> {
    match mood {
        Mood::Happy | Mood::Excited | Mood::Playful => {
            Some((&["enthusiast", "excited", "energy", "full", "escalate"], 1.5))
        }
        Mood::Sad | Mood::Vulnerable => Some((&["gentle", "slow", "vulnerable", "honest", "share"], 1.5)),
        Mood::Anxious | Mood::Nervous => Some((&["reassur", "careful", "check", "slow"], 1.5)),
        Mood::Content | Mood::Peaceful => Some((&["simple", "quiet", "present", "casual"], 1.0)),
        _ => None,
    }
}

fn love_language_keywords(language: LoveLanguage) -> &'static [&'static str] {
    match language {
        LoveLanguage::Words => &["tell", "say", "express", "words", "specific"],
        LoveLanguage::Acts => &["do", "help", "handle", "take care", "action"],
        LoveLanguage::Touch => &["hold", "touch", "physical", "close", "hug"],
        LoveLanguage::Time => &["together", "present", "focus", "attention"],
        LoveLanguage::Gifts => &["gift", "surprise", "found", "remember"],
    }
}

/// Personality score of one choice, before jitter.
pub fn score_choice(choice: &str, partner: &Partner) -> f64 {
    let text = choice.to_lowercase();
    let mut score = 1.0;

    for (traits, keywords, bonus) in TRAIT_KEYWORDS {
        if traits.iter().any(|t| partner.has_trait(*t)) && mentions_any(&text, keywords) {
            score += bonus;
        }
    }

    if let Some((keywords, bonus)) = mood_keywords(partner.mood) {
        if mentions_any(&text, keywords) {
            score += bonus;
        }
    }

    if mentions_any(&text, love_language_keywords(partner.love_language)) {
        score += 1.5;
    }

    if partner.relationship > 70 && mentions_any(&text, BOLD_KEYWORDS) {
        score += 1.0;
    }

    score
}

/// Index of the choice the partner would make. Ties go to the earlier
/// choice; no choices yields 0.
pub fn advise_choice(partner: &Partner, choices: &[String], rng: &mut SmallRng) -> usize {
    let mut best: Option<(usize, f64)> = None;
    for (i, choice) in choices.iter().enumerate() {
        let score = score_choice(choice, partner) + rng.gen_range(0.0..0.5);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((i, score));
        }
    }
    best.map_or(0, |(i, _)| i)
}

/// Resolves an action. `choice` overrides the advised choice when in range.
/// Returns the outcome and the choice used.
pub fn resolve_partner_action(
    state: &mut GameState,
    content: &ContentRepository,
    config: &EngineConfig,
    action: &PartnerAction,
    roll: i32,
    choice: Option<usize>,
    rng: &mut SmallRng,
) -> (Outcome, usize) {
    let advised = state
        .partner(&action.partner)
        .map_or(0, |p| advise_choice(p, &action.event.responses, rng));
    let choice = choice
        .filter(|i| *i < action.event.responses.len())
        .unwrap_or(advised);

    let (outcome, _) = apply_outcome(state, content, config, &action.event, roll, choice);

    state.partner_actions.push(PartnerActionEntry {
        day: state.day,
        partner: action.partner.clone(),
        action_id: action.event.id.clone(),
        title: action.event.title.clone(),
        roll,
        success: outcome.success,
        choice: outcome.response,
    });
    tracing::debug!(
        partner = %action.partner,
        action = %action.event.id,
        success = outcome.success,
        "Partner action"
    );
    (outcome, choice)
}
