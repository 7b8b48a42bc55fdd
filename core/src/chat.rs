//! Chat reactions
//!
//! Incoming chat lines are matched against the configured phrases. Two
//! announcements matter: a round about to start (match notification) and a
//! reward being granted (leave for farming or after the final stage).
//! Phrases are substrings with an optional `{n}` digit placeholder; they are
//! locale specific and live in config.

use dodger_types::{AutomationSettings, ChatPhrases, NotifySettings};

use crate::arena::ArenaPhase;

/// Placeholder for a run of digits inside a phrase
const NUMBER: &str = "{n}";

/// An announcement recognised in chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEvent {
    RoundStarting,
    /// Amount from the `{n}` placeholder, or the first number in the line
    RewardGranted { amount: Option<u32> },
}

/// Classify a chat line. The round announcement wins if both match.
pub fn classify(phrases: &ChatPhrases, line: &str) -> Option<ChatEvent> {
    let find = |list: &[String]| list.iter().find_map(|phrase| match_phrase(phrase, line));

    if find(&phrases.round_starting).is_some() {
        Some(ChatEvent::RoundStarting)
    } else {
        find(&phrases.reward_granted).map(|amount| ChatEvent::RewardGranted { amount })
    }
}

/// Match one phrase against `line`, yielding the number it captured.
///
/// Empty phrases never match.
fn match_phrase(phrase: &str, line: &str) -> Option<Option<u32>> {
    if phrase.is_empty() {
        return None;
    }
    let Some((before, after)) = phrase.split_once(NUMBER) else {
        return line.contains(phrase).then(|| first_number(line));
    };

    line.match_indices(before).find_map(|(start, _)| {
        let rest = &line[start + before.len()..];
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        (digits > 0 && rest[digits..].starts_with(after)).then(|| rest[..digits].parse().ok())
    })
}

fn first_number(line: &str) -> Option<u32> {
    line.split(|c: char| !c.is_ascii_digit())
        .find(|part| !part.is_empty())
        .and_then(|digits| digits.parse().ok())
}

/// Whether a granted reward should make us leave the duty
pub fn leave_after_reward(settings: &AutomationSettings, phase: Option<ArenaPhase>) -> bool {
    if settings.leave_after_final_stage {
        phase.is_some_and(|p| p.is_final())
    } else {
        settings.farming_mode
    }
}

/// Message announcing a starting match, if one should be sent
pub fn match_notification(notify: &NotifySettings, headcount: u32) -> Option<String> {
    if !notify.enabled {
        return None;
    }
    if !notify.is_complete() {
        tracing::debug!("Notification settings incomplete, not sending");
        return None;
    }
    if headcount > notify.max_players {
        return None;
    }
    Some(format!("{}: {}-player match", notify.account_name, headcount))
}
