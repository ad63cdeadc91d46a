use crate::engine::TriggerInfo;

/// Returns true when `phrase` occurs in the scanned message.
///
/// Plain phrases must match whole tokens; a trailing `*` turns the last word
/// into a stem that matches any token starting with it.
pub fn has_phrase(trigger: &TriggerInfo, phrase: &str) -> bool {
    match phrase.strip_suffix('*') {
        Some(stem) => trigger.padded_text().contains(&format!(" {stem}")),
        None if phrase.contains(' ') => trigger.padded_text().contains(&format!(" {phrase} ")),
        None => trigger.has_token(phrase),
    }
}

/// Returns true when every phrase occurs (an empty list is trivially satisfied).
pub fn all_present(trigger: &TriggerInfo, phrases: &[&str]) -> bool {
    phrases.iter().all(|p| has_phrase(trigger, p))
}

/// Returns true when at least one phrase occurs (an empty list is trivially satisfied).
pub fn any_present(trigger: &TriggerInfo, phrases: &[&str]) -> bool {
    phrases.is_empty() || phrases.iter().any(|p| has_phrase(trigger, p))
}
