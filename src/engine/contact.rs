//! Contact details for a booking: `name + phone` (or `phone + name`).
//!
//! Parsed from the *raw* message so the name keeps its casing. The phone is
//! returned with separators removed and a leading `+` kept.

use serde::Serialize;

const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 13;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactDetails {
    pub name: String,
    pub phone: String,
}

/// `Some` when the whole message is a name (1–3 words) and a phone number.
pub fn parse_contact(raw: &str) -> Option<ContactDetails> {
    let name_first = regex!(
        r"^\s*(?P<name>\p{L}[\p{L}'’ʼ\-]*(?:\s+\p{L}[\p{L}'’ʼ\-]*){0,2})[\s,:;\-–]*(?P<phone>\+?\(?\d[\d\s\-()]*\d)\s*[.!]*\s*$"
    );
    let phone_first = regex!(
        r"^\s*(?P<phone>\+?\(?\d[\d\s\-()]*\d)[\s,:;\-–]+(?P<name>\p{L}[\p{L}'’ʼ\-]*(?:\s+\p{L}[\p{L}'’ʼ\-]*){0,2})\s*[.!]*\s*$"
    );

    let caps = name_first.captures(raw).or_else(|| phone_first.captures(raw))?;
    let name = caps.name("name")?.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
    let phone = normalize_phone(caps.name("phone")?.as_str())?;
    Some(ContactDetails { name, phone })
}

fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
        return None;
    }
    Some(if raw.trim_start().starts_with('+') { format!("+{digits}") } else { digits })
}
