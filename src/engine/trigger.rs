//! Trigger scanning (message pre-classification).
//!
//! This module inspects a normalized message once per turn and produces the
//! coarse signals every later stage consults:
//!
//! - **Signals** (`SignalMask`): cheap booleans such as "contains an
//!   affirmative word" or "contains digits". The dialogue uses the
//!   confirmation bits; the contact parser only runs when `HAS_DIGITS` is set.
//!   `BARE_ANSWER` marks a message made of answer words and nothing else.
//! - **Tokens**: the word tokens of the message, plus a space-padded join of
//!   them so phrase predicates can test whole-word containment with a plain
//!   substring search.
//!
//! ## Design notes
//!
//! - The scan is a *heuristic*. It says which words occur, not what the user
//!   meant; the state machine decides which signals matter in which state.
//! - All lexicons live in `rules/lexicon.rs` and are compared against
//!   normalized tokens, so Russian and Ukrainian spellings share one path.

use crate::engine::normalize::tokenize;
use crate::rules::lexicon::{AFFIRMATIVE, CANCEL, NEGATIVE, REVERSAL, REVERSAL_PHRASES};

bitflags::bitflags! {
    /// Coarse signals detected in a message.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SignalMask: u8 {
        const AFFIRM     = 1 << 0;
        const NEGATE     = 1 << 1;
        const REVERSE    = 1 << 2;
        const CANCEL     = 1 << 3;
        const HAS_DIGITS = 1 << 4;
        const BARE_ANSWER = 1 << 5;
    }
}

/// A yes/no/reverse/cancel answer to a pending question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confirmation {
    Affirm,
    Negate,
    Reverse,
    Cancel,
}

/// When several signals fire ("ні, навпаки") the first entry wins.
const PRECEDENCE: &[(SignalMask, Confirmation)] = &[
    (SignalMask::REVERSE, Confirmation::Reverse),
    (SignalMask::CANCEL, Confirmation::Cancel),
    (SignalMask::NEGATE, Confirmation::Negate),
    (SignalMask::AFFIRM, Confirmation::Affirm),
];

/// Message characteristics detected from normalized text.
#[derive(Debug, Clone, Default)]
pub struct TriggerInfo {
    pub signals: SignalMask,
    pub tokens: Vec<String>,
    padded: String,
}

impl TriggerInfo {
    /// Scan an already-normalized message.
    pub fn scan(normalized: &str) -> Self {
        let tokens: Vec<String> = tokenize(normalized).into_iter().map(str::to_string).collect();
        let padded = format!(" {} ", tokens.join(" "));
        let mut signals = SignalMask::empty();

        let has = |lexicon: &[&str]| tokens.iter().any(|t| lexicon.contains(&t.as_str()));

        if has(AFFIRMATIVE) {
            signals |= SignalMask::AFFIRM;
        }
        if has(NEGATIVE) {
            signals |= SignalMask::NEGATE;
        }
        if has(REVERSAL) || REVERSAL_PHRASES.iter().any(|p| padded.contains(&format!(" {p} "))) {
            signals |= SignalMask::REVERSE;
        }
        if has(CANCEL) {
            signals |= SignalMask::CANCEL;
        }
        if normalized.bytes().any(|b| b.is_ascii_digit()) {
            signals |= SignalMask::HAS_DIGITS;
        }
        if is_bare_answer(&tokens, &padded) {
            signals |= SignalMask::BARE_ANSWER;
        }

        TriggerInfo { signals, tokens, padded }
    }

    /// The tokens joined by single spaces, with a leading and trailing space.
    pub fn padded_text(&self) -> &str {
        &self.padded
    }

    pub fn has_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// The strongest confirmation signal, if any.
    pub fn confirmation(&self) -> Option<Confirmation> {
        PRECEDENCE.iter().find(|(mask, _)| self.signals.contains(*mask)).map(|(_, c)| *c)
    }

    /// True when every word of the message is a yes/no/reverse/cancel word.
    pub fn is_bare_answer(&self) -> bool {
        self.signals.contains(SignalMask::BARE_ANSWER)
    }
}

fn is_bare_answer(tokens: &[String], padded: &str) -> bool {
    if tokens.is_empty() {
        return false;
    }
    let mut rest = padded.to_string();
    for phrase in REVERSAL_PHRASES {
        rest = rest.replace(&format!(" {phrase} "), " ");
    }
    rest.split_whitespace()
        .all(|t| [AFFIRMATIVE, NEGATIVE, REVERSAL, CANCEL].iter().any(|lexicon| lexicon.contains(&t)))
}
