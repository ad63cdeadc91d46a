//! City recognition.
//!
//! A [`CityMatcher`] turns tokens and phrases into canonical cities:
//!
//! ```text
//! phrase ─ normalize ─┬─ exact surface-form lookup ──────────────▶ City (score 100)
//!                     └─ miss ─ fuzzy score vs every form ─ ≥ threshold? ─▶ City
//! ```
//!
//! Exact hits always win: fuzzy scoring is only attempted when the phrase is
//! not a known surface form. Fuzzy ties are broken by canonical name, so the
//! outcome never depends on hash order.
//!
//! Message-level extraction ([`CityMatcher::extract_cities`]) walks the tokens
//! left to right. At each position the longest exact multi-word form wins
//! (`кривий ріг`), then a single-token match (exact or fuzzy) is tried. A
//! hyphenated token that is not itself a form (`київ-львів`) is matched part
//! by part. The token just before a match feeds [`infer_role`].
//!
//! Words listed in `FUZZY_STOPWORDS` (first names and the like) are only ever
//! matched exactly.

use crate::engine::normalize::tokenize;
use crate::engine::{Gazetteer, normalize, similarity};
use crate::rules::lexicon::{DESTINATION_PREPOSITIONS, FUZZY_STOPWORDS, ORIGIN_PREPOSITIONS};
use crate::{CityMention, CityPair, Options, Role};

/// Longest surface form, in tokens, tried during extraction.
const MAX_PHRASE_TOKENS: usize = 3;

/// Result of matching one phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityMatch {
    pub city: String,
    pub score: u8,
    pub exact: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CityMatcher<'g> {
    gazetteer: &'g Gazetteer,
    threshold: u8,
    min_fuzzy_len: usize,
}

impl<'g> CityMatcher<'g> {
    pub fn new(gazetteer: &'g Gazetteer, options: &Options) -> Self {
        Self { gazetteer, threshold: options.fuzzy_threshold, min_fuzzy_len: options.min_fuzzy_len }
    }

    /// Canonical city for `phrase`, if any.
    pub fn match_city(&self, phrase: &str) -> Option<String> {
        self.match_scored(phrase).map(|m| m.city)
    }

    /// Like [`match_city`](Self::match_city), keeping the score.
    pub fn match_scored(&self, phrase: &str) -> Option<CityMatch> {
        let normalized = normalize(phrase);
        let key = normalized.trim_matches(|c: char| !c.is_alphanumeric());
        if key.is_empty() {
            return None;
        }
        if let Some(city) = self.gazetteer.lookup(&normalized).or_else(|| self.gazetteer.lookup(key)) {
            return Some(CityMatch { city: city.name.clone(), score: 100, exact: true });
        }
        self.fuzzy(key)
    }

    fn fuzzy(&self, key: &str) -> Option<CityMatch> {
        if key.chars().count() < self.min_fuzzy_len || FUZZY_STOPWORDS.contains(&key) {
            return None;
        }

        // cities() iterates in name order; only a strictly better score
        // replaces the leader, so ties go to the first name.
        let mut best: Option<(&str, u8)> = None;
        for city in self.gazetteer.cities() {
            let score = city.forms.iter().map(|form| similarity(key, form)).max().unwrap_or(0);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((city.name.as_str(), score));
            }
        }

        let (name, score) = best?;
        if score < self.threshold {
            tracing::trace!(key, name, score, "fuzzy candidate below threshold");
            return None;
        }
        tracing::debug!(key, name, score, "fuzzy city match");
        Some(CityMatch { city: name.to_string(), score, exact: false })
    }

    /// Every distinct city in `text`, in order of first mention.
    pub fn extract_cities(&self, text: &str) -> Vec<CityMention> {
        let normalized = normalize(text);
        let tokens = tokenize(&normalized);
        let mut mentions: Vec<CityMention> = Vec::new();

        let mut i = 0;
        while i < tokens.len() {
            let (len, found) = self.match_at(&tokens, i);
            for (part, found) in found.into_iter().enumerate() {
                if mentions.iter().any(|m| m.city == found.city) {
                    continue;
                }
                // Only the first part of `з києва-львова` follows the preposition.
                let role = if part == 0 { infer_role(i.checked_sub(1).map(|p| tokens[p])) } else { Role::Unknown };
                mentions.push(CityMention {
                    city: found.city,
                    role,
                    position: i,
                    score: found.score,
                    exact: found.exact,
                });
            }
            i += len;
        }

        mentions
    }

    /// The first two distinct cities in `text`.
    pub fn extract_up_to_two(&self, text: &str) -> Vec<CityMention> {
        let mut mentions = self.extract_cities(text);
        mentions.truncate(2);
        mentions
    }

    /// Longest match starting at token `i`: `(tokens consumed, matches)`.
    /// Several matches only come from a hyphenated token.
    fn match_at(&self, tokens: &[&str], i: usize) -> (usize, Vec<CityMatch>) {
        let longest = MAX_PHRASE_TOKENS.min(tokens.len() - i);
        for len in (2..=longest).rev() {
            let phrase = tokens[i..i + len].join(" ");
            if let Some(city) = self.gazetteer.lookup(&phrase) {
                return (len, vec![CityMatch { city: city.name.clone(), score: 100, exact: true }]);
            }
        }

        let token = tokens[i];
        if token.contains('-') && self.gazetteer.lookup(token).is_none() {
            return (1, token.split('-').filter_map(|part| self.match_scored(part)).collect());
        }
        (1, self.match_scored(token).into_iter().collect())
    }
}

/// Role implied by the token right before a city.
pub fn infer_role(preceding: Option<&str>) -> Role {
    match preceding {
        Some(word) if ORIGIN_PREPOSITIONS.contains(&word) => Role::Origin,
        Some(word) if DESTINATION_PREPOSITIONS.contains(&word) => Role::Destination,
        _ => Role::Unknown,
    }
}

/// Order two mentioned cities into a trip.
///
/// Returns the pair and whether the order came from prepositions (`true`) or
/// only from mention order (`false`).
pub fn assign_roles(first: &CityMention, second: &CityMention) -> (CityPair, bool) {
    let swap = (first.role == Role::Destination && second.role != Role::Destination)
        || (second.role == Role::Origin && first.role != Role::Origin);
    let explicit = first.role != Role::Unknown || second.role != Role::Unknown;

    let pair = if swap {
        CityPair::new(&second.city, &first.city)
    } else {
        CityPair::new(&first.city, &second.city)
    };
    (pair, explicit)
}
