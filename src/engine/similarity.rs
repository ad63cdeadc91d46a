//! String similarity used for fuzzy city matching.
//!
//! The score is a normalized Levenshtein ratio on Unicode scalar values:
//!
//! ```text
//! score(a, b) = floor(100 * (1 - distance(a, b) / max(len(a), len(b))))
//! ```
//!
//! so identical strings score 100 and completely different strings of equal
//! length score 0. Working on `char`s (not bytes) matters: Cyrillic letters are
//! two bytes each in UTF-8 and a byte-level distance would double every edit.

/// Similarity of `a` and `b` on a 0..=100 scale.
pub fn similarity(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 100;
    }
    let distance = levenshtein(&a, &b);
    ((longest - distance) * 100 / longest) as u8
}

/// Classic two-row dynamic-programming edit distance.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let insertion = curr[j] + 1;
            let deletion = prev[j + 1] + 1;
            curr[j + 1] = substitution.min(insertion).min(deletion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_100() {
        assert_eq!(similarity("київ", "київ"), 100);
        assert_eq!(similarity("", ""), 100);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // one substitution over five characters
        assert_eq!(similarity("львів", "львов"), 80);
        assert_eq!(similarity("полтава", "полтва"), 85);
    }

    #[test]
    fn unrelated_words_score_low() {
        assert!(similarity("хочу", "хорол") < 50);
        assert_eq!(similarity("abc", "xyz"), 0);
    }

    #[test]
    fn distance_handles_empty_sides() {
        assert_eq!(similarity("", "суми"), 0);
        assert_eq!(levenshtein(&['a', 'b'], &[]), 2);
    }
}
