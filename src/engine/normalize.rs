//! Text canonicalization.
//!
//! Every other stage of the engine works on normalized text: user messages,
//! gazetteer forms and route-data city names all go through [`normalize`], so
//! two spellings that should be equal become byte-identical strings.
//!
//! ```text
//! raw ─ lowercase ─ strip apostrophes ─ fold Latin diacritics
//!     ─ collapse whitespace ─ alias table (to fixpoint) ─▶ normalized
//! ```
//!
//! The alias pass is repeated until nothing changes, the same saturation idea
//! the matcher uses for phrases: as long as no alias value contains an alias
//! key (see `rules/aliases.rs`), the result is a fixpoint and therefore
//! `normalize(normalize(x)) == normalize(x)`.

use crate::rules::aliases::ALIASES;

const APOSTROPHES: &[char] = &['\'', '’', '‘', '`', 'ʼ', '´', 'ʹ'];

/// Canonicalize `text`. Pure and idempotent.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !APOSTROPHES.contains(c) && !is_combining_mark(*c))
        .map(fold_latin)
        .collect();

    let mut out = folded.split_whitespace().collect::<Vec<_>>().join(" ");

    // Bounded: each pass either changes nothing or rewrites at least one alias.
    for _ in 0..=ALIASES.len() {
        let mut changed = false;
        for (alias, canonical) in ALIASES {
            if out.contains(alias) {
                out = out.replace(alias, canonical);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    out
}

/// Split normalized text into word tokens.
///
/// Separators are whitespace and punctuation; hyphens inside a word are kept
/// (`ліво-бережний`) but trimmed from the edges.
pub(crate) fn tokenize(normalized: &str) -> Vec<&str> {
    normalized
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .map(|t| t.trim_matches('-'))
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Fold precomposed Latin letters with diacritics to their base letter.
///
/// Only Latin code points are touched: Cyrillic `ї`, `й`, `ё` are distinct
/// letters, not decorated ones.
fn fold_latin(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => 'i',
        'ł' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ř' => 'r',
        'ś' | 'š' => 's',
        'ť' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lowercases_and_collapses_whitespace() {
        assert_eq!(normalize("  З   Києва\tдо  ЛЬВОВА  "), "з києва до львіва");
    }

    #[test]
    fn strips_every_apostrophe_variant() {
        for raw in ["знам'янка", "знам’янка", "знам‘янка", "знам`янка", "знамʼянка"] {
            assert_eq!(normalize(raw), "знамянка", "input {raw:?}");
        }
    }

    #[test]
    fn applies_alias_table() {
        assert_eq!(normalize("Днепр"), "дніпро");
        assert_eq!(normalize("из Харькова в Одессу"), "из харківа в одессу");
        assert_eq!(normalize("кривой рог"), "кривий ріг");
        assert_eq!(normalize("Днепропетровск"), "дніпро");
    }

    #[test]
    fn folds_latin_diacritics_but_keeps_cyrillic_letters() {
        assert_eq!(normalize("Kyïv"), "kyiv");
        assert_eq!(normalize("Київ"), "київ");
        assert_eq!(normalize("Мёд й"), "мёд й");
    }

    #[test]
    fn tokenize_splits_on_punctuation() {
        assert_eq!(tokenize("з києва, до львіва?"), vec!["з", "києва", "до", "львіва"]);
        assert_eq!(tokenize("київ→львів"), vec!["київ", "львів"]);
        assert_eq!(tokenize("- київ -"), vec!["київ"]);
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(text in "\\PC{0,40}") {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalize_is_idempotent_on_city_like_text(text in "(з|до|из|в)? ?(киев|львов|днепр|одесса|харьков|кривой рог|знам'янка)[а-я]{0,3}") {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once);
        }
    }
}
