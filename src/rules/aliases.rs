//! Substring substitutions applied by the normalizer.
//!
//! Keys are already lowercased and apostrophe-free. No value may contain any
//! key, otherwise normalization would not reach a fixpoint (checked in tests).

/// Ordered `(alias, canonical)` pairs. Longer keys come first so that
/// `кривой рог` is rewritten before any shorter key could split it.
pub(crate) static ALIASES: &[(&str, &str)] = &[
    ("кропивницкий", "кропивницький"),
    ("днепропетровск", "дніпро"),
    ("краматорск", "краматорськ"),
    ("кривой рог", "кривий ріг"),
    ("доброполье", "добропілля"),
    ("запорожье", "запоріжжя"),
    ("словянск", "словянськ"),
    ("николаев", "миколаїв"),
    ("винница", "вінниця"),
    ("харьков", "харків"),
    ("одесса", "одеса"),
    ("львов", "львів"),
    ("днепр", "дніпро"),
    ("киев", "київ"),
];

#[cfg(test)]
mod tests {
    use super::ALIASES;

    #[test]
    fn no_value_reintroduces_a_key() {
        for (_, value) in ALIASES {
            for (key, _) in ALIASES {
                assert!(!value.contains(key), "alias value '{value}' contains key '{key}'");
            }
        }
    }

    #[test]
    fn keys_are_ordered_longest_first_within_prefix_families() {
        for (i, (a, _)) in ALIASES.iter().enumerate() {
            for (b, _) in &ALIASES[i + 1..] {
                assert!(!b.contains(a), "'{b}' contains earlier key '{a}' and would never fire");
            }
        }
    }
}
