//! Fixed word lists the dialogue reacts to.
//!
//! Everything here is compared against *normalized* tokens, so entries are
//! lowercase and carry no apostrophes.

/// Prepositions marking the next city as the place of departure.
pub(crate) const ORIGIN_PREPOSITIONS: &[&str] = &["з", "із", "зі", "від", "с", "со", "из", "от", "from"];

/// Prepositions marking the next city as the destination.
pub(crate) const DESTINATION_PREPOSITIONS: &[&str] = &["до", "в", "у", "во", "к", "на", "to"];

pub(crate) const AFFIRMATIVE: &[&str] =
    &["так", "да", "yes", "ок", "ok", "окей", "підтверджую", "звісно", "авжеж", "угу", "ага", "вірно"];

pub(crate) const NEGATIVE: &[&str] = &["ні", "нет", "no", "не", "ніт", "неправильно"];

pub(crate) const REVERSAL: &[&str] = &["навпаки", "наоборот", "зворотно", "назад"];

/// Multi-word reversal phrases, matched on the whole normalized text.
pub(crate) const REVERSAL_PHRASES: &[&str] =
    &["в інший бік", "у зворотному напрямку", "в обратную сторону", "the other way"];

pub(crate) const CANCEL: &[&str] = &["скасувати", "скасуй", "відміна", "відмінити", "отмена", "отменить", "cancel"];

/// Ordinary words that sit within fuzzy distance of a city form: first names
/// and patronymics, plus a few common nouns. They still match exactly if a
/// gazetteer ever lists them, but are never fuzzy-matched.
pub(crate) const FUZZY_STOPWORDS: &[&str] = &[
    "микола", "миколи", "миколо", "миколу", "миколаївна",
    "олександр", "олександра", "олександре", "олександру", "олександром", "олександрівна", "олександрович",
    "смола", "смоли", "смолу", "канава", "сумки", "рівно",
];
