//! Canonical cities and their surface forms.
//!
//! The gazetteer is the static side of city matching: built once, then only
//! read. It holds two indexes:
//!
//! - `cities`: canonical name → [`City`] (a `BTreeMap`, so iteration order is
//!   lexicographic and fuzzy tie-breaks are reproducible).
//! - `forms`: surface form → canonical name, for O(1) exact lookup.
//!
//! ## Invariants
//!
//! - Every canonical name and every form is stored normalized.
//! - A canonical name and its display spelling are always among its forms.
//! - A canonical name never collides with another city's form.
//! - A form belongs to exactly one city. A second claim on a form is rejected
//!   and reported as [`DataError::ConflictingForm`]; the first owner keeps it.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::engine::normalize;
use crate::error::DataError;
use crate::rules::cities::CITIES;

/// A canonical city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    /// Normalized identifier every other component refers to.
    pub name: String,
    /// Spelling used in replies (may keep apostrophes or a longer official name).
    pub display: String,
    /// Normalized surface forms, including `name` itself.
    pub forms: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    cities: BTreeMap<String, City>,
    forms: HashMap<String, String>,
}

impl Gazetteer {
    /// An empty gazetteer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The gazetteer shipped with the crate (see `rules/cities.rs`).
    pub fn builtin() -> Self {
        let mut gazetteer = Self::new();
        for (canonical, display, forms) in CITIES {
            for issue in gazetteer.insert(canonical, display, forms.iter().copied()) {
                tracing::warn!(%issue, "built-in gazetteer entry rejected");
            }
        }
        gazetteer
    }

    /// Add (or extend) a city.
    ///
    /// Returns the problems found; an empty vector means everything was
    /// accepted. Rejected forms are skipped, the rest of the entry is kept.
    /// An entry whose canonical name is already another city's form is
    /// rejected whole. The display spelling is registered as a form too.
    pub fn insert<'f>(
        &mut self,
        canonical: &str,
        display: &str,
        forms: impl IntoIterator<Item = &'f str>,
    ) -> Vec<DataError> {
        let name = normalize(canonical);
        if name.is_empty() {
            return vec![DataError::EmptyCity { context: format!("gazetteer entry {canonical:?}") }];
        }
        if let Some(owner) = self.forms.get(&name).filter(|owner| **owner != name) {
            return vec![DataError::ConflictingForm { form: name.clone(), owner: owner.clone(), rejected: name }];
        }

        let mut issues = Vec::new();
        let display = if display.trim().is_empty() { name.clone() } else { display.trim().to_lowercase() };
        let own_forms = [name.clone(), normalize(&display)];
        self.cities.entry(name.clone()).or_insert_with(|| City {
            name: name.clone(),
            display,
            forms: BTreeSet::new(),
        });

        for form in own_forms.into_iter().chain(forms.into_iter().map(normalize)) {
            if form.is_empty() {
                continue;
            }
            match self.forms.get(&form) {
                Some(owner) if owner != &name => {
                    issues.push(DataError::ConflictingForm { form, owner: owner.clone(), rejected: name.clone() });
                }
                Some(_) => {}
                None => {
                    self.forms.insert(form.clone(), name.clone());
                    if let Some(city) = self.cities.get_mut(&name) {
                        city.forms.insert(form);
                    }
                }
            }
        }

        issues
    }

    /// Exact lookup of an already-normalized surface form.
    pub fn lookup(&self, form: &str) -> Option<&City> {
        self.forms.get(form).and_then(|name| self.cities.get(name))
    }

    /// Lookup by canonical name.
    pub fn city(&self, name: &str) -> Option<&City> {
        self.cities.get(name)
    }

    /// Display spelling for `name`, falling back to the name itself.
    pub fn display<'a>(&'a self, name: &'a str) -> &'a str {
        self.cities.get(name).map(|c| c.display.as_str()).unwrap_or(name)
    }

    /// Cities in lexicographic order of their canonical name.
    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.cities.values()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Total number of distinct surface forms.
    pub fn form_count(&self) -> usize {
        self.forms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_no_conflicts_and_resolves_forms() {
        let mut scratch = Gazetteer::new();
        for (canonical, display, forms) in CITIES {
            let issues = scratch.insert(canonical, display, forms.iter().copied());
            assert!(issues.is_empty(), "{canonical}: {issues:?}");
        }

        let g = Gazetteer::builtin();
        assert_eq!(g.len(), CITIES.len());
        assert_eq!(g.lookup("києва").map(|c| c.name.as_str()), Some("київ"));
        assert_eq!(g.lookup(&normalize("львова")).map(|c| c.name.as_str()), Some("львів"));
        assert_eq!(g.lookup("знамянка").map(|c| c.display.as_str()), Some("знам'янка"));
        assert_eq!(g.lookup("новомосковськ").map(|c| c.name.as_str()), Some("самар"));
    }

    #[test]
    fn canonical_name_is_its_own_form() {
        let g = Gazetteer::builtin();
        for city in g.cities() {
            assert!(city.forms.contains(&city.name), "{} missing from its own forms", city.name);
            assert_eq!(g.lookup(&city.name).map(|c| &c.name), Some(&city.name));
        }
    }

    #[test]
    fn second_claim_on_a_form_is_rejected() {
        let mut g = Gazetteer::new();
        assert!(g.insert("олександрія", "", ["олександрія", "алекс"]).is_empty());
        let issues = g.insert("олександрівка", "", ["алекс", "олександрівки"]);

        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0],
            DataError::ConflictingForm { form, owner, rejected }
                if form == "алекс" && owner == "олександрія" && rejected == "олександрівка"
        ));
        assert_eq!(g.lookup("алекс").map(|c| c.name.as_str()), Some("олександрія"));
        assert_eq!(g.lookup("олександрівки").map(|c| c.name.as_str()), Some("олександрівка"));
    }

    #[test]
    fn owned_canonical_and_forms_are_accepted() {
        let mut g = Gazetteer::new();
        let canonical = String::from("Бердичів");
        let forms: Vec<String> = vec!["Бердичева".to_string(), "бердичеві".to_string()];
        let issues = g.insert(&canonical, "", forms.iter().map(String::as_str));

        assert!(issues.is_empty(), "{issues:?}");
        assert_eq!(g.lookup("бердичева").map(|c| c.name.as_str()), Some("бердичів"));
        assert_eq!(g.city("бердичів").map(|c| c.forms.len()), Some(3));
    }

    #[test]
    fn display_spelling_is_a_form() {
        let g = Gazetteer::builtin();
        let key = normalize("Новомосковськ (Самар)");
        assert_eq!(g.lookup(&key).map(|c| c.name.as_str()), Some("самар"));
        assert_eq!(g.display("самар"), "новомосковськ (самар)");
    }

    #[test]
    fn canonical_that_is_another_citys_form_is_rejected() {
        let mut g = Gazetteer::builtin();
        let before = g.len();
        let issues = g.insert("Сум", "", ["сумщина"]);

        assert!(matches!(
            issues.as_slice(),
            [DataError::ConflictingForm { form, owner, rejected }]
                if form == "сум" && owner == "суми" && rejected == "сум"
        ));
        assert!(g.city("сум").is_none());
        assert!(g.lookup("сумщина").is_none());
        assert_eq!(g.lookup("сум").map(|c| c.name.as_str()), Some("суми"));
        assert_eq!(g.len(), before);
    }

    #[test]
    fn empty_canonical_is_reported() {
        let mut g = Gazetteer::new();
        let issues = g.insert("  ' ", "", Vec::<&str>::new());
        assert!(matches!(issues.as_slice(), [DataError::EmptyCity { .. }]));
        assert!(g.is_empty());
    }
}
