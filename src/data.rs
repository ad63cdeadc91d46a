//! Loading gazetteer and route data from JSON.
//!
//! Both loaders are forgiving: a broken record is skipped, logged and
//! collected into the [`LoadReport`]; only a document that cannot be read at
//! all is an `Err`.
//!
//! Route records come in two shapes, both accepted:
//!
//! ```text
//! explicit:    { "start": "Київ", "end": "Львів", "price": "500", "stops": [{ "city": "Житомир" }] }
//! stops-only:  { "price": 500, "stops": [{ "city": "Київ" }, { "city": "Житомир" }, { "city": "Львів" }] }
//! ```
//!
//! City names are resolved against the gazetteer by exact surface form. A name
//! the gazetteer does not know is registered as a new canonical city, so a
//! route is never dropped only because its cities were missing from the list.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::engine::{Gazetteer, Route, RouteGraph, Stop, normalize};
use crate::error::DataError;

/// Outcome of a load.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Records or entries that were skipped or partially rejected.
    pub issues: Vec<DataError>,
    pub routes_loaded: usize,
    pub entries_loaded: usize,
    /// Cities first seen in route data (canonical names).
    pub cities_registered: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn merge(&mut self, other: LoadReport) {
        self.issues.extend(other.issues);
        self.routes_loaded += other.routes_loaded;
        self.entries_loaded += other.entries_loaded;
        self.cities_registered.extend(other.cities_registered);
    }
}

/// A JSON value that may be written as a number or as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    pub fn into_text(self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StopRecord {
    pub city: String,
    #[serde(default)]
    pub price: Option<Scalar>,
    #[serde(default)]
    pub time: Option<Scalar>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteRecord {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub duration: Option<Scalar>,
    #[serde(default)]
    pub price: Option<Scalar>,
    #[serde(default)]
    pub departure_times: Vec<String>,
    #[serde(default)]
    pub arrival_times: Vec<String>,
    #[serde(default)]
    pub stops: Vec<StopRecord>,
}

/// Read a data file, mapping failures to [`DataError::Io`].
pub fn read_file(path: &Path) -> Result<String, DataError> {
    std::fs::read_to_string(path).map_err(|source| DataError::Io { path: path.to_path_buf(), source })
}

/// Add `{ "canonical": ["form", ...] }` entries to `gazetteer`.
pub fn load_gazetteer(json: &str, gazetteer: &mut Gazetteer) -> Result<LoadReport, DataError> {
    let document: serde_json::Map<String, Value> =
        serde_json::from_str(json).map_err(|source| DataError::Json { what: "gazetteer", source })?;

    let mut report = LoadReport::default();
    for (canonical, forms) in document {
        let forms: Vec<String> = match serde_json::from_value(forms) {
            Ok(forms) => forms,
            Err(err) => {
                let issue = DataError::InvalidEntry { name: canonical, reason: err.to_string() };
                tracing::warn!(%issue, "gazetteer entry skipped");
                report.issues.push(issue);
                continue;
            }
        };
        let issues = gazetteer.insert(&canonical, &canonical, forms.iter().map(String::as_str));
        if gazetteer.city(&normalize(&canonical)).is_some() {
            report.entries_loaded += 1;
        }
        for issue in issues {
            tracing::warn!(%issue, "gazetteer form rejected");
            report.issues.push(issue);
        }
    }

    tracing::info!(entries = report.entries_loaded, cities = gazetteer.len(), "gazetteer loaded");
    Ok(report)
}

/// Parse route records into a graph, registering unknown cities in `gazetteer`.
///
/// The top level is either an array of records or an object with a `routes`
/// array.
pub fn load_routes(json: &str, gazetteer: &mut Gazetteer) -> Result<(RouteGraph, LoadReport), DataError> {
    let document: Value = serde_json::from_str(json).map_err(|source| DataError::Json { what: "routes", source })?;
    let records = match document {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("routes") {
            Some(Value::Array(records)) => records,
            _ => {
                let source = <serde_json::Error as serde::de::Error>::custom("expected a `routes` array");
                return Err(DataError::Json { what: "routes", source });
            }
        },
        _ => {
            let source = <serde_json::Error as serde::de::Error>::custom("expected an array of routes");
            return Err(DataError::Json { what: "routes", source });
        }
    };

    let mut graph = RouteGraph::new();
    let mut report = LoadReport::default();

    for (index, value) in records.into_iter().enumerate() {
        let outcome = serde_json::from_value::<RouteRecord>(value)
            .map_err(|err| DataError::malformed_route(index, err.to_string()))
            .and_then(|record| build_route(index, record, gazetteer, &mut report))
            .and_then(|route| graph.push(route).map_err(|reason| DataError::malformed_route(index, reason)));

        match outcome {
            Ok(_) => report.routes_loaded += 1,
            Err(issue) => {
                tracing::warn!(%issue, "route skipped");
                report.issues.push(issue);
            }
        }
    }

    tracing::info!(
        routes = report.routes_loaded,
        skipped = report.issues.len(),
        new_cities = report.cities_registered.len(),
        "route catalog loaded"
    );
    Ok((graph, report))
}

fn build_route(
    index: usize,
    record: RouteRecord,
    gazetteer: &mut Gazetteer,
    report: &mut LoadReport,
) -> Result<Route, DataError> {
    let mut stops: Vec<Stop> = Vec::with_capacity(record.stops.len() + 2);

    if let Some(start) = &record.start {
        stops.push(Stop::new(resolve_city(start, gazetteer, report)));
    }
    for raw in record.stops {
        let city = resolve_city(&raw.city, gazetteer, report);
        if city.is_empty() {
            return Err(DataError::malformed_route(index, format!("stop {:?} has no usable city", raw.city)));
        }
        let stop = Stop {
            city,
            time: raw.time.map(Scalar::into_text),
            address: raw.address.filter(|a| !a.trim().is_empty()),
            price: raw.price.map(Scalar::into_text),
        };
        // An explicit start/end may also be listed as the first/last stop.
        if record.start.is_some() && stops.len() == 1 && stops[0].city == stop.city {
            stops[0] = stop;
        } else {
            stops.push(stop);
        }
    }
    if let Some(end) = &record.end {
        let city = resolve_city(end, gazetteer, report);
        if stops.last().is_none_or(|last| last.city != city) {
            stops.push(Stop::new(city));
        }
    }

    Ok(Route {
        stops,
        duration: record.duration.map(Scalar::into_text),
        price: record.price.map(Scalar::into_text),
        departure_times: record.departure_times,
        arrival_times: record.arrival_times,
    })
}

/// Canonical name for a city written in route data. Empty when the name
/// normalizes to nothing.
fn resolve_city(raw: &str, gazetteer: &mut Gazetteer, report: &mut LoadReport) -> String {
    let key = normalize(raw);
    if key.is_empty() {
        return key;
    }
    if let Some(city) = gazetteer.lookup(&key) {
        return city.name.clone();
    }

    for issue in gazetteer.insert(raw, raw, std::iter::empty()) {
        report.issues.push(issue);
    }
    tracing::debug!(city = %key, "city registered from route data");
    report.cities_registered.push(key.clone());
    key
}

/// Read and load a gazetteer file.
pub fn load_gazetteer_file(path: &Path, gazetteer: &mut Gazetteer) -> Result<LoadReport, DataError> {
    load_gazetteer(&read_file(path)?, gazetteer)
}

/// Read and load a route file.
pub fn load_routes_file(path: &Path, gazetteer: &mut Gazetteer) -> Result<(RouteGraph, LoadReport), DataError> {
    load_routes(&read_file(path)?, gazetteer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SegmentFinder;
    use pretty_assertions::assert_eq;

    fn cities(graph: &RouteGraph, id: usize) -> Vec<&str> {
        graph.routes()[id].stops.iter().map(|s| s.city.as_str()).collect()
    }

    #[test]
    fn loads_explicit_and_stops_only_records() {
        let json = r#"[
            { "start": "Київ", "end": "Львів", "duration": "8 год", "price": "500",
              "departure_times": ["07:00"], "arrival_times": ["15:00"],
              "stops": [{ "city": "Житомир", "price": "250", "time": "09:40" }] },
            { "price": 700, "stops": [{ "city": "Одеса" }, { "city": "Миколаєва" }, { "city": "Харків" }] }
        ]"#;
        let mut gazetteer = Gazetteer::builtin();
        let (graph, report) = load_routes(json, &mut gazetteer).unwrap();

        assert!(report.is_clean(), "{:?}", report.issues);
        assert_eq!(report.routes_loaded, 2);
        assert_eq!(cities(&graph, 0), vec!["київ", "житомир", "львів"]);
        assert_eq!(cities(&graph, 1), vec!["одеса", "миколаїв", "харків"]);
        assert_eq!(graph.routes()[1].price.as_deref(), Some("700"));
        assert_eq!(graph.routes()[0].stops[1].time.as_deref(), Some("09:40"));
    }

    #[test]
    fn explicit_endpoints_are_not_duplicated() {
        let json = r#"[{ "start": "Київ", "end": "Умань",
            "stops": [{ "city": "Київ", "address": "АС Видубичі" }, { "city": "Умань" }] }]"#;
        let mut gazetteer = Gazetteer::builtin();
        let (graph, _) = load_routes(json, &mut gazetteer).unwrap();
        assert_eq!(cities(&graph, 0), vec!["київ", "умань"]);
        assert_eq!(graph.routes()[0].stops[0].address.as_deref(), Some("АС Видубичі"));
    }

    #[test]
    fn malformed_records_are_skipped_with_their_index() {
        let json = r#"[
            { "stops": [{ "city": "Київ" }] },
            { "stops": "nope" },
            { "stops": [{ "city": "Київ" }, { "city": "Полтава" }, { "city": "Києва" }] },
            { "stops": [{ "city": "Київ" }, { "city": "Полтава" }] }
        ]"#;
        let mut gazetteer = Gazetteer::builtin();
        let (graph, report) = load_routes(json, &mut gazetteer).unwrap();

        assert_eq!(graph.len(), 1);
        assert_eq!(report.routes_loaded, 1);
        let skipped: Vec<usize> = report
            .issues
            .iter()
            .filter_map(|i| match i {
                DataError::MalformedRoute { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(skipped, vec![0, 1, 2]);
        assert!(SegmentFinder::new(&graph).has_segments("київ", "полтава"));
    }

    #[test]
    fn unknown_cities_are_registered() {
        let json = r#"{ "routes": [{ "stops": [{ "city": "Київ" }, { "city": "Бердичів" }] }] }"#;
        let mut gazetteer = Gazetteer::builtin();
        let (graph, report) = load_routes(json, &mut gazetteer).unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(report.cities_registered, vec!["бердичів".to_string()]);
        assert!(gazetteer.lookup("бердичів").is_some());
    }

    #[test]
    fn whole_document_errors_are_returned() {
        let mut gazetteer = Gazetteer::new();
        assert!(matches!(load_routes("{", &mut gazetteer), Err(DataError::Json { .. })));
        assert!(matches!(load_routes("42", &mut gazetteer), Err(DataError::Json { .. })));
        assert!(matches!(load_gazetteer("[]", &mut gazetteer), Err(DataError::Json { .. })));
        let missing = load_routes_file(Path::new("/definitely/not/here.json"), &mut gazetteer);
        assert!(matches!(missing, Err(DataError::Io { .. })));
    }

    #[test]
    fn gazetteer_file_extends_and_reports_conflicts() {
        let mut gazetteer = Gazetteer::builtin();
        let report = load_gazetteer(
            r#"{ "бердичів": ["бердичева", "berdychiv"], "бершадь": ["бердичева"], "бар": 5 }"#,
            &mut gazetteer,
        )
        .unwrap();

        assert_eq!(report.entries_loaded, 2);
        assert_eq!(report.issues.len(), 2);
        assert_eq!(gazetteer.lookup("berdychiv").map(|c| c.name.as_str()), Some("бердичів"));
        assert_eq!(gazetteer.lookup("бердичева").map(|c| c.name.as_str()), Some("бердичів"));
    }

    #[test]
    fn catalog_city_names_resolve_to_builtin_cities() {
        let names = [
            "бабанка", "баштанка", "бориспіль", "велика виска", "вороновиця", "вінниця", "гайсин",
            "гришине", "дніпро", "добропілля", "дружківка", "житомир", "запоріжжя", "знам'янка",
            "золотоноша", "казанка", "кам'янка", "канів", "карлівка", "київ", "коблево", "краматорськ",
            "красноград", "краснопілка", "кривий ріг", "кропивницький", "лубни", "львів", "межова",
            "миколаїв", "миколаївка", "немирів", "новий буг", "новоархангельск", "новомосковськ (самар)",
            "одеса", "олександрівка", "олександрія", "орадівка", "п'ятихатки", "павлоград", "пирятин",
            "покровськ", "полтава", "райгород", "решитилівка", "рівне", "слов'янка", "слов'янськ",
            "слов’янськ", "смоліне", "сміла", "суми", "тернопіль", "умань", "харків", "хмельницький",
            "хмельове", "хорол", "черкаси", "ізюм",
        ];
        let records: Vec<Value> = names
            .iter()
            .map(|name| {
                let other = if normalize(name) == "київ" { "Львів" } else { "Київ" };
                serde_json::json!({ "stops": [{ "city": name }, { "city": other }] })
            })
            .collect();
        let json = Value::Array(records).to_string();

        let mut gazetteer = Gazetteer::builtin();
        let before = gazetteer.len();
        let (graph, report) = load_routes(&json, &mut gazetteer).unwrap();

        assert!(report.is_clean(), "{:?}", report.issues);
        assert_eq!(report.cities_registered, Vec::<String>::new());
        assert_eq!(report.routes_loaded, names.len());
        assert_eq!(gazetteer.len(), before);
        assert!(SegmentFinder::new(&graph).has_segments("самар", "київ"));
    }

    #[test]
    fn route_to_display_spelling_is_found_by_canonical_name() {
        let json = r#"[{ "stops": [{ "city": "Дніпро" }, { "city": "Новомосковськ (Самар)" }] }]"#;
        let mut gazetteer = Gazetteer::builtin();
        let (graph, report) = load_routes(json, &mut gazetteer).unwrap();

        assert!(report.cities_registered.is_empty(), "{:?}", report.cities_registered);
        assert_eq!(cities(&graph, 0), vec!["дніпро", "самар"]);
        assert!(SegmentFinder::new(&graph).has_segments("дніпро", "самар"));
    }

    #[test]
    fn rejected_gazetteer_entries_are_not_counted() {
        let mut gazetteer = Gazetteer::builtin();
        let report = load_gazetteer(r#"{ "сум": ["сумщина"], "бар": ["бару"] }"#, &mut gazetteer).unwrap();

        assert_eq!(report.entries_loaded, 1);
        assert!(matches!(report.issues.as_slice(), [DataError::ConflictingForm { form, .. }] if form == "сум"));
        assert!(gazetteer.city("сум").is_none());
        assert_eq!(gazetteer.lookup("бару").map(|c| c.name.as_str()), Some("бар"));
    }
}
