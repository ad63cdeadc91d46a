//! Published routes and segment search.
//!
//! A [`Route`] is a directed sequence of stops (start → end). A [`Segment`]
//! is derived on demand: any pair of stops on one route where the origin comes
//! strictly before the destination.
//!
//! ```text
//! RouteGraph ── by_city index ──▶ candidate routes (contain origin or destination)
//!                                   │
//! SegmentFinder::find_segments ─────┴─ keep routes where idx(origin) < idx(destination)
//!                                      ─ price / time / duration / via per route
//!                                      ─▶ Vec<Segment> in route-data order
//! ```
//!
//! ## Invariants
//!
//! - Every route has at least two stops, no empty city, and no city twice
//!   (checked by [`RouteGraph::push`]). So a city has at most one index per
//!   route and "origin before destination" is well defined.
//! - `by_city[c]` lists, in ascending order, exactly the routes that stop at `c`.
//! - The graph is never mutated after loading.

use std::collections::HashMap;

use chrono::NaiveTime;
use serde::Serialize;

/// One stop of a route. `city` is a canonical (normalized) name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stop {
    pub city: String,
    pub time: Option<String>,
    pub address: Option<String>,
    pub price: Option<String>,
}

impl Stop {
    pub fn new(city: impl Into<String>) -> Self {
        Self { city: city.into(), ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    pub stops: Vec<Stop>,
    pub duration: Option<String>,
    /// Whole-route fare, as published (may be free text such as "від 400").
    pub price: Option<String>,
    pub departure_times: Vec<String>,
    pub arrival_times: Vec<String>,
}

impl Route {
    pub fn start(&self) -> &str {
        self.stops.first().map(|s| s.city.as_str()).unwrap_or_default()
    }

    pub fn end(&self) -> &str {
        self.stops.last().map(|s| s.city.as_str()).unwrap_or_default()
    }

    pub fn position(&self, city: &str) -> Option<usize> {
        self.stops.iter().position(|s| s.city == city)
    }

    /// `start → end`, canonical names.
    pub fn label(&self) -> String {
        format!("{} → {}", self.start(), self.end())
    }

    /// Public page of the route on the booking site.
    pub fn booking_link(&self, base_url: &str) -> String {
        booking_link(base_url, self.start(), self.end())
    }

    fn validate(&self) -> Result<(), String> {
        if self.stops.len() < 2 {
            return Err(format!("needs at least two stops, found {}", self.stops.len()));
        }
        for (i, stop) in self.stops.iter().enumerate() {
            if stop.city.is_empty() {
                return Err(format!("stop #{i} has no city"));
            }
            if self.stops[..i].iter().any(|s| s.city == stop.city) {
                return Err(format!("city '{}' appears twice", stop.city));
            }
        }
        Ok(())
    }
}

/// `{base}/{start}-{end}.html`, spaces in city names replaced by dashes.
pub fn booking_link(base_url: &str, start: &str, end: &str) -> String {
    format!("{}/{}-{}.html", base_url.trim_end_matches('/'), start.replace(' ', "-"), end.replace(' ', "-"))
}

/// Resolved fare of a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Price {
    /// A well-formed amount in hryvnias.
    Amount(u32),
    /// Route-level price text that is not a plain number.
    Quoted(String),
    Unspecified,
}

impl Price {
    /// `"1 200"` → `Some(1200)`; anything but digits and spaces → `None`.
    pub fn parse_amount(raw: &str) -> Option<u32> {
        let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    fn from_route(raw: &str) -> Self {
        match Self::parse_amount(raw) {
            Some(amount) => Price::Amount(amount),
            None if raw.trim().is_empty() => Price::Unspecified,
            None => Price::Quoted(raw.trim().to_string()),
        }
    }
}

/// A directed sub-path of one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Index of the route in load order.
    pub route: usize,
    pub route_label: String,
    pub route_start: String,
    pub route_end: String,
    pub origin: String,
    pub destination: String,
    pub origin_index: usize,
    pub destination_index: usize,
    pub price: Price,
    pub duration: Option<String>,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub origin_address: Option<String>,
    /// Cities strictly between origin and destination.
    pub via: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    routes: Vec<Route>,
    by_city: HashMap<String, Vec<usize>>,
}

impl RouteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a route. Returns the route index.
    pub fn push(&mut self, route: Route) -> Result<usize, String> {
        route.validate()?;
        let id = self.routes.len();
        for stop in &route.stops {
            self.by_city.entry(stop.city.clone()).or_default().push(id);
        }
        self.routes.push(route);
        Ok(id)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Routes stopping at `city`, ascending.
    pub fn routes_through(&self, city: &str) -> &[usize] {
        self.by_city.get(city).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Read-only segment search over a [`RouteGraph`].
#[derive(Debug, Clone, Copy)]
pub struct SegmentFinder<'a> {
    graph: &'a RouteGraph,
}

impl<'a> SegmentFinder<'a> {
    pub fn new(graph: &'a RouteGraph) -> Self {
        Self { graph }
    }

    /// Every segment from `origin` to `destination`, in route-data order.
    pub fn find_segments(&self, origin: &str, destination: &str) -> Vec<Segment> {
        if origin == destination {
            return Vec::new();
        }
        // Walk the shorter posting list; both are sorted by route id.
        let (a, b) = (self.graph.routes_through(origin), self.graph.routes_through(destination));
        let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

        short
            .iter()
            .filter(|&&id| long.binary_search(&id).is_ok())
            .filter_map(|&id| {
                let route = &self.graph.routes[id];
                let from = route.position(origin)?;
                let to = route.position(destination)?;
                (from < to).then(|| build_segment(id, route, from, to))
            })
            .collect()
    }

    pub fn has_segments(&self, origin: &str, destination: &str) -> bool {
        !self.find_segments(origin, destination).is_empty()
    }
}

fn build_segment(id: usize, route: &Route, from: usize, to: usize) -> Segment {
    let origin = &route.stops[from];
    let destination = &route.stops[to];
    let is_first = from == 0;
    let is_terminal = to == route.stops.len() - 1;

    Segment {
        route: id,
        route_label: route.label(),
        route_start: route.start().to_string(),
        route_end: route.end().to_string(),
        origin: origin.city.clone(),
        destination: destination.city.clone(),
        origin_index: from,
        destination_index: to,
        price: resolve_price(route, destination, is_terminal),
        duration: segment_duration(route, origin, destination, is_first && is_terminal),
        departure: origin.time.clone().or_else(|| is_first.then(|| route.departure_times.first().cloned()).flatten()),
        arrival: destination
            .time
            .clone()
            .or_else(|| is_terminal.then(|| route.arrival_times.first().cloned()).flatten()),
        origin_address: origin.address.clone(),
        via: route.stops[from + 1..to].iter().map(|s| s.city.clone()).collect(),
    }
}

/// Destination stop price if it is a plain amount, else the route price when
/// the destination is the terminal stop, else unspecified.
fn resolve_price(route: &Route, destination: &Stop, is_terminal: bool) -> Price {
    if let Some(amount) = destination.price.as_deref().and_then(Price::parse_amount) {
        return Price::Amount(amount);
    }
    match (&route.price, is_terminal) {
        (Some(raw), true) => Price::from_route(raw),
        _ => Price::Unspecified,
    }
}

fn segment_duration(route: &Route, origin: &Stop, destination: &Stop, whole_route: bool) -> Option<String> {
    if whole_route && route.duration.is_some() {
        return route.duration.clone();
    }
    let parse = |t: &Option<String>| t.as_deref().and_then(|t| NaiveTime::parse_from_str(t.trim(), "%H:%M").ok());
    match (parse(&origin.time), parse(&destination.time)) {
        (Some(dep), Some(arr)) => {
            let mut minutes = (arr - dep).num_minutes();
            if minutes < 0 {
                minutes += 24 * 60;
            }
            Some(format_minutes(minutes))
        }
        _ => route.duration.clone(),
    }
}

fn format_minutes(minutes: i64) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m} хв"),
        (h, 0) => format!("{h} год"),
        (h, m) => format!("{h} год {m} хв"),
    }
}
