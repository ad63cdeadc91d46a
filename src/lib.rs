extern crate self as rozklad;

#[macro_use]
mod macros;
mod api;
mod collaborators;
mod data;
mod engine;
mod error;
mod reply;
mod rules;

pub use api::{
    Analysis, ConfirmPair, Dispatcher, DispatcherBuilder, Options, Request, Response, TurnReport, analyze,
};
pub use collaborators::{BookingNotifier, BookingRequest, Fallback, LogNotifier, PromptFallback};
pub use data::{
    LoadReport, RouteRecord, Scalar, StopRecord, load_gazetteer, load_gazetteer_file, load_routes, load_routes_file,
    read_file,
};
pub use engine::{
    Booking, City, CityMatch, CityMatcher, Confirmation, ContactDetails, DialogueState, Gazetteer, PartialCity, Price,
    Route, RouteGraph, Segment, SegmentFinder, Session, SessionStore, Stop, TurnMetrics, assign_roles, infer_role,
    normalize, similarity,
};
pub use error::DataError;
pub use reply::ReplyIntent;

use serde::Serialize;

// --- Shared types -----------------------------------------------------------

/// Direction a lone city plays in the requested trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Origin,
    Destination,
    #[default]
    Unknown,
}

/// A city recognized in a message.
///
/// `position` is the index of the first token of the match in the tokenized
/// normalized text; `score` is 100 for exact surface-form hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityMention {
    pub city: String,
    pub role: Role,
    pub position: usize,
    pub score: u8,
    pub exact: bool,
}

/// An ordered (origin, destination) pair of canonical city names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CityPair {
    pub origin: String,
    pub destination: String,
}

impl CityPair {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self { origin: origin.into(), destination: destination.into() }
    }

    /// The same trip in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self { origin: self.destination.clone(), destination: self.origin.clone() }
    }
}

pub(crate) type Answer = Box<dyn Fn(&Options) -> String + Send + Sync>;

/// A small-talk / FAQ entry: trigger phrases and the answer it produces.
///
/// Phrases are normalized text. A trailing `*` on a single-word phrase matches
/// any token starting with the stem (`цін*` matches `ціна`, `ціни`, `ціну`).
pub(crate) struct IntentRule {
    pub name: &'static str,
    /// ALL must appear in the message (AND logic).
    pub required_phrases: &'static [&'static str],
    /// At least one must appear in the message (OR logic).
    pub optional_phrases: &'static [&'static str],
    /// Higher wins; equal priorities keep table order.
    pub priority: u16,
    pub answer: Answer,
}

impl std::fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentRule")
            .field("name", &self.name)
            .field("required_phrases", &self.required_phrases)
            .field("optional_phrases", &self.optional_phrases)
            .field("priority", &self.priority)
            .field("answer", &"<function>")
            .finish()
    }
}
