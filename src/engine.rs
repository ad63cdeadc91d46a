//! Query-resolution and dialogue engine.
//!
//! This module is the *internal entry point* of the dispatcher. It is split
//! into focused submodules under `src/engine/` while keeping paths short (for
//! example `crate::engine::Gazetteer` and `crate::engine::TriggerInfo`).
//!
//! ## How the parts work together
//!
//! Handling one message is a pipeline:
//!
//! ```text
//! cities (rules/cities.rs) ─┐
//! gazetteer json ───────────┤  Gazetteer::insert          (gazetteer.rs)
//! route json ───────────────┴─ data::load_routes ─▶ RouteGraph (route_graph.rs)
//!                               │
//! message ─ normalize ──────────┼─ TriggerInfo::scan       (trigger.rs)
//!          (normalize.rs)       │    - tokens, confirmation signals
//!                               ├─ CityMatcher::extract_cities (matcher.rs)
//!                               │    - exact surface form, else fuzzy (similarity.rs)
//!                               │    - role from the preceding preposition
//!                               v
//!                     Dialogue::step (dialogue.rs)
//!                       - session state (session.rs)
//!                       - SegmentFinder (route_graph.rs)
//!                       - IntentTable for FAQ (intents.rs)
//!                       - contact parsing (contact.rs)
//!                               │
//!                               v
//!                         ReplyIntent ─▶ reply::Renderer ─▶ Response
//! ```
//!
//! Everything left of `Dialogue::step` is pure and shared: the gazetteer, the
//! route graph and the intent table are built once and never mutated. Only
//! [`Session`] values change, one turn at a time under a per-session lock.
//!
//! ## Responsibilities by module
//!
//! - `normalize.rs`: text canonicalization and tokenization.
//! - `similarity.rs`: the fuzzy score.
//! - `gazetteer.rs`: canonical cities and surface forms.
//! - `matcher.rs`: phrase → city, message → mentions, role inference.
//! - `route_graph.rs`: routes, the per-city index and segment search.
//! - `trigger.rs`: per-message token scan and confirmation signals.
//! - `intents.rs`: the ordered FAQ table.
//! - `contact.rs`: `name + phone` parsing.
//! - `session.rs`: session data and the concurrent store.
//! - `dialogue.rs`: the state machine.
//! - `metrics.rs`: per-turn timings.
//!
//! ## Extending
//!
//! - New cities or spellings go in `src/rules/cities.rs` (or a gazetteer file);
//!   new Russian stems that should rewrite before matching go in
//!   `src/rules/aliases.rs`.
//! - New confirmation words go in `src/rules/lexicon.rs`. A new kind of signal
//!   needs a `SignalMask` bit, a check in `TriggerInfo::scan` and, if it is a
//!   confirmation, a row in the precedence table.
//! - New FAQ answers go in `src/rules/intents/rules.rs`.
//!
//! ## Debugging
//!
//! Set `ROZKLAD_LOG=rozklad=debug` to log every step, or `=trace` to also see
//! rejected fuzzy candidates.

#[path = "engine/contact.rs"]
pub(crate) mod contact;
#[path = "engine/dialogue.rs"]
pub(crate) mod dialogue;
#[path = "engine/gazetteer.rs"]
mod gazetteer;
#[path = "engine/intents.rs"]
pub(crate) mod intents;
#[path = "engine/matcher.rs"]
pub(crate) mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/normalize.rs"]
pub(crate) mod normalize;
#[path = "engine/route_graph.rs"]
pub(crate) mod route_graph;
#[path = "engine/session.rs"]
pub(crate) mod session;
#[path = "engine/similarity.rs"]
mod similarity;
#[path = "engine/trigger.rs"]
mod trigger;

pub use contact::ContactDetails;
pub use gazetteer::{City, Gazetteer};
pub use matcher::{CityMatch, CityMatcher, assign_roles, infer_role};
pub use metrics::TurnMetrics;
pub use normalize::normalize;
pub use route_graph::{Price, Route, RouteGraph, Segment, SegmentFinder, Stop};
pub use session::{Booking, DialogueState, PartialCity, Session, SessionStore};
pub use similarity::similarity;
pub use trigger::{Confirmation, SignalMask, TriggerInfo};
