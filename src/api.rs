use crate::collaborators::{BookingNotifier, Fallback, LogNotifier, PromptFallback};
use crate::data::{self, LoadReport};
use crate::engine::dialogue::{Dialogue, Turn};
use crate::engine::intents::IntentTable;
use crate::engine::{
    CityMatcher, Confirmation, DialogueState, Gazetteer, RouteGraph, SegmentFinder, Session, SessionStore,
    TriggerInfo, TurnMetrics, normalize,
};
use crate::error::DataError;
use crate::reply::{Renderer, ReplyIntent};
use crate::{CityMention, CityPair, IntentRule};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

static DEFAULT_INTENTS: Lazy<Vec<IntentRule>> = Lazy::new(crate::rules::intents::rules::get);
static BUILTIN_GAZETTEER: Lazy<Gazetteer> = Lazy::new(Gazetteer::builtin);

/// Options that affect matching, sessions and reply text.
///
/// Every field has a default, so a config file only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Minimum fuzzy score (0..=100) for a non-exact city match.
    pub fuzzy_threshold: u8,
    /// Tokens shorter than this (in characters) are only matched exactly.
    pub min_fuzzy_len: usize,
    /// Sessions idle for longer are evicted.
    pub session_idle_secs: u64,
    /// Run the idle sweep every this many turns (0 disables it).
    pub sweep_every: u64,
    pub booking_base_url: String,
    pub dispatcher_name: String,
    pub dispatcher_phone: String,
    /// Extra segments listed after the offered one.
    pub max_alternatives: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 75,
            min_fuzzy_len: 5,
            session_idle_secs: 30 * 60,
            sweep_every: 64,
            booking_base_url: "https://bus-timel.com.ua/routes".to_string(),
            dispatcher_name: "Bus-Timel".to_string(),
            dispatcher_phone: "+38 075 375 00 00".to_string(),
            max_alternatives: 3,
        }
    }
}

impl Options {
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        serde_json::from_str(json).map_err(|source| DataError::Json { what: "config", source })
    }
}

fn default_session_id() -> String {
    "default".to_string()
}

/// One inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

impl Request {
    pub fn new(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self { message: message.into(), session_id: session_id.into() }
    }
}

/// The pending pair, mirrored so a client can render quick-reply buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmPair {
    pub start: String,
    pub end: String,
}

impl From<&CityPair> for ConfirmPair {
    fn from(pair: &CityPair) -> Self {
        Self { start: pair.origin.clone(), end: pair.destination.clone() }
    }
}

/// One outbound reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm: Option<ConfirmPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<bool>,
}

impl Response {
    pub(crate) fn text(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), confirm: None, html: None }
    }

    pub(crate) fn html(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), confirm: None, html: Some(true) }
    }

    pub(crate) fn with_confirm(mut self, pair: ConfirmPair) -> Self {
        self.confirm = Some(pair);
        self
    }
}

/// What the engine recognized in one message, independent of any session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub normalized: String,
    pub tokens: Vec<String>,
    pub mentions: Vec<CityMention>,
    pub confirmation: Option<Confirmation>,
    /// Name of the FAQ rule that would answer, if any.
    pub intent: Option<&'static str>,
}

/// Everything [`Dispatcher::handle_verbose`] knows about a turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    pub session_id: String,
    pub message: String,
    pub analysis: Analysis,
    pub state_before: DialogueState,
    pub state_after: DialogueState,
    pub intent: ReplyIntent,
    pub response: Response,
    pub metrics: TurnMetrics,
}

/// Analyze `text` against the built-in gazetteer and default options.
///
/// # Example
/// ```
/// let out = rozklad::analyze("з Києва до Львова");
/// let cities: Vec<_> = out.mentions.iter().map(|m| m.city.as_str()).collect();
/// assert_eq!(cities, ["київ", "львів"]);
/// ```
pub fn analyze(text: &str) -> Analysis {
    let options = Options::default();
    let table = IntentTable::new(DEFAULT_INTENTS.as_slice());
    let (analysis, _) = analyze_with(text, &BUILTIN_GAZETTEER, &options, &table);
    analysis
}

fn analyze_with(text: &str, gazetteer: &Gazetteer, options: &Options, table: &IntentTable<'_>) -> (Analysis, TriggerInfo) {
    let normalized = normalize(text);
    let trigger = TriggerInfo::scan(&normalized);
    let mentions = CityMatcher::new(gazetteer, options).extract_cities(text);
    let analysis = Analysis {
        tokens: trigger.tokens.clone(),
        confirmation: trigger.confirmation(),
        intent: table.find(&trigger).map(|rule| rule.name),
        normalized,
        mentions,
    };
    (analysis, trigger)
}

/// Builder for [`Dispatcher`].
#[derive(Default)]
pub struct DispatcherBuilder {
    options: Option<Options>,
    gazetteer: Option<Gazetteer>,
    gazetteer_json: Vec<String>,
    routes: Option<RouteGraph>,
    routes_json: Option<String>,
    notifier: Option<Box<dyn BookingNotifier>>,
    fallback: Option<Box<dyn Fallback>>,
}

impl DispatcherBuilder {
    pub fn options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Start from this gazetteer instead of the built-in one.
    pub fn gazetteer(mut self, gazetteer: Gazetteer) -> Self {
        self.gazetteer = Some(gazetteer);
        self
    }

    /// Extra `{ "canonical": ["form", ...] }` entries; may be called repeatedly.
    pub fn gazetteer_json(mut self, json: impl Into<String>) -> Self {
        self.gazetteer_json.push(json.into());
        self
    }

    /// An already built route graph (takes precedence over `routes_json`).
    pub fn routes(mut self, graph: RouteGraph) -> Self {
        self.routes = Some(graph);
        self
    }

    pub fn routes_json(mut self, json: impl Into<String>) -> Self {
        self.routes_json = Some(json.into());
        self
    }

    pub fn notifier(mut self, notifier: impl BookingNotifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn fallback(mut self, fallback: impl Fallback + 'static) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Load data and assemble the dispatcher.
    ///
    /// Fails only on whole-document errors; skipped records end up in
    /// [`Dispatcher::load_report`].
    pub fn build(self) -> Result<Dispatcher, DataError> {
        let options = self.options.unwrap_or_default();
        let mut gazetteer = self.gazetteer.unwrap_or_else(Gazetteer::builtin);
        let mut report = LoadReport::default();

        for json in &self.gazetteer_json {
            report.merge(data::load_gazetteer(json, &mut gazetteer)?);
        }

        let graph = match (self.routes, self.routes_json) {
            (Some(graph), _) => graph,
            (None, Some(json)) => {
                let (graph, routes_report) = data::load_routes(&json, &mut gazetteer)?;
                report.merge(routes_report);
                graph
            }
            (None, None) => {
                tracing::warn!("no route data given, every trip will be reported as not served");
                RouteGraph::new()
            }
        };

        tracing::info!(
            cities = gazetteer.len(),
            forms = gazetteer.form_count(),
            routes = graph.len(),
            issues = report.issues.len(),
            "dispatcher ready"
        );

        Ok(Dispatcher {
            sessions: SessionStore::new(Duration::from_secs(options.session_idle_secs)),
            intents: IntentTable::new(DEFAULT_INTENTS.as_slice()),
            notifier: self.notifier.unwrap_or_else(|| Box::new(LogNotifier)),
            fallback: self.fallback.unwrap_or_else(|| Box::new(PromptFallback)),
            turns: AtomicU64::new(0),
            options,
            gazetteer,
            graph,
            report,
        })
    }
}

/// The dialogue engine with its catalogs, sessions and collaborators.
///
/// `Dispatcher` is `Send + Sync`: share it behind an `Arc` and call
/// [`handle`](Self::handle) from as many threads as needed. Turns for
/// different sessions run in parallel; turns for one session are serialized.
pub struct Dispatcher {
    options: Options,
    gazetteer: Gazetteer,
    graph: RouteGraph,
    intents: IntentTable<'static>,
    sessions: SessionStore,
    notifier: Box<dyn BookingNotifier>,
    fallback: Box<dyn Fallback>,
    turns: AtomicU64,
    report: LoadReport,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("options", &self.options)
            .field("cities", &self.gazetteer.len())
            .field("routes", &self.graph.len())
            .field("intents", &self.intents.len())
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Process one message and return the reply.
    pub fn handle(&self, request: &Request) -> Response {
        self.handle_verbose(request).response
    }

    /// Process one message and return the reply together with analysis,
    /// state transition and timings.
    pub fn handle_verbose(&self, request: &Request) -> TurnReport {
        let started = Instant::now();
        let mut metrics = TurnMetrics::default();

        let (analysis, trigger) = analyze_with(&request.message, &self.gazetteer, &self.options, &self.intents);
        metrics.analyze = started.elapsed();

        let dialogue = Dialogue {
            finder: SegmentFinder::new(&self.graph),
            intents: &self.intents,
            options: &self.options,
            notifier: self.notifier.as_ref(),
        };
        let turn = Turn { raw: &request.message, trigger: &trigger, mentions: &analysis.mentions };

        let locking = Instant::now();
        let mut lock_wait = Duration::ZERO;
        let (state_before, intent, state_after) = self.sessions.with_session(&request.session_id, locking, |session| {
            lock_wait = locking.elapsed();
            let before = session.state();
            let intent = dialogue.step(session, &turn);
            (before, intent, session.state())
        });
        metrics.lock_wait = lock_wait;
        metrics.transition = locking.elapsed().saturating_sub(lock_wait);

        // The collaborator runs outside the session lock.
        let intent = match intent {
            ReplyIntent::Delegate => {
                let asked = Instant::now();
                let text = self.fallback.answer(&request.message);
                metrics.fallback = asked.elapsed();
                ReplyIntent::Fallback { text }
            }
            other => other,
        };

        let rendering = Instant::now();
        let response = Renderer { gazetteer: &self.gazetteer, options: &self.options }.render(&intent);
        metrics.render = rendering.elapsed();

        self.maybe_sweep();
        metrics.total = started.elapsed();

        tracing::debug!(
            session = %request.session_id,
            from = %state_before,
            to = %state_after,
            reply = intent.name(),
            elapsed_us = metrics.total.as_micros() as u64,
            "turn handled"
        );

        TurnReport {
            session_id: request.session_id.clone(),
            message: request.message.clone(),
            analysis,
            state_before,
            state_after,
            intent,
            response,
            metrics,
        }
    }

    fn maybe_sweep(&self) {
        let every = self.options.sweep_every;
        let turn = self.turns.fetch_add(1, Ordering::Relaxed) + 1;
        if every > 0 && turn % every == 0 {
            self.evict_idle();
        }
    }

    /// Drop sessions idle longer than `session_idle_secs`.
    pub fn evict_idle(&self) -> usize {
        self.sessions.evict_idle_at(Instant::now())
    }

    /// A copy of a session's current state.
    pub fn session(&self, session_id: &str) -> Option<Session> {
        self.sessions.snapshot(session_id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    pub fn routes(&self) -> &RouteGraph {
        &self.graph
    }

    /// Problems found while loading data.
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }
}
