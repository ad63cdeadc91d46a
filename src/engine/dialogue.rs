//! The per-session dialogue state machine.
//!
//! One call to [`Dialogue::step`] is one turn: it reads the session, the
//! message analysis ([`Turn`]) and the read-only catalogs, mutates the session
//! in place and returns the [`ReplyIntent`] to render.
//!
//! ```text
//!            any message                 2 cities, route found
//!   NEW ───────────────────▶ READY ─────────────────────────────▶ AWAIT_CONFIRM
//!                           │  ▲  ▲                                │   │    ▲
//!                   1 city  │  │  └──── no / cancel ──────────────┘   │    │ reverse
//!                           ▼  │ no route                              │    │ (served)
//!               AWAIT_SECOND_CITY ── 2nd city, route found ──────────┘────┘
//!                                                                      │ yes
//!   READY ◀── contact sent / cancel ── AWAIT_CONTACT ◀─── itinerary ───┘
//! ```
//!
//! ## Invariants
//!
//! - A session is only left in `AWAIT_CONFIRM` with a pair that has at least
//!   one segment.
//! - Only `READY` with zero cities, no FAQ match and something other than a
//!   bare yes/no/reverse/cancel answer delegates to the fallback collaborator,
//!   and at most once per turn (the dispatcher performs the call after the
//!   session lock is released).
//! - The catalogs are never mutated here.

use crate::collaborators::{BookingNotifier, BookingRequest};
use crate::engine::contact::parse_contact;
use crate::engine::intents::IntentTable;
use crate::engine::matcher::assign_roles;
use crate::engine::session::{Booking, PartialCity};
use crate::engine::{Confirmation, DialogueState, SegmentFinder, Session, SignalMask, TriggerInfo};
use crate::{CityMention, Options, ReplyIntent, Role};

/// What the analysis stage learned about one message.
#[derive(Debug, Clone)]
pub struct Turn<'t> {
    pub raw: &'t str,
    pub trigger: &'t TriggerInfo,
    pub mentions: &'t [CityMention],
}

pub(crate) struct Dialogue<'a> {
    pub finder: SegmentFinder<'a>,
    pub intents: &'a IntentTable<'a>,
    pub options: &'a Options,
    pub notifier: &'a dyn BookingNotifier,
}

impl Dialogue<'_> {
    pub fn step(&self, session: &mut Session, turn: &Turn<'_>) -> ReplyIntent {
        let state = session.state();
        tracing::debug!(%state, cities = turn.mentions.len(), signals = ?turn.trigger.signals, "dialogue step");

        match state {
            DialogueState::New => {
                session.greeted = true;
                ReplyIntent::Greeting
            }
            DialogueState::Ready => self.ready(session, turn),
            DialogueState::AwaitSecondCity => self.await_second_city(session, turn),
            DialogueState::AwaitConfirm => self.await_confirm(session, turn),
            DialogueState::AwaitContact => self.await_contact(session, turn),
        }
    }

    fn ready(&self, session: &mut Session, turn: &Turn<'_>) -> ReplyIntent {
        match turn.mentions {
            [] => {
                if let Some((rule, text)) = self.intents.answer(turn.trigger, self.options) {
                    ReplyIntent::Answer { rule, text }
                } else if turn.trigger.is_bare_answer() {
                    // a stray "yes"/"no" with nothing pending
                    ReplyIntent::AskRestate
                } else {
                    ReplyIntent::Delegate
                }
            }
            [only] => {
                session.partial_city = Some(PartialCity { city: only.city.clone(), role: only.role });
                ask_missing(&only.city, only.role)
            }
            [first, second] => self.propose(session, first, second),
            many => ReplyIntent::TooManyCities { cities: many.iter().map(|m| m.city.clone()).collect() },
        }
    }

    fn await_second_city(&self, session: &mut Session, turn: &Turn<'_>) -> ReplyIntent {
        let Some(partial) = session.partial_city.clone() else {
            return self.ready(session, turn);
        };

        match turn.mentions {
            [] => match turn.trigger.confirmation() {
                Some(Confirmation::Cancel | Confirmation::Negate) => {
                    session.reset();
                    ReplyIntent::AskRestate
                }
                _ => match self.intents.answer(turn.trigger, self.options) {
                    Some((rule, text)) => ReplyIntent::Answer { rule, text },
                    None => ask_missing(&partial.city, partial.role),
                },
            },
            [only] if only.city == partial.city => ask_missing(&partial.city, partial.role),
            // "до одеси" then "до києва": the newer city replaces the older one.
            [only] if only.role != Role::Unknown && only.role == partial.role => {
                session.partial_city = Some(PartialCity { city: only.city.clone(), role: only.role });
                ask_missing(&only.city, only.role)
            }
            [only] => {
                let earlier = CityMention {
                    city: partial.city.clone(),
                    role: partial.role,
                    position: 0,
                    score: 100,
                    exact: true,
                };
                self.propose(session, &earlier, only)
            }
            // A full pair (or more) restarts the question.
            _ => {
                session.partial_city = None;
                self.ready(session, turn)
            }
        }
    }

    fn await_confirm(&self, session: &mut Session, turn: &Turn<'_>) -> ReplyIntent {
        let Some(pending) = session.pending_confirmation.clone() else {
            return self.ready(session, turn);
        };

        match turn.trigger.confirmation() {
            Some(Confirmation::Reverse) => {
                let reversed = pending.reversed();
                if self.finder.has_segments(&reversed.origin, &reversed.destination) {
                    session.pending_confirmation = Some(reversed.clone());
                    ReplyIntent::Confirm { pair: reversed }
                } else {
                    ReplyIntent::ReverseUnavailable { pair: pending }
                }
            }
            Some(Confirmation::Cancel | Confirmation::Negate) => {
                session.reset();
                ReplyIntent::AskRestate
            }
            Some(Confirmation::Affirm) => {
                session.pending_confirmation = None;
                let segments = self.finder.find_segments(&pending.origin, &pending.destination);
                let Some(offer) = segments.first() else {
                    return ReplyIntent::NoRoute { pair: pending };
                };
                session.booking = Some(Booking { pair: pending.clone(), route_label: offer.route_label.clone() });
                ReplyIntent::Itinerary { pair: pending, segments }
            }
            None => match turn.mentions {
                [first, second] => self.propose(session, first, second),
                _ => ReplyIntent::Confirm { pair: pending },
            },
        }
    }

    fn await_contact(&self, session: &mut Session, turn: &Turn<'_>) -> ReplyIntent {
        let Some(booking) = session.booking.clone() else {
            return self.ready(session, turn);
        };

        let contact = turn.trigger.signals.contains(SignalMask::HAS_DIGITS).then(|| parse_contact(turn.raw)).flatten();
        let Some(contact) = contact else {
            return match turn.trigger.confirmation() {
                Some(Confirmation::Cancel | Confirmation::Negate) => {
                    session.reset();
                    ReplyIntent::BookingCancelled
                }
                _ => ReplyIntent::ContactFormat,
            };
        };

        let request = BookingRequest {
            name: contact.name.clone(),
            phone: contact.phone,
            origin: booking.pair.origin.clone(),
            destination: booking.pair.destination.clone(),
            route_label: booking.route_label.clone(),
        };
        if self.notifier.submit_booking(&request) {
            tracing::info!(route = %booking.route_label, "booking handed off");
            session.reset();
            ReplyIntent::BookingAccepted { name: contact.name, pair: booking.pair }
        } else {
            tracing::warn!(route = %booking.route_label, "booking notifier refused the request");
            ReplyIntent::BookingFailed
        }
    }

    /// Turn two mentions into a pending confirmation, or report no route.
    fn propose(&self, session: &mut Session, first: &CityMention, second: &CityMention) -> ReplyIntent {
        session.partial_city = None;
        let (pair, explicit) = assign_roles(first, second);

        let pair = if self.finder.has_segments(&pair.origin, &pair.destination) {
            Some(pair)
        } else {
            let reversed = pair.reversed();
            (!explicit && self.finder.has_segments(&reversed.origin, &reversed.destination)).then_some(reversed)
        };

        match pair {
            Some(pair) => {
                session.pending_confirmation = Some(pair.clone());
                ReplyIntent::Confirm { pair }
            }
            None => {
                session.pending_confirmation = None;
                let (pair, _) = assign_roles(first, second);
                ReplyIntent::NoRoute { pair }
            }
        }
    }
}

/// Ask for the city that is still missing. A lone city without a preposition
/// is taken as the origin.
fn ask_missing(city: &str, role: Role) -> ReplyIntent {
    match role {
        Role::Destination => ReplyIntent::AskOrigin { destination: city.to_string() },
        Role::Origin | Role::Unknown => ReplyIntent::AskDestination { origin: city.to_string() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CityPair;
    use crate::engine::{CityMatcher, Gazetteer, Route, RouteGraph, Stop, normalize};
    use crate::rules::intents::rules;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    struct Recorder {
        accept: bool,
        seen: Mutex<Vec<BookingRequest>>,
    }

    impl BookingNotifier for Recorder {
        fn submit_booking(&self, request: &BookingRequest) -> bool {
            self.seen.lock().push(request.clone());
            self.accept
        }
    }

    struct Fixture {
        gazetteer: Gazetteer,
        graph: RouteGraph,
        intents: Vec<crate::IntentRule>,
        options: Options,
        notifier: Recorder,
    }

    impl Fixture {
        fn new(accept: bool) -> Self {
            let mut graph = RouteGraph::new();
            let route = |cities: &[&str], price: &str| Route {
                stops: cities.iter().map(|c| Stop::new(*c)).collect(),
                price: Some(price.to_string()),
                ..Route::default()
            };
            graph.push(route(&["київ", "житомир", "рівне", "львів"], "500")).unwrap();
            graph.push(route(&["львів", "київ"], "520")).unwrap();
            graph.push(route(&["полтава", "харків"], "300")).unwrap();
            Fixture {
                gazetteer: Gazetteer::builtin(),
                graph,
                intents: rules::get(),
                options: Options::default(),
                notifier: Recorder { accept, seen: Mutex::new(Vec::new()) },
            }
        }

        fn say(&self, session: &mut Session, text: &str) -> ReplyIntent {
            let matcher = CityMatcher::new(&self.gazetteer, &self.options);
            let trigger = TriggerInfo::scan(&normalize(text));
            let mentions = matcher.extract_cities(text);
            let table = IntentTable::new(&self.intents);
            let dialogue = Dialogue {
                finder: SegmentFinder::new(&self.graph),
                intents: &table,
                options: &self.options,
                notifier: &self.notifier,
            };
            dialogue.step(session, &Turn { raw: text, trigger: &trigger, mentions: &mentions })
        }

        fn greeted(&self) -> Session {
            Session { greeted: true, ..Session::default() }
        }
    }

    fn pair(a: &str, b: &str) -> CityPair {
        CityPair::new(a, b)
    }

    #[test]
    fn first_message_only_greets() {
        let fx = Fixture::new(true);
        let mut session = Session::default();
        assert_eq!(fx.say(&mut session, "з києва до львова"), ReplyIntent::Greeting);
        assert_eq!(session.state(), DialogueState::Ready);
        assert_eq!(session.pending_confirmation, None);
    }

    #[test]
    fn two_cities_ask_for_confirmation() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        assert_eq!(fx.say(&mut session, "з києва до львова"), ReplyIntent::Confirm { pair: pair("київ", "львів") });
        assert_eq!(session.state(), DialogueState::AwaitConfirm);
    }

    #[test]
    fn confirming_shows_itinerary_and_waits_for_contact() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        fx.say(&mut session, "з києва до львова");
        let reply = fx.say(&mut session, "так");

        let ReplyIntent::Itinerary { pair: p, segments } = reply else { panic!("expected an itinerary") };
        assert_eq!(p, pair("київ", "львів"));
        assert_eq!(segments[0].price, crate::engine::Price::Amount(500));
        assert_eq!(session.state(), DialogueState::AwaitContact);
        assert_eq!(session.booking.as_ref().map(|b| b.route_label.as_str()), Some("київ → львів"));
    }

    #[test]
    fn contact_hands_off_exactly_once_and_clears_booking() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        fx.say(&mut session, "з києва до львова");
        fx.say(&mut session, "так");
        let reply = fx.say(&mut session, "Олег +380501234567");

        assert_eq!(reply, ReplyIntent::BookingAccepted { name: "Олег".into(), pair: pair("київ", "львів") });
        let seen = fx.notifier.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].name, "Олег");
        assert_eq!(seen[0].phone, "+380501234567");
        assert_eq!((seen[0].origin.as_str(), seen[0].destination.as_str()), ("київ", "львів"));
        assert_eq!(session, fx.greeted());
        assert_eq!(session.state(), DialogueState::Ready);
    }

    #[test]
    fn refused_booking_keeps_waiting_for_contact() {
        let fx = Fixture::new(false);
        let mut session = fx.greeted();
        fx.say(&mut session, "з києва до львова");
        fx.say(&mut session, "так");
        assert_eq!(fx.say(&mut session, "Олег +380501234567"), ReplyIntent::BookingFailed);
        assert_eq!(session.state(), DialogueState::AwaitContact);
    }

    #[test]
    fn malformed_contact_reprompts_and_cancel_clears() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        fx.say(&mut session, "з києва до львова");
        fx.say(&mut session, "так");
        assert_eq!(fx.say(&mut session, "Олег"), ReplyIntent::ContactFormat);
        assert_eq!(session.state(), DialogueState::AwaitContact);
        assert_eq!(fx.say(&mut session, "скасувати"), ReplyIntent::BookingCancelled);
        assert_eq!(session.state(), DialogueState::Ready);
        assert_eq!(session, fx.greeted());
        assert!(fx.notifier.seen.lock().is_empty());
    }

    #[test]
    fn lone_destination_asks_for_origin_then_combines() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        assert_eq!(fx.say(&mut session, "до одеси"), ReplyIntent::AskOrigin { destination: "одеса".into() });
        assert_eq!(session.partial_city, Some(PartialCity { city: "одеса".into(), role: Role::Destination }));
        assert_eq!(session.state(), DialogueState::AwaitSecondCity);

        // no route київ → одеса in either order
        assert_eq!(fx.say(&mut session, "з києва"), ReplyIntent::NoRoute { pair: pair("київ", "одеса") });
        assert_eq!(session.state(), DialogueState::Ready);
    }

    #[test]
    fn lone_city_without_preposition_is_taken_as_origin() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        assert_eq!(fx.say(&mut session, "Житомир"), ReplyIntent::AskDestination { origin: "житомир".into() });
        assert_eq!(fx.say(&mut session, "житомир"), ReplyIntent::AskDestination { origin: "житомир".into() });
        assert_eq!(fx.say(&mut session, "львів"), ReplyIntent::Confirm { pair: pair("житомир", "львів") });
    }

    #[test]
    fn unknown_roles_fall_back_to_the_served_direction() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        fx.say(&mut session, "харків");
        assert_eq!(fx.say(&mut session, "полтава"), ReplyIntent::Confirm { pair: pair("полтава", "харків") });
    }

    #[test]
    fn explicit_roles_are_not_silently_reversed() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        assert_eq!(fx.say(&mut session, "з харкова до полтави"), ReplyIntent::NoRoute { pair: pair("харків", "полтава") });
        assert_eq!(session.state(), DialogueState::Ready);
    }

    #[test]
    fn no_route_in_either_order_returns_to_ready() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        assert_eq!(fx.say(&mut session, "одеса суми"), ReplyIntent::NoRoute { pair: pair("одеса", "суми") });
        assert_eq!(session.state(), DialogueState::Ready);
    }

    #[test]
    fn three_cities_ask_to_narrow_down() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        let reply = fx.say(&mut session, "київ житомир львів");
        assert_eq!(reply, ReplyIntent::TooManyCities { cities: vec!["київ".into(), "житомир".into(), "львів".into()] });
        assert_eq!(session.state(), DialogueState::Ready);
    }

    #[test]
    fn reverse_swaps_only_when_served() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        fx.say(&mut session, "з києва до львова");
        assert_eq!(fx.say(&mut session, "навпаки"), ReplyIntent::Confirm { pair: pair("львів", "київ") });

        let mut session = fx.greeted();
        fx.say(&mut session, "з полтави до харкова");
        assert_eq!(fx.say(&mut session, "навпаки"), ReplyIntent::ReverseUnavailable { pair: pair("полтава", "харків") });
        assert_eq!(session.pending_confirmation, Some(pair("полтава", "харків")));
    }

    #[test]
    fn negation_clears_and_other_input_reasks() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        fx.say(&mut session, "з києва до львова");
        assert_eq!(fx.say(&mut session, "а скільки це?"), ReplyIntent::Confirm { pair: pair("київ", "львів") });
        assert_eq!(session.state(), DialogueState::AwaitConfirm);
        assert_eq!(fx.say(&mut session, "ні"), ReplyIntent::AskRestate);
        assert_eq!(session.state(), DialogueState::Ready);
    }

    #[test]
    fn small_talk_is_answered_from_the_table() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        let reply = fx.say(&mut session, "Який у вас телефон?");
        assert!(matches!(reply, ReplyIntent::Answer { rule: "contacts", .. }), "{reply:?}");
        assert_eq!(fx.say(&mut session, "ммм"), ReplyIntent::Delegate);
        assert_eq!(session.state(), DialogueState::Ready);
    }

    #[test]
    fn sentences_with_a_negation_are_delegated() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        assert_eq!(fx.say(&mut session, "чому автобус не приїхав"), ReplyIntent::Delegate);
        assert_eq!(fx.say(&mut session, "я не знаю"), ReplyIntent::Delegate);
        assert_eq!(fx.say(&mut session, "так"), ReplyIntent::AskRestate);
        assert_eq!(fx.say(&mut session, "ні, навпаки"), ReplyIntent::AskRestate);
        assert_eq!(session.state(), DialogueState::Ready);
    }

    #[test]
    fn second_city_with_the_same_role_replaces_the_first() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        fx.say(&mut session, "до одеси");
        assert_eq!(fx.say(&mut session, "до києва"), ReplyIntent::AskOrigin { destination: "київ".into() });
        assert_eq!(session.partial_city, Some(PartialCity { city: "київ".into(), role: Role::Destination }));
        assert_eq!(fx.say(&mut session, "зі львова"), ReplyIntent::Confirm { pair: pair("львів", "київ") });

        let mut session = fx.greeted();
        fx.say(&mut session, "з харкова");
        assert_eq!(fx.say(&mut session, "з полтави"), ReplyIntent::AskDestination { origin: "полтава".into() });
        assert_eq!(fx.say(&mut session, "харків"), ReplyIntent::Confirm { pair: pair("полтава", "харків") });
    }

    #[test]
    fn hyphenated_pair_is_two_cities() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        assert_eq!(fx.say(&mut session, "Київ-Львів"), ReplyIntent::Confirm { pair: pair("київ", "львів") });
    }

    #[test]
    fn names_in_the_message_are_not_taken_for_cities() {
        let fx = Fixture::new(true);
        let mut session = fx.greeted();
        let reply = fx.say(&mut session, "Мене звати Микола, з києва до львова");
        assert_eq!(reply, ReplyIntent::Confirm { pair: pair("київ", "львів") });
    }

    proptest! {
        #[test]
        fn double_reversal_restores_the_pending_pair(forward in any::<bool>()) {
            let fx = Fixture::new(true);
            let mut session = fx.greeted();
            let text = if forward { "з києва до львова" } else { "зі львова до києва" };
            fx.say(&mut session, text);
            let original = session.pending_confirmation.clone();
            prop_assert!(original.is_some());

            fx.say(&mut session, "навпаки");
            prop_assert_ne!(&session.pending_confirmation, &original);
            fx.say(&mut session, "навпаки");
            prop_assert_eq!(session.pending_confirmation, original);
        }
    }
}
