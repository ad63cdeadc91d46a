//! Per-conversation state and the store that owns it.
//!
//! [`Session`] is plain data; the dialogue derives its [`DialogueState`] from
//! which fields are set, so there is no separate state tag to keep in sync.
//!
//! [`SessionStore`] maps session ids to slots:
//!
//! ```text
//! DashMap<id, Arc<Mutex<Slot>>>
//!          │         └─ per-session lock, held for one whole turn
//!          └─ sharded map lock, held only to clone the Arc
//! ```
//!
//! Turns for different ids never wait on each other (beyond a shard lookup);
//! turns for the same id are serialized by the slot mutex. Eviction removes
//! slots idle longer than the configured timeout, skipping any slot a turn
//! currently holds.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;

use crate::{CityPair, Role};

/// Where a session is in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DialogueState {
    New,
    Ready,
    AwaitSecondCity,
    AwaitConfirm,
    AwaitContact,
}

impl std::fmt::Display for DialogueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DialogueState::New => "NEW",
            DialogueState::Ready => "READY",
            DialogueState::AwaitSecondCity => "AWAIT_SECOND_CITY",
            DialogueState::AwaitConfirm => "AWAIT_CONFIRM",
            DialogueState::AwaitContact => "AWAIT_CONTACT",
        })
    }
}

/// One city waiting for its counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialCity {
    pub city: String,
    pub role: Role,
}

/// A confirmed trip waiting for the passenger's contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    pub pair: CityPair,
    pub route_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub greeted: bool,
    pub pending_confirmation: Option<CityPair>,
    pub partial_city: Option<PartialCity>,
    pub booking: Option<Booking>,
}

impl Session {
    pub fn state(&self) -> DialogueState {
        if !self.greeted {
            DialogueState::New
        } else if self.booking.is_some() {
            DialogueState::AwaitContact
        } else if self.pending_confirmation.is_some() {
            DialogueState::AwaitConfirm
        } else if self.partial_city.is_some() {
            DialogueState::AwaitSecondCity
        } else {
            DialogueState::Ready
        }
    }

    /// Drop every in-flight question, keeping the greeting.
    pub fn reset(&mut self) {
        *self = Session { greeted: self.greeted, ..Session::default() };
    }
}

#[derive(Debug)]
struct Slot {
    session: Session,
    last_seen: Instant,
}

#[derive(Debug)]
pub struct SessionStore {
    slots: DashMap<String, Arc<Mutex<Slot>>>,
    idle: Duration,
}

impl SessionStore {
    pub fn new(idle: Duration) -> Self {
        Self { slots: DashMap::new(), idle }
    }

    /// Run `f` with exclusive access to the session `id`, creating it if needed.
    pub fn with_session<R>(&self, id: &str, now: Instant, f: impl FnOnce(&mut Session) -> R) -> R {
        // Clone the Arc and release the shard guard before locking the slot.
        let slot = self
            .slots
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Slot { session: Session::default(), last_seen: now })))
            .clone();

        let mut slot = slot.lock();
        slot.last_seen = now;
        f(&mut slot.session)
    }

    /// A copy of the session `id`, if it exists.
    pub fn snapshot(&self, id: &str) -> Option<Session> {
        let slot = self.slots.get(id).map(|s| Arc::clone(s.value()))?;
        let session = slot.lock().session.clone();
        Some(session)
    }

    /// Remove sessions idle since before `now - idle`. Returns how many went.
    pub fn evict_idle_at(&self, now: Instant) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| {
            // Someone outside the map holds it: a turn is in flight.
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            slot.try_lock().is_none_or(|s| now.saturating_duration_since(s.last_seen) < self.idle)
        });
        let evicted = before.saturating_sub(self.slots.len());
        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.slots.len(), "idle sessions evicted");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn state_is_derived_from_fields() {
        let mut s = Session::default();
        assert_eq!(s.state(), DialogueState::New);
        s.greeted = true;
        assert_eq!(s.state(), DialogueState::Ready);
        s.partial_city = Some(PartialCity { city: "київ".into(), role: Role::Origin });
        assert_eq!(s.state(), DialogueState::AwaitSecondCity);
        s.pending_confirmation = Some(CityPair::new("київ", "львів"));
        assert_eq!(s.state(), DialogueState::AwaitConfirm);
        s.booking = Some(Booking {
            pair: CityPair::new("київ", "львів"),
            route_label: "київ → львів".into(),
        });
        assert_eq!(s.state(), DialogueState::AwaitContact);

        s.reset();
        assert_eq!(s, Session { greeted: true, ..Session::default() });
    }

    #[test]
    fn sessions_are_created_on_first_use_and_isolated() {
        let store = SessionStore::new(Duration::from_secs(60));
        let now = Instant::now();
        store.with_session("a", now, |s| s.greeted = true);
        assert!(store.snapshot("a").is_some_and(|s| s.greeted));
        assert!(store.with_session("b", now, |s| !s.greeted));
        assert_eq!(store.len(), 2);
        assert!(store.snapshot("missing").is_none());
    }

    #[test]
    fn idle_sessions_are_evicted() {
        let store = SessionStore::new(Duration::from_secs(60));
        let start = Instant::now();
        store.with_session("old", start, |s| s.greeted = true);
        store.with_session("fresh", start + Duration::from_secs(50), |s| s.greeted = true);

        assert_eq!(store.evict_idle_at(start + Duration::from_secs(70)), 1);
        assert!(store.snapshot("old").is_none());
        assert!(store.snapshot("fresh").is_some());
    }

    #[test]
    fn same_session_turns_are_serialized() {
        let store = Arc::new(SessionStore::new(Duration::from_secs(60)));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..100 {
                        store.with_session("shared", Instant::now(), |s| {
                            // read-modify-write that would lose updates without the lock
                            let seen = s.partial_city.as_ref().map_or(0, |p| p.city.len());
                            s.partial_city = Some(PartialCity { city: "x".repeat(seen + 1), role: Role::Unknown });
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let session = store.snapshot("shared").unwrap();
        assert_eq!(session.partial_city.map(|p| p.city.len()), Some(800));
    }
}
