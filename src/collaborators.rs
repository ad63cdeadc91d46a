//! Interfaces to the outside world the dispatcher calls into.
//!
//! Both traits are implemented for plain closures, so tests and small
//! embeddings can pass `|req| { ...; true }` without a named type.

use serde::Serialize;

/// Everything the booking side needs to call the passenger back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRequest {
    pub name: String,
    /// `+` and digits only.
    pub phone: String,
    pub origin: String,
    pub destination: String,
    pub route_label: String,
}

/// Receives confirmed bookings (email, messenger, database, ...).
pub trait BookingNotifier: Send + Sync {
    /// `true` when the booking was accepted for delivery.
    fn submit_booking(&self, request: &BookingRequest) -> bool;
}

impl<F> BookingNotifier for F
where
    F: Fn(&BookingRequest) -> bool + Send + Sync,
{
    fn submit_booking(&self, request: &BookingRequest) -> bool {
        self(request)
    }
}

/// Answers messages the dispatcher could not handle itself.
pub trait Fallback: Send + Sync {
    fn answer(&self, raw_text: &str) -> String;
}

impl<F> Fallback for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn answer(&self, raw_text: &str) -> String {
        self(raw_text)
    }
}

/// Default notifier: logs the booking and accepts it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl BookingNotifier for LogNotifier {
    fn submit_booking(&self, request: &BookingRequest) -> bool {
        tracing::info!(
            name = %request.name,
            phone = %request.phone,
            origin = %request.origin,
            destination = %request.destination,
            route = %request.route_label,
            "booking received"
        );
        true
    }
}

/// Default fallback: steer the user back to naming a route.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptFallback;

impl Fallback for PromptFallback {
    fn answer(&self, _raw_text: &str) -> String {
        "Я допомагаю з автобусними маршрутами. Напишіть, будь ласка, з якого міста і куди ви хочете їхати.".to_string()
    }
}
