//! Reply intents and their rendering.
//!
//! The dialogue never builds user-facing text. It returns a [`ReplyIntent`]
//! describing *what* to say; [`Renderer`] turns that into the wire
//! [`Response`] (Ukrainian text, optional `confirm` pair, `html` flag).

use serde::Serialize;

use crate::api::{ConfirmPair, Options, Response};
use crate::engine::{Gazetteer, Price, Segment, route_graph::booking_link};
use crate::CityPair;

const ROUTE_PROMPT: &str = "Напишіть, будь ласка, з якого міста і куди ви хочете їхати.";
const CONTACT_EXAMPLE: &str = "Олег +380501234567";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum ReplyIntent {
    Greeting,
    /// "Did you mean A → B?"
    Confirm { pair: CityPair },
    /// The user asked to reverse a pair whose reverse is not served.
    ReverseUnavailable { pair: CityPair },
    AskOrigin { destination: String },
    AskDestination { origin: String },
    TooManyCities { cities: Vec<String> },
    AskRestate,
    NoRoute { pair: CityPair },
    /// First segment is the offer; the rest are alternatives.
    Itinerary { pair: CityPair, segments: Vec<Segment> },
    ContactFormat,
    BookingAccepted { name: String, pair: CityPair },
    BookingFailed,
    BookingCancelled,
    Answer { rule: &'static str, text: String },
    /// Nothing applied; the fallback collaborator should answer.
    Delegate,
    Fallback { text: String },
}

impl ReplyIntent {
    pub fn name(&self) -> &'static str {
        match self {
            ReplyIntent::Greeting => "greeting",
            ReplyIntent::Confirm { .. } => "confirm",
            ReplyIntent::ReverseUnavailable { .. } => "reverse_unavailable",
            ReplyIntent::AskOrigin { .. } => "ask_origin",
            ReplyIntent::AskDestination { .. } => "ask_destination",
            ReplyIntent::TooManyCities { .. } => "too_many_cities",
            ReplyIntent::AskRestate => "ask_restate",
            ReplyIntent::NoRoute { .. } => "no_route",
            ReplyIntent::Itinerary { .. } => "itinerary",
            ReplyIntent::ContactFormat => "contact_format",
            ReplyIntent::BookingAccepted { .. } => "booking_accepted",
            ReplyIntent::BookingFailed => "booking_failed",
            ReplyIntent::BookingCancelled => "booking_cancelled",
            ReplyIntent::Answer { .. } => "answer",
            ReplyIntent::Delegate => "delegate",
            ReplyIntent::Fallback { .. } => "fallback",
        }
    }

    /// The city pair this reply is about, if any.
    pub fn pair(&self) -> Option<&CityPair> {
        match self {
            ReplyIntent::Confirm { pair }
            | ReplyIntent::ReverseUnavailable { pair }
            | ReplyIntent::NoRoute { pair }
            | ReplyIntent::Itinerary { pair, .. }
            | ReplyIntent::BookingAccepted { pair, .. } => Some(pair),
            _ => None,
        }
    }
}

pub(crate) struct Renderer<'a> {
    pub gazetteer: &'a Gazetteer,
    pub options: &'a Options,
}

impl Renderer<'_> {
    pub fn render(&self, intent: &ReplyIntent) -> Response {
        match intent {
            ReplyIntent::Greeting => Response::text(format!(
                "Вітаю! Я диспетчер {}. {ROUTE_PROMPT}",
                self.options.dispatcher_name
            )),
            ReplyIntent::Confirm { pair } => Response::text(format!(
                "Ви маєте на увазі з {} до {}?",
                self.city(&pair.origin),
                self.city(&pair.destination)
            ))
            .with_confirm(ConfirmPair::from(pair)),
            ReplyIntent::ReverseUnavailable { pair } => Response::text(format!(
                "На жаль, з {} до {} маршруту немає. Ви маєте на увазі з {} до {}?",
                self.city(&pair.destination),
                self.city(&pair.origin),
                self.city(&pair.origin),
                self.city(&pair.destination)
            ))
            .with_confirm(ConfirmPair::from(pair)),
            ReplyIntent::AskOrigin { destination } => {
                Response::text(format!("З якого міста ви хочете їхати до {}?", self.city(destination)))
            }
            ReplyIntent::AskDestination { origin } => {
                Response::text(format!("Куди ви хочете їхати з {}?", self.city(origin)))
            }
            ReplyIntent::TooManyCities { cities } => {
                let names: Vec<String> = cities.iter().map(|c| self.city(c)).collect();
                Response::text(format!(
                    "Я знайшов кілька міст: {}. Напишіть, будь ласка, лише місто відправлення і місто прибуття.",
                    names.join(", ")
                ))
            }
            ReplyIntent::AskRestate => Response::text(format!("Добре. {ROUTE_PROMPT}")),
            ReplyIntent::NoRoute { .. } => {
                Response::text("На жаль, маршрут з цих міст не знайдено. Уточніть, будь ласка, ще раз.")
            }
            ReplyIntent::Itinerary { pair, segments } => self.itinerary(pair, segments),
            ReplyIntent::ContactFormat => Response::text(format!(
                "Щоб забронювати місце, напишіть ім'я та номер телефону, наприклад: {CONTACT_EXAMPLE}"
            )),
            ReplyIntent::BookingAccepted { name, pair } => Response::text(format!(
                "Дякуємо, {name}! Заявку на поїздку з {} до {} прийнято. Диспетчер зателефонує вам найближчим часом.",
                self.city(&pair.origin),
                self.city(&pair.destination)
            )),
            ReplyIntent::BookingFailed => Response::text(format!(
                "Не вдалося передати заявку. Спробуйте, будь ласка, пізніше або зателефонуйте: {}",
                self.options.dispatcher_phone
            )),
            ReplyIntent::BookingCancelled => {
                Response::text("Бронювання скасовано. Якщо потрібно, напишіть новий маршрут.")
            }
            ReplyIntent::Answer { text, .. } | ReplyIntent::Fallback { text } => Response::text(text.clone()),
            ReplyIntent::Delegate => Response::text(ROUTE_PROMPT),
        }
    }

    fn itinerary(&self, pair: &CityPair, segments: &[Segment]) -> Response {
        let Some(offer) = segments.first() else {
            return self.render(&ReplyIntent::NoRoute { pair: pair.clone() });
        };
        let link = booking_link(&self.options.booking_base_url, &offer.route_start, &offer.route_end);

        let mut out = String::new();
        out.push_str(&format!(
            "🚌 <b>Маршрут:</b> {} → {}\n",
            escape_html(&self.city(&offer.origin)),
            escape_html(&self.city(&offer.destination))
        ));
        out.push_str(&format!("💰 <b>Ціна:</b> {}\n", escape_html(&price_text(&offer.price))));
        out.push_str(&format!(
            "⏳ <b>Тривалість:</b> {}\n",
            escape_html(offer.duration.as_deref().unwrap_or("—"))
        ));
        if let Some(departure) = &offer.departure {
            out.push_str(&format!("⏰ <b>Відправлення:</b> {}", escape_html(departure)));
            if let Some(address) = &offer.origin_address {
                out.push_str(&format!(" ({})", escape_html(address)));
            }
            out.push('\n');
        }
        if let Some(arrival) = &offer.arrival {
            out.push_str(&format!("🕓 <b>Прибуття:</b> {}\n", escape_html(arrival)));
        }
        if !offer.via.is_empty() {
            let via: Vec<String> = offer.via.iter().map(|c| escape_html(&self.city(c))).collect();
            out.push_str(&format!("🗺️ <b>Зупинки по дорозі:</b> {}\n", via.join(" → ")));
        }
        out.push_str(&format!("🔗 <a href='{link}'>Переглянути маршрут</a>\n📝 <a href='{link}'>Забронювати місце</a>"));

        let alternatives: Vec<&Segment> = segments.iter().skip(1).take(self.options.max_alternatives).collect();
        if !alternatives.is_empty() {
            out.push_str("\n\n<b>Інші рейси:</b>");
            for alt in alternatives {
                out.push_str(&format!(
                    "\n• {} → {}",
                    escape_html(&self.city(&alt.route_start)),
                    escape_html(&self.city(&alt.route_end))
                ));
                if let Some(departure) = &alt.departure {
                    out.push_str(&format!(", відправлення {}", escape_html(departure)));
                }
                out.push_str(&format!(", {}", escape_html(&price_text(&alt.price))));
            }
        }

        out.push_str(&format!(
            "\n\nЩоб забронювати місце, напишіть ім'я та номер телефону (наприклад: {CONTACT_EXAMPLE})."
        ));
        Response::html(out)
    }

    /// Display spelling with the first letter capitalized.
    fn city(&self, name: &str) -> String {
        capitalize(self.gazetteer.display(name))
    }
}

fn price_text(price: &Price) -> String {
    match price {
        Price::Amount(amount) => format!("{amount} грн"),
        Price::Quoted(text) => text.clone(),
        Price::Unspecified => "Уточнюйте".to_string(),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('\'', "&#39;")
}
