use crate::{IntentRule, Options};

// Answers stay short: the goal of every reply is to steer back to a route.

/// Greetings that arrive after the first message of a session.
fn rule_greeting() -> IntentRule {
    intent! {
        name: "greeting",
        optional_phrases: [
            "привіт", "привет", "вітаю", "добрий день", "добрый день", "доброго дня", "здравствуйте",
            "добрий вечір", "hello", "hi",
        ],
        priority: 10,
        answer: |_opts: &Options| -> String {
            "Вітаю! Напишіть, будь ласка, з якого міста і куди ви хочете їхати.".to_string()
        },
    }
}

fn rule_thanks() -> IntentRule {
    intent! {
        name: "thanks",
        optional_phrases: ["дякую", "дякуємо", "спасибі", "спасибо", "thanks", "thank you"],
        priority: 5,
        answer: |_opts: &Options| -> String {
            "Будь ласка! Гарної поїздки.".to_string()
        },
    }
}

/// "How do I reach a human?"
fn rule_contacts() -> IntentRule {
    intent! {
        name: "contacts",
        optional_phrases: ["телефон*", "контакт*", "зателефон*", "подзвон*", "позвон*", "диспетчер*", "оператор*"],
        priority: 20,
        answer: |opts: &Options| -> String {
            format!("Телефон диспетчера {}: {}", opts.dispatcher_name, opts.dispatcher_phone)
        },
    }
}

fn rule_price() -> IntentRule {
    intent! {
        name: "price",
        optional_phrases: ["цін*", "вартіст*", "скільки коштує", "цен*", "стоимост*", "сколько стоит"],
        priority: 15,
        answer: |_opts: &Options| -> String {
            "Вартість залежить від маршруту. Напишіть, з якого міста і куди ви їдете, і я підкажу ціну.".to_string()
        },
    }
}

fn rule_schedule() -> IntentRule {
    intent! {
        name: "schedule",
        optional_phrases: ["розклад*", "расписан*", "коли відправ*", "о котрій", "во сколько"],
        priority: 15,
        answer: |_opts: &Options| -> String {
            "Напишіть, з якого міста і куди ви їдете, і я покажу час відправлення та прибуття.".to_string()
        },
    }
}

fn rule_baggage() -> IntentRule {
    intent! {
        name: "baggage",
        optional_phrases: ["багаж*", "валіз*", "чемодан*", "посилк*", "посылк*"],
        priority: 15,
        answer: |opts: &Options| -> String {
            format!("Умови перевезення багажу та посилок уточнюйте у диспетчера: {}", opts.dispatcher_phone)
        },
    }
}

fn rule_children() -> IntentRule {
    intent! {
        name: "children",
        optional_phrases: ["дит*", "дет*", "ребен*", "немовл*"],
        priority: 12,
        answer: |opts: &Options| -> String {
            format!("Дитячі місця та знижки уточнюйте у диспетчера: {}", opts.dispatcher_phone)
        },
    }
}

/// "How do I book?" requires both a question word and a booking verb.
fn rule_booking_howto() -> IntentRule {
    intent! {
        name: "booking how-to",
        required_phrases: ["як*"],
        optional_phrases: ["заброн*", "бронюв*", "купит*", "квит*", "билет*"],
        priority: 25,
        answer: |_opts: &Options| -> String {
            "Напишіть маршрут (наприклад: з Києва до Львова), підтвердіть його, а потім надішліть ім'я та номер телефону."
                .to_string()
        },
    }
}

pub fn get() -> Vec<IntentRule> {
    vec![
        rule_booking_howto(),
        rule_contacts(),
        rule_price(),
        rule_schedule(),
        rule_baggage(),
        rule_children(),
        rule_greeting(),
        rule_thanks(),
    ]
}
