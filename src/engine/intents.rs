//! Small-talk and FAQ intent table.
//!
//! The table is the *static* side of intent answering: built once from the
//! full rule list and then only read. Building it fixes the evaluation order
//! for good, so a message matching several intents always gets the same
//! answer.
//!
//! ## Invariants
//!
//! - `order` holds indices into `rules`, sorted by descending priority. The
//!   sort is stable, so equal priorities keep table order.
//! - A rule without required *and* optional phrases would match every message;
//!   such rules are dropped at build time.

use crate::engine::TriggerInfo;
use crate::rules::intents::predicates::{all_present, any_present};
use crate::{IntentRule, Options};

#[derive(Debug)]
pub struct IntentTable<'a> {
    rules: &'a [IntentRule],
    order: Vec<usize>,
}

impl<'a> IntentTable<'a> {
    pub fn new(rules: &'a [IntentRule]) -> Self {
        let mut order: Vec<usize> = rules
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                let usable = !(r.required_phrases.is_empty() && r.optional_phrases.is_empty());
                if !usable {
                    tracing::warn!(intent = r.name, "intent rule has no trigger phrases, ignored");
                }
                usable
            })
            .map(|(id, _)| id)
            .collect();
        order.sort_by_key(|&id| std::cmp::Reverse(rules[id].priority));

        IntentTable { rules, order }
    }

    /// The best matching rule, if any.
    pub fn find(&self, trigger: &TriggerInfo) -> Option<&'a IntentRule> {
        self.order
            .iter()
            .map(|&id| &self.rules[id])
            .find(|r| all_present(trigger, r.required_phrases) && any_present(trigger, r.optional_phrases))
    }

    /// Name and rendered answer of the best matching rule.
    pub fn answer(&self, trigger: &TriggerInfo, options: &Options) -> Option<(&'static str, String)> {
        self.find(trigger).map(|rule| (rule.name, (rule.answer)(options)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}
