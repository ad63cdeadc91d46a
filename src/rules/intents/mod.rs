pub(crate) mod predicates;
pub(crate) mod rules;
