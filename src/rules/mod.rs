pub(crate) mod aliases;
pub(crate) mod cities;
pub(crate) mod intents;
pub(crate) mod lexicon;
