#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

#[macro_export]
macro_rules! intent {
    (
        name: $name:expr
        $(, required_phrases: [ $($req_phrase:expr),* $(,)? ])?
        $(, optional_phrases: [ $($opt_phrase:expr),* $(,)? ])?
        $(, priority: $priority:expr)?
        , answer: |$opts:ident : &$opts_ty:ty| -> String $body:block
        $(,)?
    ) => {{
        $crate::IntentRule {
            name: $name,
            required_phrases: &[ $($($req_phrase),*)? ],
            optional_phrases: &[ $($($opt_phrase),*)? ],
            priority: { 0 $(+ $priority)? },
            answer: Box::new(move |$opts: &$opts_ty| -> String { $body }),
        }
    }};
}
