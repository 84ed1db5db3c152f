use std::collections::HashMap;

use crate::matching::date::DateMatcher;
use crate::matching::dictionary::DictionaryMatcher;
use crate::matching::repeat::RepeatMatcher;
use crate::matching::sequence::SequenceMatcher;
use crate::matching::spatial::SpatialMatcher;
use crate::matching::year::YearMatcher;
use crate::matching::PatternMatcher;

/// Read-only configuration consulted by an [`crate::Estimator`].
///
/// Only `matchers` is consulted by the decomposition core; `locale` and
/// `guess_type_table` are opaque to it and exist for matchers (and callers
/// building human-readable feedback) to use.
#[cfg_attr(feature = "builder", derive(derive_builder::Builder))]
#[cfg_attr(feature = "builder", builder(pattern = "owned"))]
pub struct Configuration {
    /// Ordered collection of pattern matchers. Order does not affect the
    /// result (the Gatherer treats them as an unordered pool contributor),
    /// but is preserved for deterministic diagnostics.
    #[cfg_attr(feature = "builder", builder(default = "default_matchers()"))]
    pub matchers: Vec<Box<dyn PatternMatcher>>,
    /// Opaque to the core; available to matchers and feedback generators.
    #[cfg_attr(feature = "builder", builder(default = "\"en\".to_string()"))]
    pub locale: String,
    /// Cardinality assumed for the fallback single-character brute-force
    /// match, i.e. the number of equiprobable guesses per position the
    /// core cannot attribute to a recognized pattern. Mirrors zxcvbn's own
    /// `BRUTEFORCE_CARDINALITY` constant.
    #[cfg_attr(feature = "builder", builder(default = "10.0"))]
    pub brute_force_cardinality: f64,
    /// Maps a [`crate::matching::MatchKind`] name (`"dictionary"`,
    /// `"spatial"`, ...) to a human-readable guess-type label. Entirely
    /// opaque to the decomposition core; exists only for callers building
    /// their own feedback strings on top of a `Match`'s `kind_name()`.
    #[cfg_attr(feature = "builder", builder(default = "default_guess_type_table()"))]
    pub guess_type_table: HashMap<String, String>,
}

fn default_matchers() -> Vec<Box<dyn PatternMatcher>> {
    vec![
        Box::new(DictionaryMatcher),
        Box::new(RepeatMatcher),
        Box::new(SequenceMatcher),
        Box::new(SpatialMatcher),
        Box::new(DateMatcher),
        Box::new(YearMatcher),
    ]
}

fn default_guess_type_table() -> HashMap<String, String> {
    [
        ("dictionary", "dictionary word"),
        ("repeat", "repeated characters"),
        ("sequence", "sequential characters"),
        ("spatial", "keyboard pattern"),
        ("date", "date"),
        ("year", "recent year"),
        ("bruteforce", "random characters"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            matchers: default_matchers(),
            locale: "en".to_string(),
            brute_force_cardinality: 10.0,
            guess_type_table: default_guess_type_table(),
        }
    }
}
