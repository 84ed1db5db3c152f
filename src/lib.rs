//! A pluggable-matcher password decomposition core.
//!
//! Given a password and a [`Configuration`] of [`matching::PatternMatcher`]s,
//! [`Estimator::estimate`] covers the password with a list of non-overlapping
//! [`matching::Match`]es -- recognized patterns where a matcher found one,
//! single-character brute-force matches everywhere else -- chosen so the
//! cover's total entropy is as small as possible while still attributing as
//! much of the password as it can to recognized patterns.
//!
//! The core itself does not know how to recognize a dictionary word, a
//! keyboard walk, or a date: those live behind the [`matching::PatternMatcher`]
//! trait. What this crate provides is the part that is hard to get right --
//! normalizing overlapping candidates, deciding cheaply whether a password
//! is essentially random, and searching the combinatorial space of
//! non-intersecting match chains for the best cover.
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;

pub mod adjacency_graphs;
pub mod config;
pub mod error;
mod frequency_lists;
pub mod matching;
mod scoring;
mod util;

pub use config::Configuration;
#[cfg(feature = "builder")]
pub use config::ConfigurationBuilder;
pub use error::EstimateError;
pub use matching::{Match, MatchKind, PatternMatcher};

/// The outcome of decomposing one password.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct EstimateResult {
    /// The input password, verbatim.
    pub password: String,
    /// The chosen cover, sorted by `start` ascending.
    pub matches: Vec<Match>,
    /// `sum(m.entropy_bits() for m in matches)`.
    pub total_entropy_bits: f64,
}

/// A stateless (across calls) holder of a [`Configuration`] that knows how
/// to decompose passwords.
///
/// The only mutable state is the configuration handle itself, swappable via
/// [`Estimator::set_configuration`]; each [`Estimator::estimate`] call
/// snapshots it at the start and runs to completion without observing a
/// concurrent swap.
pub struct Estimator {
    configuration: Configuration,
}

impl Estimator {
    /// Builds an estimator around the given configuration.
    pub fn new(configuration: Configuration) -> Self {
        Estimator { configuration }
    }

    /// Returns the current configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Replaces the current configuration.
    pub fn set_configuration(&mut self, configuration: Configuration) {
        self.configuration = configuration;
    }

    /// Decomposes `password` into a minimal-entropy, non-overlapping cover.
    ///
    /// Normal conditions (an empty password, a password with no matcher
    /// hits, a password classified as random) never produce an error -- they
    /// simply produce an all-brute-force or partially-brute-force cover.
    /// Only a fatal matcher error ([`EstimateError::MatcherFailure`]) or a
    /// reconstruction failure ([`EstimateError::InvariantViolation`],
    /// which indicates a bug) can fail the call.
    pub fn estimate(&self, password: &str) -> Result<EstimateResult, EstimateError> {
        let chars: Vec<char> = password.chars().collect();
        let (matches, total_entropy_bits) = scoring::decompose(&self.configuration, &chars)?;
        Ok(EstimateResult {
            password: password.to_string(),
            matches,
            total_entropy_bits,
        })
    }

    /// Converts a guess count to a bit count (`log2(guesses)`), saturating
    /// at the largest finite `f64` rather than returning a non-finite
    /// value.
    pub fn entropy_from_guesses(guesses: f64) -> f64 {
        util::guesses_to_bits(guesses)
    }

    /// Converts a bit count back to a guess count (`2^entropy_bits`),
    /// saturating at the largest finite `f64` and rounding half-up to the
    /// nearest integer.
    pub fn guesses_from_entropy(entropy_bits: f64) -> f64 {
        let guesses = 2f64.powf(entropy_bits);
        let guesses = if guesses.is_finite() { guesses } else { f64::MAX };
        guesses.round()
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Estimator::new(Configuration::default())
    }
}
