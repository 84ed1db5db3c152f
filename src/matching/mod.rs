//! Defines structures for matches found in a password, and the
//! [`PatternMatcher`] trait pluggable matchers implement.

use crate::config::Configuration;
use crate::error::EstimateError;

pub mod date;
pub mod dictionary;
pub mod repeat;
pub mod sequence;
pub mod spatial;
pub mod year;

/// A contiguous substring of the password recognized by some matcher (or,
/// for [`MatchKind::BruteForce`], a single character the core had to fall
/// back on), together with an entropy estimate in bits.
///
/// `start`/`end` are indices into the password's `Vec<char>`, inclusive on
/// both ends, per the source system's `[i, j]` convention.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub token: String,
    entropy_bits: f64,
    pub kind: MatchKind,
}

/// Per-kind payload. The common attributes (coordinates, token, entropy)
/// live on [`Match`] itself; anything specific to a pattern kind -- used
/// only for human-readable detail, never by the decomposition core -- goes
/// here.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchKind {
    Dictionary(dictionary::DictionaryDetails),
    Repeat(repeat::RepeatDetails),
    Sequence(sequence::SequenceDetails),
    Spatial(spatial::SpatialDetails),
    Date(date::DateDetails),
    Year,
    /// A degenerate single-character match covering a position no
    /// configured matcher claimed.
    BruteForce,
}

impl Match {
    pub fn new(start: usize, end: usize, token: String, entropy_bits: f64, kind: MatchKind) -> Self {
        debug_assert!(end >= start);
        debug_assert_eq!(token.chars().count(), end - start + 1);
        Match {
            start,
            end,
            token,
            entropy_bits,
            kind,
        }
    }

    /// `end - start + 1`, and `len(token)`.
    pub fn length(&self) -> usize {
        self.end - self.start + 1
    }

    /// The entropy estimate in bits. Matchers compute this eagerly at
    /// construction time, so this accessor is already the "memoized"
    /// value the source system's `calculateEntropy()` describes.
    pub fn entropy_bits(&self) -> f64 {
        self.entropy_bits
    }

    pub fn is_brute_force(&self) -> bool {
        matches!(self.kind, MatchKind::BruteForce)
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            MatchKind::Dictionary(_) => "dictionary",
            MatchKind::Repeat(_) => "repeat",
            MatchKind::Sequence(_) => "sequence",
            MatchKind::Spatial(_) => "spatial",
            MatchKind::Date(_) => "date",
            MatchKind::Year => "year",
            MatchKind::BruteForce => "bruteforce",
        }
    }
}

/// A pluggable source of candidate [`Match`]es.
///
/// Implementations must be deterministic for a given (configuration,
/// password) and must not mutate the configuration. They may return any
/// number of matches in any order, including overlapping or redundant
/// ones -- the core's Pruner and search stages are responsible for making
/// sense of that.
pub trait PatternMatcher: Send + Sync {
    /// Short, stable identifier for the matcher (used for diagnostics
    /// only; it does not have to agree with any [`MatchKind`] variant
    /// name).
    fn name(&self) -> &'static str;

    /// Find every candidate match this matcher recognizes in `password`.
    fn find_matches(
        &self,
        password: &[char],
        configuration: &Configuration,
    ) -> Result<Vec<Match>, EstimateError>;
}
