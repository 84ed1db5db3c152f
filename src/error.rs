use thiserror::Error;

/// Errors the decomposition core can surface.
///
/// Every other condition (empty candidate pool, empty password, an
/// all-random password) is normal and is represented in the result, not
/// as an error.
#[derive(Debug, Error)]
pub enum EstimateError {
    /// A [`crate::matching::PatternMatcher`] signaled an unrecoverable error.
    /// Propagated unchanged to the caller.
    #[error("pattern matcher failed: {0}")]
    MatcherFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The assembled match list does not reconstruct the input password.
    /// Indicates a bug in the core or in a pattern matcher; never expected
    /// to occur in correct operation.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
