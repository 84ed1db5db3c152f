use super::{Match, MatchKind, PatternMatcher};
use crate::config::Configuration;
use crate::error::EstimateError;
use crate::util::guesses_to_bits;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct SequenceDetails {
    pub ascending: bool,
}

/// Matches runs of consecutive code points moving in a single direction
/// (`abc`, `987`), length 3 or more.
pub struct SequenceMatcher;

impl PatternMatcher for SequenceMatcher {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn find_matches(
        &self,
        password: &[char],
        _configuration: &Configuration,
    ) -> Result<Vec<Match>, EstimateError> {
        let n = password.len();
        let mut matches = Vec::new();
        let mut start = 0;
        while start < n {
            let mut end = start;
            let mut direction = 0i32;
            while end + 1 < n {
                let delta = password[end + 1] as i32 - password[end] as i32;
                if direction == 0 && (delta == 1 || delta == -1) {
                    direction = delta;
                    end += 1;
                } else if delta == direction {
                    end += 1;
                } else {
                    break;
                }
            }
            let length = end - start + 1;
            if length >= 3 {
                let token: String = password[start..=end].iter().collect();
                let ascending = direction == 1;
                let entropy_bits = sequence_entropy_bits(password[start], ascending, length);
                matches.push(Match::new(
                    start,
                    end,
                    token,
                    entropy_bits,
                    MatchKind::Sequence(SequenceDetails { ascending }),
                ));
                start = end + 1;
            } else {
                start += 1;
            }
        }
        Ok(matches)
    }
}

/// zxcvbn-style sequence estimate: lower base guesses for obvious
/// starting points, doubled for descending runs, times length.
fn sequence_entropy_bits(first_char: char, ascending: bool, length: usize) -> f64 {
    let mut base_guesses: f64 = if ['a', 'A', 'z', 'Z', '0', '1', '9'].contains(&first_char) {
        4.0
    } else if first_char.is_ascii_digit() {
        10.0
    } else {
        26.0
    };
    if !ascending {
        base_guesses *= 2.0;
    }
    guesses_to_bits(base_guesses * length as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    #[test]
    fn finds_ascending_run() {
        let password: Vec<char> = "qwerty123".chars().collect();
        let matcher = SequenceMatcher;
        let config = Configuration::default();
        let matches = matcher.find_matches(&password, &config).unwrap();
        assert!(matches.iter().any(|m| m.start == 6 && m.end == 8));
    }

    #[test]
    fn finds_descending_run() {
        let password: Vec<char> = "cba".chars().collect();
        let matcher = SequenceMatcher;
        let config = Configuration::default();
        let matches = matcher.find_matches(&password, &config).unwrap();
        assert!(matches
            .iter()
            .any(|m| matches!(&m.kind, crate::matching::MatchKind::Sequence(d) if !d.ascending)));
    }
}
