use regex::Regex;

use super::{Match, MatchKind, PatternMatcher};
use crate::config::Configuration;
use crate::error::EstimateError;
use crate::matching::date::REFERENCE_YEAR;
use crate::util::guesses_to_bits;

const MIN_YEAR_SPACE: i32 = 20;

lazy_static! {
    static ref YEAR_RE: Regex = Regex::new(r"(19\d{2}|20\d{2})").expect("valid year regex");
}

/// Matches bare 4-digit years (`1991`, `2024`), the standalone version of
/// zxcvbn's `"recent_year"` regex branch.
pub struct YearMatcher;

impl PatternMatcher for YearMatcher {
    fn name(&self) -> &'static str {
        "year"
    }

    fn find_matches(
        &self,
        password: &[char],
        _configuration: &Configuration,
    ) -> Result<Vec<Match>, EstimateError> {
        let text: String = password.iter().collect();
        let mut matches = Vec::new();
        for m in YEAR_RE.find_iter(&text) {
            let year: i32 = m.as_str().parse().expect("regex only matches digits");
            let start = text[..m.start()].chars().count();
            let end = start + m.as_str().chars().count() - 1;
            let token: String = password[start..=end].iter().collect();
            let entropy_bits = year_entropy_bits(year);
            matches.push(Match::new(start, end, token, entropy_bits, MatchKind::Year));
        }
        Ok(matches)
    }
}

fn year_entropy_bits(year: i32) -> f64 {
    let year_space = (year - REFERENCE_YEAR).abs().max(MIN_YEAR_SPACE);
    guesses_to_bits(year_space as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    #[test]
    fn finds_bare_year() {
        let password: Vec<char> = "summer1991".chars().collect();
        let matcher = YearMatcher;
        let config = Configuration::default();
        let matches = matcher.find_matches(&password, &config).unwrap();
        assert!(matches.iter().any(|m| m.start == 6 && m.end == 9));
    }
}
