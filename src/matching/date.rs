use fancy_regex::Regex;

use super::{Match, MatchKind, PatternMatcher};
use crate::config::Configuration;
use crate::error::EstimateError;
use crate::util::guesses_to_bits;

pub const REFERENCE_YEAR: i32 = 2000;
const MIN_YEAR_SPACE: i32 = 20;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct DateDetails {
    pub year: i32,
    pub separator: Option<char>,
}

lazy_static! {
    static ref DATE_RE: Regex =
        Regex::new(r"\b(\d{1,2})([./-])(\d{1,2})\2(\d{2,4})\b").expect("valid date regex");
}

/// Matches `MM/DD/YYYY`-family dates, following zxcvbn's date estimate
/// (year distance from a reference year times days in a year, times a
/// separator-choice factor).
pub struct DateMatcher;

impl PatternMatcher for DateMatcher {
    fn name(&self) -> &'static str {
        "date"
    }

    fn find_matches(
        &self,
        password: &[char],
        _configuration: &Configuration,
    ) -> Result<Vec<Match>, EstimateError> {
        let text: String = password.iter().collect();
        let mut matches = Vec::new();
        for caps in DATE_RE.captures_iter(&text) {
            let caps = caps.map_err(|e| EstimateError::MatcherFailure(Box::new(e)))?;
            let whole = caps.get(0).expect("group 0 always matches");
            let separator = caps[2].chars().next();
            let year_text = &caps[4];
            let year: i32 = match year_text.parse() {
                Ok(y) if year_text.len() == 4 => y,
                Ok(y) => {
                    if y < 50 {
                        2000 + y
                    } else {
                        1900 + y
                    }
                }
                Err(_) => continue,
            };

            let start = text[..whole.start()].chars().count();
            let end = start + whole.as_str().chars().count() - 1;
            let token: String = password[start..=end].iter().collect();
            let entropy_bits = date_entropy_bits(year, separator);
            matches.push(Match::new(
                start,
                end,
                token,
                entropy_bits,
                MatchKind::Date(DateDetails { year, separator }),
            ));
        }
        Ok(matches)
    }
}

fn date_entropy_bits(year: i32, separator: Option<char>) -> f64 {
    let year_space = (year - REFERENCE_YEAR).abs().max(MIN_YEAR_SPACE);
    let mut guesses = year_space as f64 * 365.0;
    if separator.is_some() {
        guesses *= 4.0;
    }
    guesses_to_bits(guesses)
}
