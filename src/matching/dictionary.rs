use super::{Match, MatchKind, PatternMatcher};
use crate::config::Configuration;
use crate::error::EstimateError;
use crate::frequency_lists::{COMMON_PASSWORDS, LEET_SUBSTITUTIONS};

/// Details specific to a dictionary hit. Not consulted by the
/// decomposition core, only useful for human-readable output.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct DictionaryDetails {
    pub rank: usize,
    pub dictionary_name: &'static str,
    pub l33t: bool,
}

/// Matches contiguous substrings against an embedded frequency-ranked word
/// list, case-folded, with a small leet-substitution pass.
pub struct DictionaryMatcher;

impl PatternMatcher for DictionaryMatcher {
    fn name(&self) -> &'static str {
        "dictionary"
    }

    fn find_matches(
        &self,
        password: &[char],
        _configuration: &Configuration,
    ) -> Result<Vec<Match>, EstimateError> {
        let n = password.len();
        let lower: Vec<char> = password
            .iter()
            .map(|&c| c.to_lowercase().next().unwrap_or(c))
            .collect();
        let unleeted: Vec<char> = lower
            .iter()
            .map(|&c| *LEET_SUBSTITUTIONS.get(&c).unwrap_or(&c))
            .collect();

        let mut matches = Vec::new();
        for start in 0..n {
            for end in start..n {
                let plain: String = lower[start..=end].iter().collect();
                let leeted: String = unleeted[start..=end].iter().collect();
                let (candidate, l33t) = if COMMON_PASSWORDS.contains_key(plain.as_str()) {
                    (plain, false)
                } else if leeted != lower[start..=end].iter().collect::<String>()
                    && COMMON_PASSWORDS.contains_key(leeted.as_str())
                {
                    (leeted, true)
                } else {
                    continue;
                };
                let rank = COMMON_PASSWORDS[candidate.as_str()];
                let token: String = password[start..=end].iter().collect();
                let entropy_bits = dictionary_entropy_bits(rank, &token, l33t);
                matches.push(Match::new(
                    start,
                    end,
                    token,
                    entropy_bits,
                    MatchKind::Dictionary(DictionaryDetails {
                        rank,
                        dictionary_name: "common_passwords",
                        l33t,
                    }),
                ));
            }
        }
        Ok(matches)
    }
}

fn dictionary_entropy_bits(rank: usize, token: &str, l33t: bool) -> f64 {
    let base = (rank as f64 + 1.0).log2();
    let upper_variations = uppercase_variations(token) as f64;
    let l33t_factor = if l33t { 2.0 } else { 1.0 };
    crate::util::guesses_to_bits(2f64.powf(base) * upper_variations * l33t_factor)
}

/// zxcvbn-style uppercase variation count: a capitalized or all-caps word
/// only doubles the search space; otherwise count the ways to capitalize
/// U+L letters with U uppercase letters or fewer.
fn uppercase_variations(word: &str) -> u64 {
    if word.chars().all(char::is_lowercase) || word.to_lowercase() == word {
        return 1;
    }
    let first_upper = word.chars().next().map(char::is_uppercase).unwrap_or(false);
    let last_upper = word.chars().last().map(char::is_uppercase).unwrap_or(false);
    if first_upper || last_upper || word.chars().all(char::is_uppercase) {
        return 2;
    }
    let upper = word.chars().filter(|c| c.is_uppercase()).count();
    let lower = word.chars().filter(|c| c.is_lowercase()).count();
    (1..=upper.min(lower)).map(|i| crate::util::n_ck(upper + lower, i)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    #[test]
    fn finds_full_cover_hit() {
        let password: Vec<char> = "password".chars().collect();
        let matcher = DictionaryMatcher;
        let config = Configuration::default();
        let matches = matcher.find_matches(&password, &config).unwrap();
        assert!(matches
            .iter()
            .any(|m| m.start == 0 && m.end == 7 && m.token == "password"));
    }

    #[test]
    fn is_case_insensitive() {
        let password: Vec<char> = "PaSSword".chars().collect();
        let matcher = DictionaryMatcher;
        let config = Configuration::default();
        let matches = matcher.find_matches(&password, &config).unwrap();
        assert!(matches.iter().any(|m| m.start == 0 && m.end == 7));
    }
}
