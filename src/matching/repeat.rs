use super::{Match, MatchKind, PatternMatcher};
use crate::config::Configuration;
use crate::error::EstimateError;
use crate::util::{char_class_cardinality, guesses_to_bits};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct RepeatDetails {
    pub base_token: String,
    pub repeat_count: usize,
}

/// Matches maximal runs of a repeated character or a repeated short block
/// (`aaa`, `abcabcabc`): at least two repetitions of the base token,
/// covering three characters or more in total.
pub struct RepeatMatcher;

impl PatternMatcher for RepeatMatcher {
    fn name(&self) -> &'static str {
        "repeat"
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
            match best_repeat_at(password, start) {
                Some((block_len, repeat_count)) => {
                    let end = start + block_len * repeat_count - 1;
                    let token: String = password[start..=end].iter().collect();
                    let base_token: String = password[start..start + block_len].iter().collect();
                    let guesses =
                        block_guesses(&password[start..start + block_len]) * repeat_count as f64;
                    matches.push(Match::new(
                        start,
                        end,
                        token,
                        guesses_to_bits(guesses),
                        MatchKind::Repeat(RepeatDetails {
                            base_token,
                            repeat_count,
                        }),
                    ));
                    start = end + 1;
                }
                None => start += 1,
            }
        }
        Ok(matches)
    }
}

/// Finds the repeating unit starting at `start` that covers the most
/// characters, trying every candidate block length from a single
/// character up to half of what remains of the password; ties go to the
/// shorter (more-repeated) unit. Returns `None` if nothing at `start`
/// repeats at least twice across three characters or more.
fn best_repeat_at(password: &[char], start: usize) -> Option<(usize, usize)> {
    let n = password.len();
    let max_block_len = (n - start) / 2;
    let mut best: Option<(usize, usize)> = None;
    for block_len in 1..=max_block_len {
        let base = &password[start..start + block_len];
        let mut repeat_count = 1;
        let mut pos = start + block_len;
        while pos + block_len <= n && &password[pos..pos + block_len] == base {
            repeat_count += 1;
            pos += block_len;
        }
        if repeat_count < 2 {
            continue;
        }
        let total_len = block_len * repeat_count;
        let better = match best {
            None => true,
            Some((best_block_len, best_repeat_count)) => {
                let best_total = best_block_len * best_repeat_count;
                total_len > best_total || (total_len == best_total && block_len < best_block_len)
            }
        };
        if better {
            best = Some((block_len, repeat_count));
        }
    }
    best.filter(|&(block_len, repeat_count)| block_len * repeat_count >= 3)
}

fn block_guesses(block: &[char]) -> f64 {
    block.iter().map(|&c| char_class_cardinality(c) as f64).product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    #[test]
    fn finds_repeated_run() {
        let password: Vec<char> = "aaa".chars().collect();
        let matcher = RepeatMatcher;
        let config = Configuration::default();
        let matches = matcher.find_matches(&password, &config).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start, 0);
        assert_eq!(matches[0].end, 2);
    }

    #[test]
    fn ignores_short_runs() {
        let password: Vec<char> = "aab".chars().collect();
        let matcher = RepeatMatcher;
        let config = Configuration::default();
        let matches = matcher.find_matches(&password, &config).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn finds_repeated_block() {
        let password: Vec<char> = "abcabcabc".chars().collect();
        let matcher = RepeatMatcher;
        let config = Configuration::default();
        let matches = matcher.find_matches(&password, &config).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start, 0);
        assert_eq!(matches[0].end, 8);
        match &matches[0].kind {
            MatchKind::Repeat(details) => {
                assert_eq!(details.base_token, "abc");
                assert_eq!(details.repeat_count, 3);
            }
            other => panic!("expected a repeat match, got {other:?}"),
        }
    }

    #[test]
    fn ignores_a_block_that_only_appears_once() {
        let password: Vec<char> = "abcdef".chars().collect();
        let matcher = RepeatMatcher;
        let config = Configuration::default();
        let matches = matcher.find_matches(&password, &config).unwrap();
        assert!(matches.is_empty());
    }
}
