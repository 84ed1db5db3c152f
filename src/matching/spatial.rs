use super::{Match, MatchKind, PatternMatcher};
use crate::adjacency_graphs::{calc_average_degree, Graph, KEYPAD, QWERTY};
use crate::config::Configuration;
use crate::error::EstimateError;
use crate::util::{guesses_to_bits, n_ck};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct SpatialDetails {
    pub graph: &'static str,
    pub turns: usize,
}

const MIN_SPATIAL_LENGTH: usize = 4;

/// Matches keyboard/keypad adjacency walks (`qwerty`, `asdf`, `7410`).
pub struct SpatialMatcher;

impl PatternMatcher for SpatialMatcher {
    fn name(&self) -> &'static str {
        "spatial"
    }

    fn find_matches(
        &self,
        password: &[char],
        _configuration: &Configuration,
    ) -> Result<Vec<Match>, EstimateError> {
        let mut matches = find_graph_matches(password, "qwerty", &QWERTY);
        matches.extend(find_graph_matches(password, "keypad", &KEYPAD));
        Ok(matches)
    }
}

fn find_graph_matches(password: &[char], graph_name: &'static str, graph: &Graph) -> Vec<Match> {
    let n = password.len();
    let mut out = Vec::new();
    let mut start = 0;
    while start < n {
        let mut end = start;
        let mut turns = 0usize;
        let mut last_direction: Option<usize> = None;
        while end + 1 < n {
            let cur = password[end].to_ascii_lowercase();
            let next = password[end + 1].to_ascii_lowercase();
            let Some(neighbors) = graph.get(&cur) else {
                break;
            };
            let direction = neighbors
                .iter()
                .position(|slot| slot.and_then(|s| s.chars().next()) == Some(next));
            match direction {
                Some(dir) => {
                    if last_direction.map_or(false, |d| d != dir) {
                        turns += 1;
                    }
                    last_direction = Some(dir);
                    end += 1;
                }
                None => break,
            }
        }
        let length = end - start + 1;
        if length >= MIN_SPATIAL_LENGTH {
            let token: String = password[start..=end].iter().collect();
            let turns = turns.max(1);
            let entropy_bits = spatial_entropy_bits(graph_name, graph, length, turns);
            out.push(Match::new(
                start,
                end,
                token,
                entropy_bits,
                MatchKind::Spatial(SpatialDetails {
                    graph: graph_name,
                    turns,
                }),
            ));
            start = end + 1;
        } else {
            start += 1;
        }
    }
    out
}

/// zxcvbn-style spatial estimate: sum, over possible turn counts, the
/// number of length-`L`-or-less patterns with that many turns.
fn spatial_entropy_bits(_graph_name: &str, graph: &Graph, length: usize, turns: usize) -> f64 {
    let starts = graph.len() as u64;
    let degree = calc_average_degree(graph) as u64;
    let mut guesses: u64 = 0;
    for i in 2..=length {
        let possible_turns = turns.min(i - 1);
        for j in 1..=possible_turns {
            guesses = guesses.saturating_add(n_ck(i - 1, j - 1) * starts * degree.pow(j as u32));
        }
    }
    guesses_to_bits(guesses as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    #[test]
    fn finds_qwerty_row_walk() {
        let password: Vec<char> = "qwerty123".chars().collect();
        let matcher = SpatialMatcher;
        let config = Configuration::default();
        let matches = matcher.find_matches(&password, &config).unwrap();
        assert!(matches.iter().any(|m| m.start == 0 && m.end == 5));
    }

    #[test]
    fn ignores_short_walks() {
        let password: Vec<char> = "qw".chars().collect();
        let matcher = SpatialMatcher;
        let config = Configuration::default();
        let matches = matcher.find_matches(&password, &config).unwrap();
        assert!(matches.is_empty());
    }
}
