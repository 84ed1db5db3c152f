//! The decomposition core.
//!
//! This is a from-scratch rebuild of zxcvbn's `scoring` module: zxcvbn's
//! own `most_guessable_match_sequence` is a dynamic-programming
//! guess-sequence search, which is a different algorithm from the one this
//! crate implements. What's kept from that module is its shape -- free
//! functions with a single public entry point, a `#[cfg(test)]` block
//! built from small hand-constructed `Match` fixtures exercising the
//! search's corner cases.
//!
//! Pipeline, leaves first: [`gather_candidates`] -> [`keep_lowest_matches`]
//! -> [`build_bruteforce_table`] -> {[`cheap_cover`], [`find_best_combination`]}
//! -> [`backfill_bruteforce`] -> [`assemble_result`].

use std::cmp::Ordering;
use std::collections::HashMap;

use log::{debug, trace, warn};

use crate::config::Configuration;
use crate::error::EstimateError;
use crate::matching::{Match, MatchKind};

/// Runs the whole pipeline for a single password, already split into
/// `char`s. Returns the final sorted cover and its total entropy in bits.
pub(crate) fn decompose(
    config: &Configuration,
    password: &[char],
) -> Result<(Vec<Match>, f64), EstimateError> {
    let n = password.len();
    if n == 0 {
        return Ok((Vec::new(), 0.0));
    }

    let raw_candidates = gather_candidates(config, password)?;
    let pruned = keep_lowest_matches(raw_candidates);
    let bruteforce = build_bruteforce_table(config, password);

    let cheap = cheap_cover(n, &pruned, &bruteforce);
    let random = is_random(n, &cheap);
    debug!(
        "password of length {n}: {} candidates after pruning, classified as {}",
        pruned.len(),
        if random { "random" } else { "structured" }
    );

    let chain = if random {
        Vec::new()
    } else {
        find_best_combination(&pruned)
    };

    let full_cover = backfill_bruteforce(chain, &bruteforce);
    assemble_result(password, full_cover)
}

/// Candidate Gatherer. Concatenates every matcher's output; performs
/// no filtering, deduplication, or sorting of its own.
fn gather_candidates(config: &Configuration, password: &[char]) -> Result<Vec<Match>, EstimateError> {
    let mut candidates = Vec::new();
    for matcher in &config.matchers {
        let mut found = matcher.find_matches(password, config)?;
        trace!("matcher {} produced {} candidate(s)", matcher.name(), found.len());
        candidates.append(&mut found);
    }
    Ok(candidates)
}

/// Candidate Pruner. Removes any match dominated by another match
/// with identical coordinates but strictly lower average entropy per
/// character. Matches tied on average entropy all survive.
fn keep_lowest_matches(candidates: Vec<Match>) -> Vec<Match> {
    let mut by_coords: HashMap<(usize, usize), Vec<Match>> = HashMap::new();
    for m in candidates {
        let key = (m.start, m.end);
        let bucket = by_coords.entry(key).or_default();
        let new_avg = average_entropy(&m);
        match bucket.first() {
            None => bucket.push(m),
            Some(existing) => match new_avg.partial_cmp(&average_entropy(existing)) {
                Some(Ordering::Less) => {
                    bucket.clear();
                    bucket.push(m);
                }
                Some(Ordering::Equal) | None => bucket.push(m),
                Some(Ordering::Greater) => {}
            },
        }
    }
    by_coords.into_values().flatten().collect()
}

fn average_entropy(m: &Match) -> f64 {
    m.entropy_bits() / m.length() as f64
}

/// Brute-Force Table. One single-character fallback match per index.
fn build_bruteforce_table(config: &Configuration, password: &[char]) -> Vec<Match> {
    let entropy_bits = crate::util::guesses_to_bits(config.brute_force_cardinality.max(2.0));
    password
        .iter()
        .enumerate()
        .map(|(i, &c)| Match::new(i, i, c.to_string(), entropy_bits, MatchKind::BruteForce))
        .collect()
}

/// Cheap Cover Heuristic (`findGoodEnoughCombination`). A fast
/// forward/backward scan used only to feed the Randomness Gate; not
/// necessarily optimal.
fn cheap_cover(password_len: usize, candidates: &[Match], bruteforce: &[Match]) -> Vec<Match> {
    let mut match_at: Vec<Option<&Match>> = vec![None; password_len];
    for m in candidates {
        let avg = average_entropy(m);
        match match_at[m.end] {
            None => match_at[m.end] = Some(m),
            Some(existing) if avg < average_entropy(existing) => match_at[m.end] = Some(m),
            _ => {}
        }
    }

    let mut emitted = Vec::new();
    let mut cursor = Some(password_len - 1);
    while let Some(k) = cursor {
        if let Some(m) = match_at[k] {
            emitted.push(m.clone());
            cursor = if m.start == 0 { None } else { Some(m.start - 1) };
        } else {
            emitted.push(bruteforce[k].clone());
            cursor = if k == 0 { None } else { Some(k - 1) };
        }
    }
    emitted.reverse();
    emitted
}

/// Randomness Gate (`isRandom`).
fn is_random(password_len: usize, cover: &[Match]) -> bool {
    let l = password_len as f64;
    let matched_len: usize = cover.iter().filter(|m| !m.is_brute_force()).map(Match::length).sum();
    let max_matched_len: usize = cover
        .iter()
        .filter(|m| !m.is_brute_force())
        .map(Match::length)
        .max()
        .unwrap_or(0);
    let matched_len = matched_len as f64;
    let max_matched_len = max_matched_len as f64;

    if matched_len < 0.5 * l {
        return true;
    }
    if matched_len < 0.8 * l && max_matched_len < 0.25 * l {
        return true;
    }
    false
}

/// Comparator: `(startIndex ascending, tokenLength ascending)`, with a
/// deterministic tertiary key so the comparator is a true total order (the
/// source system's comparator is not strictly antisymmetric on a
/// `(start, length)` tie; this implementation avoids that by never
/// returning `Equal` unless the matches are in fact indistinguishable for
/// ordering purposes).
fn match_cmp(a: &Match, b: &Match) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| a.length().cmp(&b.length()))
        .then_with(|| a.end.cmp(&b.end))
        .then_with(|| a.token.cmp(&b.token))
}

/// Implementation-defined ceiling on DFS node visits (see DESIGN.md): an
/// exhaustive search is allowed to stop early as long as the cutoff is
/// documented and doesn't change the result for realistic inputs. Stays
/// well above any chain count a realistic candidate pool produces; it only
/// bites on pathological, densely-overlapping pools (see
/// `benches/decomposition.rs`'s worst-case benchmark).
const MAX_DFS_VISITS: usize = 200_000;

/// Exhaustive Cover Search (`findBestCombination`, `generateMatches`).
/// Invoked only when the password is classified as structured.
fn find_best_combination(candidates: &[Match]) -> Vec<Match> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut sorted = candidates.to_vec();
    sorted.sort_by(match_cmp);

    let succ = build_successors(&sorted);
    let seeds = find_seeds(&sorted, &succ);
    trace!("exhaustive search: {} candidates, {} seeds", sorted.len(), seeds.len());

    let mut best: Option<Vec<usize>> = None;
    let mut visits = 0usize;
    for seed in seeds {
        let mut chain = vec![seed];
        dfs(&sorted, &succ, &mut chain, &mut best, &mut visits);
        if visits >= MAX_DFS_VISITS {
            warn!(
                "exhaustive search hit the {MAX_DFS_VISITS}-node ceiling with {} candidates; \
                 returning the best chain found before the ceiling was hit",
                sorted.len()
            );
            break;
        }
    }

    match best {
        Some(indices) => indices.into_iter().map(|i| sorted[i].clone()).collect(),
        None => Vec::new(),
    }
}

/// Step 2: for each candidate, its thinned forward-adjacency list: later
/// candidates that start strictly after it ends, excluding any that are
/// already transitively reachable through an earlier-accepted successor.
fn build_successors(sorted: &[Match]) -> Vec<Vec<usize>> {
    let n = sorted.len();
    let mut succ = vec![Vec::new(); n];
    for i in 0..n {
        let mut included: Vec<usize> = Vec::new();
        for j in (i + 1)..n {
            if sorted[j].start <= sorted[i].end {
                continue;
            }
            let dominated = included.iter().any(|&p| sorted[p].end < sorted[j].start);
            if !dominated {
                included.push(j);
            }
        }
        included.sort_by(|&x, &y| match_cmp(&sorted[x], &sorted[y]));
        succ[i] = included;
    }
    succ
}

/// Step 3: a candidate is a seed iff it appears in no other candidate's
/// successor list.
fn find_seeds(sorted: &[Match], succ: &[Vec<usize>]) -> Vec<usize> {
    let mut is_successor = vec![false; sorted.len()];
    for list in succ {
        for &j in list {
            is_successor[j] = true;
        }
    }
    let mut seeds: Vec<usize> = (0..sorted.len()).filter(|&i| !is_successor[i]).collect();
    seeds.sort_by(|&x, &y| match_cmp(&sorted[x], &sorted[y]));
    seeds
}

fn intersects(a: &Match, b: &Match) -> bool {
    a.start <= b.end && b.start <= a.end
}

/// Steps 4-5: recursively extend `chain`, forking on every
/// non-intersecting successor of its tail; evaluate leaves against the
/// running best as they're reached. Stops descending once `visits` hits
/// [`MAX_DFS_VISITS`], leaving `best` as whatever the search had found so
/// far.
fn dfs(
    sorted: &[Match],
    succ: &[Vec<usize>],
    chain: &mut Vec<usize>,
    best: &mut Option<Vec<usize>>,
    visits: &mut usize,
) {
    *visits += 1;
    if *visits > MAX_DFS_VISITS {
        return;
    }

    let tail = *chain.last().expect("chain is never empty during dfs");
    let extensions: Vec<usize> = succ[tail]
        .iter()
        .copied()
        .filter(|&cand| chain.iter().all(|&existing| !intersects(&sorted[existing], &sorted[cand])))
        .collect();

    if extensions.is_empty() {
        evaluate_leaf(sorted, chain, best);
        return;
    }

    for cand in extensions {
        if *visits > MAX_DFS_VISITS {
            break;
        }
        chain.push(cand);
        dfs(sorted, succ, chain, best, visits);
        chain.pop();
    }
}

/// Step 5.3: a leaf wins over the running best iff it covers at least as
/// much of the password with recognized patterns, and, among equally
/// covering leaves, has the lower average recognized-pattern entropy. This
/// is the opposite precedence of a naive "minimize total entropy" rule --
/// preserved deliberately (see DESIGN.md).
fn evaluate_leaf(sorted: &[Match], chain: &[usize], best: &mut Option<Vec<usize>>) {
    let (lnb, enb) = chain_totals(sorted, chain);
    let wins = match best {
        None => true,
        Some(best_chain) => {
            let (best_lnb, best_enb) = chain_totals(sorted, best_chain);
            lnb >= best_lnb && (enb / lnb as f64) < (best_enb / best_lnb as f64)
        }
    };
    if wins {
        *best = Some(chain.to_vec());
    }
}

fn chain_totals(sorted: &[Match], chain: &[usize]) -> (usize, f64) {
    let lnb = chain.iter().map(|&i| sorted[i].length()).sum();
    let enb = chain.iter().map(|&i| sorted[i].entropy_bits()).sum();
    (lnb, enb)
}

/// Brute-Force Backfill. Adds one brute-force match per uncovered
/// index; order of insertion is unspecified, the caller sorts afterward.
fn backfill_bruteforce(mut chain: Vec<Match>, bruteforce: &[Match]) -> Vec<Match> {
    let mut covered = vec![false; bruteforce.len()];
    for m in &chain {
        for idx in m.start..=m.end {
            covered[idx] = true;
        }
    }
    for (idx, &is_covered) in covered.iter().enumerate() {
        if !is_covered {
            chain.push(bruteforce[idx].clone());
        }
    }
    chain
}

/// Result Assembler. Sorts the cover, sums entropy, and verifies the
/// reconstruction invariant.
fn assemble_result(password: &[char], mut matches: Vec<Match>) -> Result<(Vec<Match>, f64), EstimateError> {
    matches.sort_by(match_cmp);
    let total_entropy_bits: f64 = matches.iter().map(Match::entropy_bits).sum();

    let reconstructed: String = matches.iter().flat_map(|m| m.token.chars()).collect();
    let expected: String = password.iter().collect();
    if reconstructed != expected {
        return Err(EstimateError::InvariantViolation(format!(
            "reconstructed password {reconstructed:?} does not match input {expected:?}"
        )));
    }

    Ok((matches, total_entropy_bits))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bf(start: usize, end: usize, token: &str) -> Match {
        Match::new(start, end, token.to_string(), 3.32, MatchKind::BruteForce)
    }

    fn fake(start: usize, end: usize, token: &str, entropy_bits: f64) -> Match {
        Match::new(
            start,
            end,
            token.to_string(),
            entropy_bits,
            MatchKind::Dictionary(crate::matching::dictionary::DictionaryDetails {
                rank: 1,
                dictionary_name: "test",
                l33t: false,
            }),
        )
    }

    fn bruteforce_table(password: &str) -> Vec<Match> {
        password
            .chars()
            .enumerate()
            .map(|(i, c)| bf(i, i, &c.to_string()))
            .collect()
    }

    #[test]
    fn search_returns_one_bruteforce_match_given_empty_candidate_pool() {
        let password = "0123456789";
        let bruteforce = bruteforce_table(password);
        let chain = find_best_combination(&[]);
        let cover = backfill_bruteforce(chain, &bruteforce);
        let (matches, _) = assemble_result(&password.chars().collect::<Vec<_>>(), cover).unwrap();
        assert_eq!(matches.len(), 10);
        assert!(matches.iter().all(Match::is_brute_force));
    }

    #[test]
    fn search_backfills_a_prefix_gap() {
        let password: Vec<char> = "0123456789".chars().collect();
        let bruteforce = bruteforce_table("0123456789");
        let m = fake(0, 5, "012345", 1.0);
        let chain = find_best_combination(&[m.clone()]);
        let cover = backfill_bruteforce(chain, &bruteforce);
        let (matches, _) = assemble_result(&password, cover).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0], m);
        assert!(matches[1].is_brute_force());
        assert_eq!(matches[1].start, 6);
        assert_eq!(matches[1].end, 9);
    }

    #[test]
    fn search_backfills_a_suffix_gap() {
        let password: Vec<char> = "0123456789".chars().collect();
        let bruteforce = bruteforce_table("0123456789");
        let m = fake(3, 9, "3456789", 1.0);
        let chain = find_best_combination(&[m.clone()]);
        let cover = backfill_bruteforce(chain, &bruteforce);
        let (matches, _) = assemble_result(&password, cover).unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches[0].is_brute_force());
        assert_eq!(matches[0].start, 0);
        assert_eq!(matches[0].end, 2);
        assert_eq!(matches[1], m);
    }

    #[test]
    fn search_backfills_an_infix_gap() {
        let password: Vec<char> = "0123456789".chars().collect();
        let bruteforce = bruteforce_table("0123456789");
        let m = fake(1, 8, "12345678", 1.0);
        let chain = find_best_combination(&[m.clone()]);
        let cover = backfill_bruteforce(chain, &bruteforce);
        let (matches, _) = assemble_result(&password, cover).unwrap();
        assert_eq!(matches.len(), 3);
        assert!(matches[0].is_brute_force());
        assert_eq!(matches[0].start, 0);
        assert_eq!(matches[0].end, 0);
        assert_eq!(matches[1], m);
        assert!(matches[2].is_brute_force());
        assert_eq!(matches[2].start, 9);
        assert_eq!(matches[2].end, 9);
    }

    #[test]
    fn search_chooses_the_lower_average_entropy_match_given_two_matches_of_same_span() {
        let lo = fake(0, 9, "0123456789", 1.0);
        let hi = fake(0, 9, "0123456789", 5.0);
        let pruned = keep_lowest_matches(vec![lo.clone(), hi.clone()]);
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned[0], lo);
    }

    #[test]
    fn search_prefers_the_longer_recognized_cover_over_lower_entropy() {
        // m0 spans the whole password at a lower average entropy and a
        // greater recognized length than m1, which only covers a prefix.
        // m0 wins on both axes, regardless of which leaf the DFS happens
        // to visit first.
        let password: Vec<char> = "0123456789".chars().collect();
        let m0 = fake(0, 9, "0123456789", 1.0);
        let m1 = fake(0, 5, "012345", 3.0);

        let chain = find_best_combination(&[m0.clone(), m1]);
        let (matches, _) = assemble_result(&password, chain).unwrap();
        assert_eq!(matches, vec![m0]);
    }

    #[test]
    fn search_prefers_two_short_matches_when_they_cover_equally_and_are_cheaper() {
        let password: Vec<char> = "0123456789".chars().collect();
        let m1 = fake(0, 3, "0123", 0.5);
        let m2 = fake(4, 9, "456789", 0.5);
        // same total length (10) as a single whole-password match, but a
        // single match can't simultaneously exist at two spans, so compare
        // against a worse whole-password alternative of equal length.
        let whole = fake(0, 9, "0123456789", 4.0);

        let chain = find_best_combination(&[whole, m1.clone(), m2.clone()]);
        let (matches, _) = assemble_result(&password, chain).unwrap();
        assert_eq!(matches, vec![m1, m2]);
    }

    #[test]
    fn cheap_cover_is_all_bruteforce_for_empty_candidate_pool() {
        let password_len = 8;
        let bruteforce = bruteforce_table("Xk7#pQ9!");
        let cover = cheap_cover(password_len, &[], &bruteforce);
        assert_eq!(cover.len(), 8);
        assert!(cover.iter().all(Match::is_brute_force));
        assert!(is_random(password_len, &cover));
    }

    #[test]
    fn randomness_gate_flags_low_coverage_as_random() {
        let password_len = 10;
        let covering = fake(0, 3, "abcd", 1.0); // covers 40% < 50%
        assert!(is_random(password_len, &[covering]));
    }

    #[test]
    fn randomness_gate_flags_fragmented_coverage_as_random() {
        let password_len = 10;
        // 70% covered (< 80%) but no single match spans >= 25%.
        let a = fake(0, 1, "ab", 1.0);
        let b = fake(2, 3, "cd", 1.0);
        let c = fake(4, 5, "ef", 1.0);
        let d = fake(6, 6, "g", 1.0);
        assert!(is_random(password_len, &[a, b, c, d]));
    }

    #[test]
    fn randomness_gate_accepts_well_covered_password_as_structured() {
        let password_len = 10;
        let covering = fake(0, 8, "123456789", 1.0); // 90% in one run
        assert!(!is_random(password_len, &[covering]));
    }

    #[test]
    fn pruner_keeps_ties() {
        let a = fake(0, 3, "abcd", 2.0);
        let b = fake(0, 3, "abcd", 2.0);
        let pruned = keep_lowest_matches(vec![a, b]);
        assert_eq!(pruned.len(), 2);
    }

    #[test]
    fn assembler_rejects_a_cover_that_does_not_reconstruct_the_password() {
        let password: Vec<char> = "abc".chars().collect();
        let bogus = fake(0, 2, "xyz", 1.0);
        let result = assemble_result(&password, vec![bogus]);
        assert!(matches!(result, Err(EstimateError::InvariantViolation(_))));
    }
}
