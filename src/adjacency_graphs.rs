//! Static keyboard/keypad adjacency tables used by the spatial matcher.
//!
//! zxcvbn's own `adjacency_graphs` module ships large literal tables
//! (generated from a full physical keyboard layout including shifted
//! keys). Dictionary/adjacency data loading is explicitly out of scope for
//! this crate: what follows is a small, computed
//! stand-in covering unshifted QWERTY letters/digits and a numeric keypad,
//! enough to exercise the spatial matcher and the decomposition core that
//! consumes its output.

use std::collections::HashMap;

/// `graph[c]` is `c`'s neighbors in a fixed, direction-stable order (left,
/// right, upper-left, upper-right, lower-left, lower-right); `None` where
/// the board has no key in that direction. Mirrors zxcvbn's own adjacency
/// table shape, which `calc_average_degree` (below) relies on.
pub type Graph = HashMap<char, Vec<Option<&'static str>>>;

lazy_static! {
    pub static ref QWERTY: Graph = build_staggered_graph(&QWERTY_ROWS, &QWERTY_OFFSETS);
    pub static ref KEYPAD: Graph = build_staggered_graph(&KEYPAD_ROWS, &KEYPAD_OFFSETS);
}

const QWERTY_ROWS: [&str; 4] = ["1234567890", "qwertyuiop", "asdfghjkl", "zxcvbnm"];
// Row starting offsets in half-key units, approximating the real stagger
// of a physical QWERTY keyboard.
const QWERTY_OFFSETS: [i32; 4] = [0, 1, 2, 3];

const KEYPAD_ROWS: [&str; 4] = ["789", "456", "123", "0"];
const KEYPAD_OFFSETS: [i32; 4] = [0, 0, 0, 2];

/// Builds a 6-neighbor adjacency graph for a staggered-row keyboard from
/// its rows and their half-key-unit offsets.
fn build_staggered_graph(rows: &[&str], offsets: &[i32]) -> Graph {
    let positions: Vec<Vec<(char, i32)>> = rows
        .iter()
        .zip(offsets.iter())
        .map(|(row, &offset)| {
            row.chars()
                .enumerate()
                .map(|(i, c)| (c, offset + 2 * i as i32))
                .collect()
        })
        .collect();

    let find = |row_idx: i32, col: i32| -> Option<char> {
        if row_idx < 0 || row_idx as usize >= positions.len() {
            return None;
        }
        positions[row_idx as usize]
            .iter()
            .find(|&&(_, c)| c == col)
            .map(|&(ch, _)| ch)
    };

    let mut graph = HashMap::new();
    for (row_idx, row) in positions.iter().enumerate() {
        let row_idx = row_idx as i32;
        for &(c, col) in row {
            let neighbors = vec![
                find(row_idx, col - 2).map(leak_char),
                find(row_idx, col + 2).map(leak_char),
                find(row_idx - 1, col - 1).map(leak_char),
                find(row_idx - 1, col + 1).map(leak_char),
                find(row_idx + 1, col - 1).map(leak_char),
                find(row_idx + 1, col + 1).map(leak_char),
            ];
            graph.insert(c, neighbors);
        }
    }
    graph
}

fn leak_char(c: char) -> &'static str {
    Box::leak(c.to_string().into_boxed_str())
}

/// Mean number of non-`None` neighbors across a graph's keys. Used by the
/// spatial entropy estimator exactly the way zxcvbn's own
/// `calc_average_degree` is used by its spatial estimate.
pub fn calc_average_degree(graph: &Graph) -> usize {
    let sum: usize = graph
        .values()
        .map(|neighbors| neighbors.iter().filter(|n| n.is_some()).count())
        .sum();
    sum / graph.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qwerty_row_neighbors_are_adjacent() {
        let q = QWERTY.get(&'q').unwrap();
        let has_w = q.iter().flatten().any(|n| *n == "w");
        assert!(has_w, "q should be adjacent to w on a QWERTY graph");
    }

    #[test]
    fn keypad_average_degree_is_positive() {
        assert!(calc_average_degree(&KEYPAD) > 0);
    }
}
