//! Sequence similarity
//!
//! Ratcliff/Obershelp "gestalt pattern matching": find the longest common
//! block, recurse on both sides, and score `2·M / T` where `M` is the number
//! of matched characters and `T` the combined length.
//!
//! Ties between equally long blocks resolve to the one that ends first in
//! `a`, then starts first in `b`. No junk heuristics are applied, so short
//! strings score the same way regardless of character frequency.

use std::collections::HashMap;

/// Similarity ratio in [0.0, 1.0]
///
/// Two empty strings are identical (1.0).
pub fn ratio(a: &str, b: &str) -> f32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_characters(&a, &b) as f32 / total as f32
}

/// Total size of the matching blocks between `a` and `b`
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b_index.entry(*c).or_default().push(j);
    }

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_match(a, &b_index, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }
        matched += size;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            pending.push((i + size, a_hi, j + size, b_hi));
        }
    }

    matched
}

/// Longest common block of `a[a_lo..a_hi]` and `b[b_lo..b_hi]`
///
/// Returns `(start_in_a, start_in_b, size)`.
fn longest_match(
    a: &[char],
    b_index: &HashMap<char, Vec<usize>>,
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (a_lo, b_lo, 0);

    // run length of the block ending at b[j], for the previous row of a
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(a_hi).skip(a_lo) {
        let mut next_lengths = HashMap::new();
        if let Some(positions) = b_index.get(c) {
            for &j in positions {
                if j < b_lo {
                    continue;
                }
                if j >= b_hi {
                    break;
                }
                let size = j
                    .checked_sub(1)
                    .and_then(|prev| run_lengths.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_lengths.insert(j, size);
                if size > best_size {
                    best_i = i + 1 - size;
                    best_j = j + 1 - size;
                    best_size = size;
                }
            }
        }
        run_lengths = next_lengths;
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_identical_strings() {
        assert_eq!(ratio("bid", "bid"), 1.0);
        assert_eq!(ratio("", ""), 1.0);
    }

    #[test]
    fn test_disjoint_strings() {
        assert_eq!(ratio("xyz", "bid"), 0.0);
        assert_eq!(ratio("", "bid"), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // "bcd" is the only common block
        assert!(approx(ratio("abcd", "bcde"), 0.75));
        // "b" + "d" around the mismatch
        assert!(approx(ratio("bad", "bid"), 2.0 * 2.0 / 6.0));
    }

    #[test]
    fn test_recurses_on_both_sides() {
        // longest block "ction", then "au" on the left
        assert!(approx(ratio("auction", "auxction"), 2.0 * 7.0 / 15.0));
    }

    #[test]
    fn test_keyword_inside_sentence() {
        let r = ratio("show auctions", "auctions");
        assert!(approx(r, 2.0 * 8.0 / 21.0));
    }

    #[test]
    fn test_is_symmetric_on_simple_inputs() {
        assert!(approx(ratio("helo", "hello"), ratio("hello", "helo")));
    }
}
