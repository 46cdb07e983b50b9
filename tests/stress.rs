//! Randomized insert, delete and query rounds checked against a `BTreeSet` model.
//!
//! Every element `e` is stored with score `-e`, so the skip list runs in descending element
//! order while the model runs ascending.

use hopscotch_zset::SkipList;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

const LIMIT: usize = 100;
const ROUNDS: usize = 400;

fn score_of(element: u64) -> f64 {
    -(element as f64)
}

#[test]
fn random_rounds_agree_with_a_model() {
    // 0x726f62696e => Robin
    let mut rng = StdRng::seed_from_u64(0x726f62696e);
    let mut skiplist = SkipList::<u64>::with_seed(0x6261746d616e6e);
    let mut model = BTreeSet::new();
    let mut next_element: u64 = 100_001;

    for _ in 0..1000 {
        skiplist.insert(score_of(next_element), next_element).unwrap();
        model.insert(next_element);
        next_element += 1;
    }

    for round in 0..ROUNDS {
        for _ in 0..rng.gen_range(0..200) {
            skiplist.insert(score_of(next_element), next_element).unwrap();
            model.insert(next_element);
            next_element += 1;
        }

        for _ in 0..rng.gen_range(0..50) {
            let victim = rng.gen_range(100_001..next_element);
            let expected = model.remove(&victim);
            assert_eq!(skiplist.delete(score_of(victim), &victim), expected);
        }

        let offset = rng.gen_range(0..200);
        let cutoff = -(next_element as f64) + offset as f64;
        // Everything scored above `cutoff` has an element below `-cutoff`.
        let threshold = next_element - offset;

        if round % 2 == 0 {
            let start = skiplist.node_greater_than(cutoff);
            let expected_start = model.range(..threshold).next_back().copied();
            assert_eq!(start.and_then(|id| skiplist.element(id)).copied(), expected_start);

            let mut out = Vec::new();
            skiplist.copy_forward(start, LIMIT, &mut out);
            let expected: Vec<u64> = match expected_start {
                Some(first) => model.range(..=first).rev().take(LIMIT).copied().collect(),
                None => Vec::new(),
            };
            assert_eq!(out, expected);
        } else {
            let start = skiplist.node_less_than(cutoff);
            let expected_start = model.range((Excluded(threshold), Unbounded)).next().copied();
            assert_eq!(start.and_then(|id| skiplist.element(id)).copied(), expected_start);

            let floor = cutoff - 10.0;
            let mut out = Vec::new();
            skiplist.copy_backward_until(start, LIMIT, floor, &mut out);
            let expected: Vec<u64> = match expected_start {
                Some(first) => model
                    .range(first..)
                    .take_while(|element| score_of(**element) > floor)
                    .take(LIMIT)
                    .copied()
                    .collect(),
                None => Vec::new(),
            };
            assert_eq!(out, expected);
        }

        assert_eq!(skiplist.len(), model.len());
    }

    let descending: Vec<u64> = model.iter().rev().copied().collect();
    let walked: Vec<u64> = skiplist.iter().map(|(_, element)| *element).collect();
    assert_eq!(walked, descending);

    let mut rewound = Vec::new();
    skiplist.copy_backward(skiplist.last_node(), usize::MAX, &mut rewound);
    assert_eq!(rewound, model.iter().copied().collect::<Vec<u64>>());
}
