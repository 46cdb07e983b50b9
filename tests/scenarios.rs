use hopscotch_zset::{ScoreRange, SkipList};
use pretty_assertions::assert_eq;

/// Elements `100001..=101000`, each scored with its own negation, so ascending score order is
/// descending element order.
fn negated_scores() -> SkipList<i64> {
    let mut skiplist = SkipList::with_seed(0x6261746d616e6e);
    for element in 100_001..=101_000i64 {
        skiplist.insert(-element as f64, element).unwrap();
    }
    skiplist
}

#[test]
fn node_greater_than_then_copy_forward_walks_down_the_elements() {
    let skiplist = negated_scores();
    assert_eq!(skiplist.len(), 1000);

    let start = skiplist.node_greater_than(-100_500.0);
    assert_eq!(start.and_then(|id| skiplist.get(id)), Some((-100_499.0, &100_499)));

    let mut out = Vec::new();
    let written = skiplist.copy_forward(start, 5, &mut out);

    assert_eq!(written, 5);
    assert_eq!(out, [100_499, 100_498, 100_497, 100_496, 100_495]);
}

#[test]
fn node_less_than_then_copy_backward_walks_up_the_elements() {
    let skiplist = negated_scores();

    let start = skiplist.node_less_than(-100_500.0);
    assert_eq!(start.and_then(|id| skiplist.get(id)), Some((-100_501.0, &100_501)));

    let mut out = Vec::new();
    let written = skiplist.copy_backward_until(start, 100, -100_505.0, &mut out);

    assert_eq!(written, 4);
    assert_eq!(out, [100_501, 100_502, 100_503, 100_504]);
}

#[test]
fn copy_forward_until_stops_at_the_bound() {
    let skiplist = negated_scores();
    let start = skiplist.first_node();

    let mut out = Vec::new();
    let written = skiplist.copy_forward_until(start, 10, -100_997.0, &mut out);

    assert_eq!(written, 3);
    assert_eq!(out, [101_000, 100_999, 100_998]);
}

#[test]
fn ranks_of_negated_scores_run_backwards() {
    let skiplist = negated_scores();

    assert_eq!(skiplist.rank(-101_000.0, &101_000), Some(1));
    assert_eq!(skiplist.rank(-100_001.0, &100_001), Some(1000));

    let tenth = skiplist.get_by_rank(10).unwrap();
    assert_eq!(skiplist.element(tenth), Some(&100_991));
}

#[test]
fn score_ranges_find_their_ends() {
    let skiplist = negated_scores();
    let range = ScoreRange::inclusive(-100_010.0, -100_005.0);

    let first = skiplist.first_in_range(&range).unwrap();
    let last = skiplist.last_in_range(&range).unwrap();

    assert_eq!(skiplist.element(first), Some(&100_010));
    assert_eq!(skiplist.element(last), Some(&100_005));
}

#[test]
fn deleting_a_missing_pair_from_three_nodes_reports_not_found() {
    let mut skiplist = SkipList::<i64>::new();
    skiplist.insert(1.0, 1).unwrap();
    skiplist.insert(2.0, 2).unwrap();
    skiplist.insert(3.0, 3).unwrap();

    assert_eq!(skiplist.delete(2.0, &3), false);
    assert_eq!(skiplist.delete(4.0, &4), false);
    assert_eq!(skiplist.len(), 3);
}

#[test]
fn inserting_and_deleting_the_only_node_empties_the_list() {
    let mut skiplist = SkipList::<i64>::new();
    skiplist.insert(7.0, 7).unwrap();

    assert_eq!(skiplist.delete(7.0, &7), true);
    assert_eq!(skiplist.len(), 0);
    assert_eq!(skiplist.last_node(), None);
    assert_eq!(skiplist.first_node(), None);
    assert_eq!(skiplist.height(), 1);
}

#[test]
fn with_probability_rejects_bad_probabilities() {
    assert!(SkipList::<i64>::with_probability(1.5, None).is_err());

    let mut skiplist = SkipList::<i64>::with_probability(0.5, Some(3)).unwrap();
    skiplist.insert(1.0, 1).unwrap();
    assert_eq!(skiplist.first(), Some((1.0, &1)));
}
