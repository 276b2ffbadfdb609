//! Partitioner contract checks.
//!
//! These functions verify that a strategy satisfies the guarantees every
//! consumer of a partition assignment relies on. Reused across all the
//! built-in strategy test modules.

use crate::partitioner::Partitioner;

fn assignment(p: &dyn Partitioner) -> Vec<u32> {
    let mut part = vec![u32::MAX; p.grid().npts()];
    p.partition(&mut part).unwrap();
    part
}

/// Assert that every point is assigned a partition in `[0, nb_partitions)`.
pub fn assert_values_in_range(p: &dyn Partitioner) {
    let n = p.nb_partitions() as u32;
    for (i, &v) in assignment(p).iter().enumerate() {
        assert!(v < n, "{}: point {i} assigned to {v}, nb_partitions is {n}", p.name());
    }
}

/// Assert that no partition is left empty while there are enough
/// points to go round.
pub fn assert_all_partitions_used(p: &dyn Partitioner) {
    if p.nb_partitions() > p.grid().npts() {
        return;
    }
    let mut seen = vec![false; p.nb_partitions()];
    for v in assignment(p) {
        seen[v as usize] = true;
    }
    if let Some(empty) = seen.iter().position(|&s| !s) {
        panic!("{}: partition {empty} received no points", p.name());
    }
}

/// Assert that two runs produce the same assignment.
pub fn assert_deterministic(p: &dyn Partitioner) {
    assert_eq!(assignment(p), assignment(p), "{}: assignment changed between runs", p.name());
}

/// Assert that a buffer of the wrong length is rejected untouched.
pub fn assert_output_length_checked(p: &dyn Partitioner) {
    let mut short = vec![7u32; p.grid().npts() - 1];
    assert!(p.partition(&mut short).is_err(), "{}: short buffer accepted", p.name());
    assert!(short.iter().all(|&v| v == 7), "{}: short buffer was written", p.name());
}

/// Assert that the materialised distribution matches a direct run.
pub fn assert_distribution_matches(p: &dyn Partitioner) {
    let dist = p.distribution().unwrap();
    assert_eq!(dist.as_slice(), assignment(p).as_slice());
    assert_eq!(dist.nb_pts().iter().sum::<usize>(), p.grid().npts());
}

/// Assert that exactly `nb_partitions - npts` partitions are empty when
/// the count exceeds the point total.
pub fn assert_surplus_partitions_empty(p: &dyn Partitioner) {
    let npts = p.grid().npts();
    let dist = p.distribution().unwrap();
    assert_eq!(dist.npts(), npts);
    assert_eq!(dist.nb_pts().len(), p.nb_partitions());
    let empty = dist.nb_pts().iter().filter(|&&c| c == 0).count();
    assert_eq!(
        empty,
        p.nb_partitions().saturating_sub(npts),
        "{}: partition sizes {:?}",
        p.name(),
        dist.nb_pts()
    );
}

/// Assert that partition sizes differ by at most `spread`.
pub fn assert_balanced(p: &dyn Partitioner, spread: usize) {
    let dist = p.distribution().unwrap();
    assert!(
        dist.max_pts() - dist.min_pts() <= spread,
        "{}: partition sizes {:?} spread more than {spread}",
        p.name(),
        dist.nb_pts()
    );
}

/// Run every contract check except balance.
pub fn run_full_compliance(p: &dyn Partitioner) {
    assert_values_in_range(p);
    assert_all_partitions_used(p);
    assert_deterministic(p);
    assert_output_length_checked(p);
    assert_distribution_matches(p);
}
