//! Deterministic ordering of a finished batch.
//!
//! Status codes come first, highest code first. Connection errors and
//! timeouts follow. Anything that compares equal keeps its original position
//! (`sort_by` is stable), so ranking identical input always yields identical
//! output and ranking twice changes nothing.

use std::cmp::Ordering;

use subprobe_common::network::Outcome;

pub fn rank(outcomes: &[Outcome]) -> Vec<Outcome> {
    let mut ranked = outcomes.to_vec();
    ranked.sort_by(compare);
    ranked
}

pub fn compare(a: &Outcome, b: &Outcome) -> Ordering {
    match (a.classification().status_code(), b.classification().status_code()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
