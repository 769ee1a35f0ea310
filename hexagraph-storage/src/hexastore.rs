//! The hexastore index: six permutation keys per edge over a graph's
//! sorted set, and the prefix-bounded triplet cursor.

use crate::error::Result;
use crate::keyspace::{KeyType, Keyspace, LexRange};
use crate::triplet::{Permutation, Triplet, TripletPattern};

/// Inserts all six permutation keys of an edge into the graph's sorted
/// set, returning the new cardinality. Re-inserting an existing edge is a
/// no-op on the cardinality.
pub fn insert_edge(keyspace: &mut Keyspace, graph: &str, triplet: &Triplet) -> Result<usize> {
    let set = keyspace.sorted_set_mut(graph)?;
    for key in triplet.permutations() {
        set.insert(key.as_bytes());
    }
    Ok(set.len())
}

/// Removes all six permutation keys of an edge, returning how many were
/// actually present (0..=6). A missing or mistyped graph key removes
/// nothing.
pub fn remove_edge(keyspace: &mut Keyspace, graph: &str, triplet: &Triplet) -> usize {
    if keyspace.key_type(graph) != Some(KeyType::SortedSet) {
        return 0;
    }
    let Ok(set) = keyspace.sorted_set_mut(graph) else {
        return 0;
    };
    triplet
        .permutations()
        .iter()
        .filter(|key| set.remove(key.as_bytes()))
        .count()
}

/// Opens a range scan for every edge matching the pattern's bound
/// coordinates. A missing or mistyped graph key scans as empty; the query
/// path never surfaces an index error.
pub fn scan<'a>(keyspace: &'a Keyspace, graph: &str, pattern: &TripletPattern) -> TripletIter<'a> {
    let perm = pattern.permutation();
    let (min, max) = pattern.range_bounds();
    let range = match keyspace.sorted_set(graph) {
        Ok(Some(set)) => Some(set.lex_range(min, max)),
        _ => None,
    };
    TripletIter { perm, range }
}

/// Cursor over one permutation region, parsing each key back into the
/// unpermuted `(subject, predicate, object)`.
pub struct TripletIter<'a> {
    perm: Permutation,
    range: Option<LexRange<'a>>,
}

impl Iterator for TripletIter<'_> {
    type Item = Triplet;

    fn next(&mut self) -> Option<Triplet> {
        let range = self.range.as_mut()?;
        for key in range.by_ref() {
            // Keys not parseable under the region's tag cannot have been
            // written by insert_edge; skip rather than abort the scan.
            if let Ok(triplet) = Triplet::parse(self.perm, key) {
                return Some(triplet);
            }
        }
        None
    }
}
