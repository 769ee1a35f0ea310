//! The pattern-matching executor: a depth-first enumeration that binds
//! one pattern edge at a time, driving a hexastore scan per edge.
//!
//! Bindings are an explicit assignment map handed down the recursion.
//! Binding an already-bound alias degrades to an equality check, so
//! sibling branches always see their parent's assignment unchanged and
//! the closing edge of a cyclic pattern acts as a constraint.

use crate::ast::{Expr, ReturnClause, ReturnElement};
use crate::evaluator;
use crate::filter::FilterTree;
use crate::pattern::PatternGraph;
use crate::result::ResultSet;
use hexagraph_storage::hexastore;
use hexagraph_storage::keyspace::Keyspace;
use hexagraph_storage::triplet::TripletPattern;
use hexagraph_storage::value::Value;
use std::collections::HashMap;
use tracing::trace;

/// The current assignment of concrete ids to pattern aliases. Node and
/// edge aliases share one namespace, as they are unique across both.
pub type Bindings = HashMap<String, String>;

struct Traversal<'a> {
    keyspace: &'a Keyspace,
    graph: &'a str,
    pattern: &'a PatternGraph,
    filter: Option<&'a FilterTree>,
    elements: &'a [ReturnElement],
    key_elements: Vec<ReturnElement>,
    agg_expressions: Vec<Expr>,
}

/// Runs the pattern against the graph's index and returns the completed
/// result set.
pub fn execute(
    keyspace: &Keyspace,
    graph: &str,
    pattern: &PatternGraph,
    filter: Option<&FilterTree>,
    return_clause: Option<&ReturnClause>,
) -> ResultSet {
    let mut results = ResultSet::new(return_clause);
    if pattern.nodes.is_empty() {
        results.finalize();
        return results;
    }

    let traversal = Traversal {
        keyspace,
        graph,
        pattern,
        filter,
        elements: return_clause.map(|r| r.elements.as_slice()).unwrap_or(&[]),
        key_elements: results.key_elements().to_vec(),
        agg_expressions: results.agg_expressions().into_iter().cloned().collect(),
    };

    let mut entry_points = pattern.entry_points();
    let start = match entry_points.pop() {
        Some(node) => node,
        None => {
            results.finalize();
            return results;
        }
    };

    let mut bindings = Bindings::new();
    let mut visited = vec![false; pattern.edges.len()];
    query_node(
        &traversal,
        start,
        &mut entry_points,
        &mut bindings,
        &mut visited,
        &mut results,
    );
    results.finalize();
    results
}

fn query_node(
    traversal: &Traversal<'_>,
    current: usize,
    entry_points: &mut Vec<usize>,
    bindings: &mut Bindings,
    visited: &mut Vec<bool>,
    results: &mut ResultSet,
) {
    let outgoing = traversal.pattern.nodes[current].outgoing.clone();
    for edge_idx in outgoing {
        if results.full() || visited[edge_idx] {
            continue;
        }
        let edge = &traversal.pattern.edges[edge_idx];
        let src_alias = traversal.pattern.nodes[edge.src].alias.clone();
        let dest_alias = traversal.pattern.nodes[edge.dest].alias.clone();

        let pattern_triplet = TripletPattern {
            subject: bindings.get(&src_alias).cloned(),
            predicate: edge
                .label
                .clone()
                .or_else(|| bindings.get(&edge.alias).cloned()),
            object: bindings.get(&dest_alias).cloned(),
        };
        trace!(edge = %edge.alias, pattern = ?pattern_triplet, "opening cursor");

        visited[edge_idx] = true;
        let cursor = hexastore::scan(traversal.keyspace, traversal.graph, &pattern_triplet);
        for triplet in cursor {
            if results.full() {
                break;
            }
            let Some(introduced) = bind_triplet(
                bindings,
                [
                    (&src_alias, &triplet.subject),
                    (&edge.alias, &triplet.predicate),
                    (&dest_alias, &triplet.object),
                ],
            ) else {
                continue;
            };

            let dest = edge.dest;
            let dest_has_unvisited = traversal.pattern.nodes[dest]
                .outgoing
                .iter()
                .any(|&e| !visited[e]);

            if dest_has_unvisited {
                query_node(traversal, dest, entry_points, bindings, visited, results);
            } else if let Some(next) = entry_points.pop() {
                query_node(traversal, next, entry_points, bindings, visited, results);
                // Restore for the sibling iterations of this cursor.
                entry_points.push(next);
            } else {
                emit(traversal, bindings, results);
            }

            for alias in introduced {
                bindings.remove(&alias);
            }
        }
        visited[edge_idx] = false;
    }
}

/// Binds each alias to its concrete value, or checks equality where the
/// alias is already bound. Returns the aliases newly introduced, or
/// `None` on a conflict (with nothing left bound).
fn bind_triplet(bindings: &mut Bindings, pairs: [(&String, &String); 3]) -> Option<Vec<String>> {
    let mut introduced = Vec::new();
    for (alias, value) in pairs {
        match bindings.get(alias) {
            Some(bound) if bound == value => {}
            Some(_) => {
                for alias in introduced {
                    bindings.remove(&alias);
                }
                return None;
            }
            None => {
                bindings.insert(alias.clone(), value.clone());
                introduced.push(alias.clone());
            }
        }
    }
    Some(introduced)
}

/// A complete assignment: filter, then aggregate or project.
fn emit(traversal: &Traversal<'_>, bindings: &Bindings, results: &mut ResultSet) {
    if let Some(filter) = traversal.filter {
        if !filter.apply(bindings, traversal.keyspace) {
            return;
        }
    }

    if results.aggregated {
        let keys: Vec<Value> = traversal
            .key_elements
            .iter()
            .map(|element| evaluator::evaluate(&element.exp, bindings, traversal.keyspace))
            .collect();
        let values: Vec<Value> = traversal
            .agg_expressions
            .iter()
            .map(|exp| aggregation_argument(exp, bindings, traversal.keyspace))
            .collect();
        results.aggregate(keys, values);
    } else if !traversal.elements.is_empty() {
        let record = traversal
            .elements
            .iter()
            .map(|element| evaluator::evaluate(&element.exp, bindings, traversal.keyspace))
            .collect();
        results.add_record(record);
    }
}

/// The value an aggregation context steps with: the application's first
/// argument evaluated under the bindings, `Null` for bare `count()`.
fn aggregation_argument(exp: &Expr, bindings: &Bindings, keyspace: &Keyspace) -> Value {
    match exp {
        Expr::Operation { args, .. } => args
            .first()
            .map(|arg| evaluator::evaluate(arg, bindings, keyspace))
            .unwrap_or(Value::Null),
        Expr::Operand(_) => Value::Null,
    }
}
