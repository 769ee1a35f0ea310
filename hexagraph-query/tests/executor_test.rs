//! Executor behavior against a seeded hexastore, below the facade.

use hexagraph_query::filter::FilterTree;
use hexagraph_query::pattern::PatternGraph;
use hexagraph_query::{executor, parse, rewrite};
use hexagraph_storage::hexastore::insert_edge;
use hexagraph_storage::keyspace::Keyspace;
use hexagraph_storage::label_store::LabelStores;
use hexagraph_storage::triplet::Triplet;
use hexagraph_storage::value::Value;

fn run(keyspace: &Keyspace, text: &str) -> Vec<Vec<Value>> {
    let mut query = parse(text).unwrap();
    rewrite::normalize(&mut query, &LabelStores::new(), "g").unwrap();
    let pattern = PatternGraph::build(query.match_clause.as_ref().unwrap()).unwrap();
    let filter = query.where_clause.as_ref().map(FilterTree::build);
    executor::execute(
        keyspace,
        "g",
        &pattern,
        filter.as_ref(),
        query.return_clause.as_ref(),
    )
    .into_records()
}

fn seed(edges: &[(&str, &str, &str)]) -> Keyspace {
    let mut keyspace = Keyspace::new();
    for (s, p, o) in edges {
        insert_edge(&mut keyspace, "g", &Triplet::new(*s, *p, *o)).unwrap();
    }
    keyspace
}

#[test]
fn emission_order_is_lexicographic_over_binding_tuples() {
    let keyspace = seed(&[("b", "r", "z"), ("a", "r", "y"), ("a", "r", "x")]);
    let rows = run(&keyspace, "MATCH (s)-[:r]->(o) RETURN s, o");
    let rendered: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(Value::to_string).collect())
        .collect();
    assert_eq!(
        rendered,
        vec![vec!["a", "x"], vec!["a", "y"], vec!["b", "z"]]
    );
}

#[test]
fn sibling_branches_see_the_parent_bindings() {
    // After the failing (a,b) branch, the (a,c) branch must still see
    // `x` bound to a, not a leftover from the dead end.
    let keyspace = seed(&[("a", "r", "b"), ("a", "r", "c"), ("c", "r", "d")]);
    let rows = run(&keyspace, "MATCH (x)-[:r]->(y)-[:r]->(z) RETURN x, y, z");
    let rendered: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(Value::to_string).collect())
        .collect();
    assert_eq!(rendered, vec![vec!["a", "c", "d"]]);
}

#[test]
fn repeated_node_alias_constrains_to_self_loops() {
    let keyspace = seed(&[("a", "r", "b"), ("c", "r", "c")]);
    let rows = run(&keyspace, "MATCH (n)-[:r]->(n) RETURN n");
    assert_eq!(rows, vec![vec![Value::String("c".to_string())]]);
}

#[test]
fn filter_prunes_complete_assignments_only() {
    let keyspace = seed(&[("a", "r", "b"), ("b", "r", "c")]);
    let rows = run(
        &keyspace,
        "MATCH (x)-[:r]->(y) WHERE y = 'b' OR x = 'b' RETURN x, y",
    );
    assert_eq!(rows.len(), 2);
}

#[test]
fn aggregated_execution_feeds_the_group_cache() {
    let keyspace = seed(&[("a", "r", "b"), ("a", "r", "c"), ("d", "r", "e")]);
    let rows = run(&keyspace, "MATCH (x)-[:r]->(y) RETURN x, count(y)");
    assert_eq!(
        rows,
        vec![
            vec![Value::String("a".to_string()), Value::Number(2.0)],
            vec![Value::String("d".to_string()), Value::Number(1.0)],
        ]
    );
}
