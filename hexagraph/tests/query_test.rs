//! End-to-end query scenarios over the hexastore.

use hexagraph::{GraphDb, Value};

fn strings(rows: &[Vec<Value>]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(Value::to_string).collect())
        .collect()
}

#[test]
fn single_edge_match_returns_bound_ids() {
    let mut db = GraphDb::new();
    db.add_edge("g", "alice", "knows", "bob").unwrap();

    let result = db.query("g", "MATCH (a)-[:knows]->(b) RETURN a, b").unwrap();
    assert_eq!(result.columns, vec!["a", "b"]);
    assert_eq!(strings(&result.rows), vec![vec!["alice", "bob"]]);
}

#[test]
fn two_hop_chain_joins_on_the_shared_node() {
    let mut db = GraphDb::new();
    db.add_edge("g", "a", "r", "b").unwrap();
    db.add_edge("g", "b", "r", "c").unwrap();
    db.add_edge("g", "a", "r", "c").unwrap();

    let result = db
        .query("g", "MATCH (x)-[:r]->(y)-[:r]->(z) RETURN x,y,z")
        .unwrap();
    assert_eq!(strings(&result.rows), vec![vec!["a", "b", "c"]]);
}

#[test]
fn where_filter_restricts_assignments() {
    let mut db = GraphDb::new();
    db.add_edge("g", "alice", "likes", "x").unwrap();
    db.add_edge("g", "bob", "likes", "x").unwrap();

    let result = db
        .query("g", "MATCH (a)-[:likes]->(b) WHERE a = 'alice' RETURN b")
        .unwrap();
    assert_eq!(strings(&result.rows), vec![vec!["x"]]);
}

#[test]
fn inline_properties_match_the_explicit_where_form() {
    let mut db = GraphDb::new();
    db.add_edge("g", "alice", "likes", "x").unwrap();
    db.add_edge("g", "bob", "likes", "y").unwrap();
    db.set_node_property("g", "person", "alice", "name", Value::String("alice".into()))
        .unwrap();
    db.set_node_property("g", "person", "bob", "name", Value::String("bob".into()))
        .unwrap();

    // `b` carries a label with no registered properties, so the
    // collapsed return projects its bound id.
    let inline = db
        .query("g", "MATCH (a {name:'alice'})-[:likes]->(b:thing) RETURN b")
        .unwrap();
    let explicit = db
        .query(
            "g",
            "MATCH (a)-[:likes]->(b:thing) WHERE a.name = 'alice' RETURN b",
        )
        .unwrap();
    assert_eq!(strings(&inline.rows), strings(&explicit.rows));
    assert_eq!(strings(&inline.rows), vec![vec!["x"]]);
}

#[test]
fn grouped_count_aggregates_per_subject() {
    let mut db = GraphDb::new();
    db.add_edge("g", "alice", "likes", "x").unwrap();
    db.add_edge("g", "alice", "likes", "y").unwrap();
    db.add_edge("g", "bob", "likes", "x").unwrap();

    let result = db
        .query("g", "MATCH (a)-[:likes]->(b) RETURN a, count(b)")
        .unwrap();
    // Group order follows first appearance during traversal.
    assert_eq!(
        strings(&result.rows),
        vec![vec!["alice", "2"], vec!["bob", "1"]]
    );
}

#[test]
fn results_are_invariant_under_insertion_order() {
    let edges = [("a", "r", "b"), ("b", "r", "c"), ("a", "r", "c")];
    let mut forward = GraphDb::new();
    for (s, p, o) in edges {
        forward.add_edge("g", s, p, o).unwrap();
    }
    let mut backward = GraphDb::new();
    for (s, p, o) in edges.iter().rev() {
        backward.add_edge("g", s, p, o).unwrap();
    }

    let q = "MATCH (x)-[:r]->(y) RETURN x, y";
    assert_eq!(
        strings(&forward.query("g", q).unwrap().rows),
        strings(&backward.query("g", q).unwrap().rows)
    );
}

#[test]
fn missing_graph_yields_zero_rows() {
    let db = GraphDb::new();
    let result = db.query("nope", "MATCH (a)-[:r]->(b) RETURN a").unwrap();
    assert!(result.rows.is_empty());
}

#[test]
fn limit_saturates_the_traversal() {
    let mut db = GraphDb::new();
    for object in ["b", "c", "d", "e"] {
        db.add_edge("g", "a", "r", object).unwrap();
    }

    let result = db
        .query("g", "MATCH (x)-[:r]->(y) RETURN y LIMIT 2")
        .unwrap();
    assert_eq!(strings(&result.rows), vec![vec!["b"], vec!["c"]]);
}

#[test]
fn reversed_links_swap_source_and_destination() {
    let mut db = GraphDb::new();
    db.add_edge("g", "alice", "knows", "bob").unwrap();

    let result = db
        .query("g", "MATCH (a)<-[:knows]-(b) RETURN a, b")
        .unwrap();
    assert_eq!(strings(&result.rows), vec![vec!["bob", "alice"]]);
}

#[test]
fn relationship_aliases_bind_the_predicate() {
    let mut db = GraphDb::new();
    db.add_edge("g", "alice", "knows", "bob").unwrap();
    db.add_edge("g", "alice", "likes", "bob").unwrap();

    let result = db.query("g", "MATCH (a)-[r]->(b) RETURN r").unwrap();
    assert_eq!(strings(&result.rows), vec![vec!["knows"], vec!["likes"]]);
}

#[test]
fn property_projection_reads_records() {
    let mut db = GraphDb::new();
    db.add_edge("g", "alice", "knows", "bob").unwrap();
    db.set_node_property("g", "person", "alice", "age", Value::Number(30.0))
        .unwrap();

    let result = db
        .query("g", "MATCH (a)-[:knows]->(b) RETURN a.age, b.age")
        .unwrap();
    assert_eq!(result.rows, vec![vec![Value::Number(30.0), Value::Null]]);
}

#[test]
fn aggregation_over_properties() {
    let mut db = GraphDb::new();
    db.add_edge("g", "alice", "knows", "bob").unwrap();
    db.add_edge("g", "alice", "knows", "carol").unwrap();
    db.set_node_property("g", "person", "bob", "age", Value::Number(25.0))
        .unwrap();
    db.set_node_property("g", "person", "carol", "age", Value::Number(35.0))
        .unwrap();

    let result = db
        .query("g", "MATCH (a:user)-[:knows]->(b) RETURN a, avg(b.age)")
        .unwrap();
    assert_eq!(
        result.rows,
        vec![vec![Value::String("alice".into()), Value::Number(30.0)]]
    );
}

#[test]
fn cyclic_pattern_closes_on_the_same_node() {
    let mut db = GraphDb::new();
    db.add_edge("g", "a", "r", "b").unwrap();
    db.add_edge("g", "b", "r", "a").unwrap();
    db.add_edge("g", "b", "r", "c").unwrap();

    let result = db
        .query("g", "MATCH (x)-[s]->(y)-[t]->(x) RETURN x, y")
        .unwrap();
    assert_eq!(
        strings(&result.rows),
        vec![vec!["a", "b"], vec!["b", "a"]]
    );
}

#[test]
fn converging_star_pattern_uses_entry_points() {
    let mut db = GraphDb::new();
    db.add_edge("g", "x", "r", "m").unwrap();
    db.add_edge("g", "y", "s", "m").unwrap();

    // Both `a` and `c` have in-degree 0; the second becomes an extra
    // traversal entry point once the first path bottoms out.
    let result = db
        .query("g", "MATCH (a)-[:r]->(b)<-[:s]-(c) RETURN a, b, c")
        .unwrap();
    assert_eq!(strings(&result.rows), vec![vec!["x", "m", "y"]]);
}

#[test]
fn trailer_reports_elapsed_milliseconds() {
    let mut db = GraphDb::new();
    db.add_edge("g", "a", "r", "b").unwrap();
    let result = db.query("g", "MATCH (x)-[:r]->(y) RETURN x").unwrap();
    assert!(result.trailer().starts_with("Query internal execution time:"));
    assert!(result.trailer().ends_with("milliseconds"));
}
